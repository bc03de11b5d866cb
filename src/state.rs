use std::path::{Path, PathBuf};

use crate::data::filter::{self, ColumnFilterExpression, FilterSpec};
use crate::data::loader;
use crate::data::model::{Dataset, DatasetId};
use crate::data::registry::DatasetRegistry;
use crate::data::transform;
use crate::error::{EngineError, EngineResult};
use crate::view::{derive_view, AxisSelection, ColumnSelection, ViewMode, ViewState};

// ---------------------------------------------------------------------------
// Engine state
// ---------------------------------------------------------------------------

/// The full application state, independent of rendering.
///
/// Every user operation is a method here. Each one runs to completion, writes
/// the single status line, and on failure leaves everything else as it was.
#[derive(Debug, Default)]
pub struct EngineState {
    /// All loaded datasets.
    pub registry: DatasetRegistry,

    /// Dataset targeted by filter / transform / view operations.
    active: Option<DatasetId>,

    /// Columns chosen as filterable for the active dataset.
    filter_spec: Option<FilterSpec>,

    /// Plot axes for the active dataset.
    axes: Option<AxisSelection>,

    /// Filter text per filter column, in filter-spec order.
    pub column_filters: Vec<ColumnFilterExpression>,

    /// Mode re-derived after every change.
    mode: ViewMode,

    /// What the presentation layer should show right now.
    view: ViewState,

    /// Status shown in the UI; overwritten by every operation.
    status: String,
}

impl EngineState {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            status: "Ready".to_string(),
            ..Default::default()
        }
    }

    // -- read access --

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn filter_spec(&self) -> Option<&FilterSpec> {
        self.filter_spec.as_ref()
    }

    pub fn axes(&self) -> Option<&AxisSelection> {
        self.axes.as_ref()
    }

    pub fn active_dataset(&self) -> Option<&Dataset> {
        self.active.and_then(|id| self.registry.get(id))
    }

    /// Overwrite the status line (used by presentation-only actions).
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    /// Record the outcome of an operation on the status line.
    fn report<T>(&mut self, result: EngineResult<T>, success: impl FnOnce(&T) -> String) -> EngineResult<T> {
        match &result {
            Ok(value) => self.status = success(value),
            Err(e) => {
                log::error!("{e}");
                self.status = format!("Error: {e}");
            }
        }
        result
    }

    fn require_active(&self) -> EngineResult<DatasetId> {
        self.active
            .filter(|id| self.registry.get(*id).is_some())
            .ok_or(EngineError::NoData)
    }

    // -- registry operations --

    /// Load a file into the registry. Does not change the active dataset.
    pub fn load(&mut self, path: &Path) -> EngineResult<String> {
        let result = self.registry.load(path).map(|d| d.display_name.clone());
        self.report(result, |name| {
            if name.starts_with("Copy - ") {
                format!("Loaded {} under new name {name}", path.display())
            } else {
                format!("Loaded {}", path.display())
            }
        })
    }

    /// Remove a dataset. Removing the active one clears the view.
    pub fn remove(&mut self, display_name: &str) -> EngineResult<()> {
        let result = self.registry.remove(display_name).map(|removed| {
            if Some(removed.id) == self.active {
                self.clear_active();
            }
        });
        self.report(result, |_| format!("Successfully removed {display_name}"))
    }

    /// Make a dataset active (double-click in the data list) and render it in
    /// the current mode. Re-activating the active dataset keeps its selections.
    pub fn activate(&mut self, display_name: &str) -> EngineResult<()> {
        let result = match self.registry.find(display_name).map(|d| d.id) {
            None => Err(EngineError::DatasetNotFound(display_name.to_string())),
            Some(id) if Some(id) == self.active => Ok(()),
            Some(id) => {
                self.clear_active();
                self.active = Some(id);
                self.render();
                Ok(())
            }
        };
        self.report(result, |_| format!("Successfully loaded {display_name}"))
    }

    fn clear_active(&mut self) {
        self.active = None;
        self.filter_spec = None;
        self.axes = None;
        self.column_filters.clear();
        self.view = ViewState::NoData;
    }

    // -- view operations --

    /// Switch between table and plot.
    pub fn set_mode(&mut self, mode: ViewMode) -> EngineResult<()> {
        let result = self.require_active().map(|_| {
            self.mode = mode;
            self.render();
        });
        let message = match mode {
            ViewMode::Table => "Table displayed successfully",
            ViewMode::Plot => "Successfully plotted data",
        };
        let result = self.report(result, |_| message.to_string());
        if result.is_ok() && self.view.is_awaiting_selection() {
            self.status = "Select columns to continue".to_string();
        }
        result
    }

    /// Ask for a new column selection ("Set Filters").
    pub fn request_column_selection(&mut self) -> EngineResult<()> {
        let result = self.require_active().map(|_| {
            self.view = ViewState::AwaitingColumnSelection {
                requested: self.mode,
                reason: "column selection requested".to_string(),
            };
        });
        self.report(result, |_| "Select columns to continue".to_string())
    }

    /// Accept the column-selection dialog. An invalid selection keeps the
    /// dialog open and changes nothing.
    pub fn submit_selection(&mut self, selection: ColumnSelection) -> EngineResult<()> {
        let result = self.require_active().and_then(|id| {
            let dataset = self.registry.get(id).ok_or(EngineError::NoData)?;
            selection.validate(&dataset.current)?;

            self.column_filters = selection
                .filters
                .columns()
                .iter()
                .map(|col| {
                    self.column_filters
                        .iter()
                        .find(|e| &e.column == col)
                        .cloned()
                        .unwrap_or_else(|| ColumnFilterExpression::new(col.clone(), ""))
                })
                .collect();
            self.filter_spec = Some(selection.filters);
            self.axes = Some(selection.axes);
            self.render();
            Ok(())
        });
        self.report(result, |_| "Column selection updated".to_string())
    }

    /// Set the filter text of one filter column.
    pub fn set_filter_text(&mut self, column: &str, text: impl Into<String>) -> EngineResult<()> {
        let entry = self
            .column_filters
            .iter_mut()
            .find(|e| e.column == column)
            .ok_or_else(|| {
                EngineError::Selection(format!("'{column}' is not a filter column"))
            });
        let result = entry.map(|e| e.text = text.into());
        self.report(result, |_| format!("Filter set for {column}"))
    }

    /// Rebuild `view` for the current mode from the active dataset.
    fn render(&mut self) {
        self.view = match self.active_dataset() {
            None => ViewState::NoData,
            Some(dataset) => derive_view(
                &dataset.current,
                self.mode,
                self.filter_spec.as_ref(),
                self.axes.as_ref(),
            ),
        };
    }

    // -- data operations --

    /// Run the filter window's expressions over the active dataset's baseline.
    pub fn submit_filters(&mut self) -> EngineResult<()> {
        let result = self.require_active().and_then(|id| {
            let spec = self
                .filter_spec
                .as_ref()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| EngineError::Selection("No Filters Set".to_string()))?;
            let dataset = self.registry.get_mut(id).ok_or(EngineError::NoData)?;
            let filtered = filter::evaluate(&dataset.baseline, spec, &self.column_filters)?;
            log::info!(
                "Filtered '{}': {} of {} rows kept",
                dataset.display_name,
                filtered.len(),
                dataset.baseline.len()
            );
            dataset.current = filtered;
            Ok(())
        });
        if result.is_ok() {
            self.render();
        }
        self.report(result, |_| "Filters applied".to_string())
    }

    /// Log-transform the active dataset's numeric columns.
    pub fn apply_log(&mut self) -> EngineResult<()> {
        let result = self.require_active().and_then(|id| {
            let dataset = self.registry.get_mut(id).ok_or(EngineError::NoData)?;
            transform::apply_log(dataset)
        });
        if result.is_ok() {
            self.render();
        }
        self.report(result, |_| "Log transformation applied".to_string())
    }

    /// Write the active dataset's current table back to its source path.
    pub fn save(&mut self) -> EngineResult<PathBuf> {
        let result = self.require_active().and_then(|id| {
            let dataset = self.registry.get(id).ok_or(EngineError::NoData)?;
            loader::save_file(&dataset.current, &dataset.source_path)
                .map_err(|e| EngineError::Save(format!("{e:#}")))?;
            log::info!("Saved '{}' to {}", dataset.display_name, dataset.source_path.display());
            Ok(dataset.source_path.clone())
        });
        let name = self
            .active_dataset()
            .map(|d| d.display_name.clone())
            .unwrap_or_default();
        self.report(result, |_| format!("Successfully saved file: {name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Table};
    use std::fs;
    use tempfile::TempDir;

    const DATA: &str = "t,v,label\n1,5,a\n2,20,b\n3,35,c\n4,60,d\n5,80,e\n";

    fn loaded(dir: &TempDir) -> EngineState {
        let path = dir.path().join("data.csv");
        fs::write(&path, DATA).unwrap();
        let mut state = EngineState::new(ViewMode::Table);
        state.load(&path).unwrap();
        state
    }

    fn selection(filters: &[&str], x: &str, y: &str) -> ColumnSelection {
        ColumnSelection {
            filters: FilterSpec::new(filters.iter().copied()),
            axes: AxisSelection {
                x_column: x.into(),
                y_column: y.into(),
            },
        }
    }

    fn ready(dir: &TempDir) -> EngineState {
        let mut state = loaded(dir);
        state.activate("data.csv").unwrap();
        state.submit_selection(selection(&["v"], "t", "v")).unwrap();
        state
    }

    fn current(state: &EngineState) -> Table {
        state.active_dataset().unwrap().current.clone()
    }

    #[test]
    fn starts_without_data() {
        let mut state = EngineState::new(ViewMode::Table);
        assert_eq!(state.status(), "Ready");
        assert_eq!(state.view(), &ViewState::NoData);

        assert_eq!(state.set_mode(ViewMode::Plot), Err(EngineError::NoData));
        assert_eq!(state.view(), &ViewState::NoData);
        assert_eq!(state.status(), "Error: No data selected");
    }

    #[test]
    fn activation_enters_column_selection() {
        let dir = TempDir::new().unwrap();
        let mut state = loaded(&dir);
        state.activate("data.csv").unwrap();

        assert!(state.view().is_awaiting_selection());
        assert_eq!(state.status(), "Successfully loaded data.csv");
    }

    #[test]
    fn valid_selection_renders_requested_mode() {
        let dir = TempDir::new().unwrap();
        let mut state = ready(&dir);
        let ViewState::Table(payload) = state.view() else {
            panic!("expected table view, got {:?}", state.view());
        };
        assert_eq!(payload.columns, ["v"]);
        assert_eq!(payload.rows.len(), 5);

        state.set_mode(ViewMode::Plot).unwrap();
        let ViewState::Plot(plot) = state.view() else {
            panic!("expected plot view");
        };
        assert_eq!(plot.x_values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(plot.y_label, "v");

        state.set_mode(ViewMode::Table).unwrap();
        assert!(matches!(state.view(), ViewState::Table(_)));
    }

    #[test]
    fn invalid_selection_keeps_dialog_open() {
        let dir = TempDir::new().unwrap();
        let mut state = loaded(&dir);
        state.activate("data.csv").unwrap();

        let err = state
            .submit_selection(selection(&["v"], "nope", "v"))
            .unwrap_err();
        assert!(matches!(err, EngineError::Selection(_)));
        assert!(state.view().is_awaiting_selection());
        assert!(state.axes().is_none());
        assert!(state.filter_spec().is_none());
    }

    #[test]
    fn filters_always_start_from_the_baseline() {
        let dir = TempDir::new().unwrap();
        let mut state = ready(&dir);

        state.set_filter_text("v", "> 10").unwrap();
        state.submit_filters().unwrap();
        assert_eq!(current(&state).len(), 4);

        // A second, looser filter sees all five baseline rows again.
        state.set_filter_text("v", "> 1").unwrap();
        state.submit_filters().unwrap();
        assert_eq!(current(&state).len(), 5);

        state.set_filter_text("v", "< 50 > 10").unwrap();
        state.submit_filters().unwrap();
        assert_eq!(current(&state).len(), 2);
        let ViewState::Table(payload) = state.view() else {
            panic!("expected table view");
        };
        assert_eq!(payload.rows.len(), 2);
    }

    #[test]
    fn filter_after_transform_uses_pre_transform_table() {
        let dir = TempDir::new().unwrap();
        let mut state = ready(&dir);
        let t0 = current(&state);

        state.apply_log().unwrap();
        let ds = state.active_dataset().unwrap();
        assert_eq!(ds.baseline, t0);
        assert_ne!(ds.current, t0);
        assert_eq!(ds.current.rows()[0][1], CellValue::Float(5f64.ln()));

        state.submit_filters().unwrap();
        assert_eq!(current(&state), t0);
    }

    #[test]
    fn failed_transform_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zeros.csv");
        fs::write(&path, "t,v\n0,1\n1,2\n").unwrap();
        let mut state = EngineState::new(ViewMode::Table);
        state.load(&path).unwrap();
        state.activate("zeros.csv").unwrap();
        let before = current(&state);

        let err = state.apply_log().unwrap_err();
        assert!(matches!(err, EngineError::Transform(_)));
        assert!(state.status().starts_with("Error: "));
        let ds = state.active_dataset().unwrap();
        assert_eq!(ds.current, before);
        assert_eq!(ds.baseline, before);
    }

    #[test]
    fn bad_filter_operand_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut state = ready(&dir);
        state.set_filter_text("v", "> 10").unwrap();
        state.submit_filters().unwrap();
        let before = current(&state);

        state.set_filter_text("v", "< nan").unwrap();
        let err = state.submit_filters().unwrap_err();
        assert!(matches!(err, EngineError::Filter(_)));
        assert_eq!(current(&state), before);
    }

    #[test]
    fn filters_need_a_filter_set() {
        let dir = TempDir::new().unwrap();
        let mut state = loaded(&dir);
        state.activate("data.csv").unwrap();
        assert!(matches!(
            state.submit_filters(),
            Err(EngineError::Selection(_))
        ));
    }

    #[test]
    fn plot_with_stale_axis_awaits_selection() {
        let dir = TempDir::new().unwrap();
        let mut state = loaded(&dir);
        state.activate("data.csv").unwrap();
        state.submit_selection(selection(&[], "t", "v")).unwrap();
        state.axes = Some(AxisSelection {
            x_column: "gone".into(),
            y_column: "v".into(),
        });

        state.set_mode(ViewMode::Plot).unwrap();
        assert!(matches!(
            state.view(),
            ViewState::AwaitingColumnSelection {
                requested: ViewMode::Plot,
                ..
            }
        ));
    }

    #[test]
    fn filtering_to_no_rows_keeps_the_plot() {
        let dir = TempDir::new().unwrap();
        let mut state = ready(&dir);
        state.set_mode(ViewMode::Plot).unwrap();

        state.set_filter_text("v", "> 1000").unwrap();
        state.submit_filters().unwrap();
        assert!(current(&state).is_empty());
        let ViewState::Plot(plot) = state.view() else {
            panic!("expected plot view, got {:?}", state.view());
        };
        assert!(plot.x_values.is_empty());
        assert!(plot.y_values.is_empty());

        state.request_column_selection().unwrap();
        state.submit_selection(selection(&["v"], "t", "v")).unwrap();
        assert!(matches!(state.view(), ViewState::Plot(_)));
    }

    #[test]
    fn filtering_to_no_rows_keeps_the_table() {
        let dir = TempDir::new().unwrap();
        let mut state = ready(&dir);

        state.set_filter_text("v", "< 0").unwrap();
        state.submit_filters().unwrap();
        let ViewState::Table(payload) = state.view() else {
            panic!("expected table view, got {:?}", state.view());
        };
        assert_eq!(payload.columns, ["v"]);
        assert!(payload.rows.is_empty());

        // The baseline still has every row.
        state.set_filter_text("v", "").unwrap();
        state.submit_filters().unwrap();
        assert_eq!(current(&state).len(), 5);
    }

    #[test]
    fn header_only_file_can_be_shown() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "t,v\n").unwrap();
        let mut state = EngineState::new(ViewMode::Plot);
        state.load(&path).unwrap();
        state.activate("empty.csv").unwrap();
        assert!(state.view().is_awaiting_selection());

        state.submit_selection(selection(&["t"], "t", "v")).unwrap();
        let ViewState::Plot(plot) = state.view() else {
            panic!("expected plot view, got {:?}", state.view());
        };
        assert!(plot.x_values.is_empty());

        state.set_mode(ViewMode::Table).unwrap();
        let ViewState::Table(payload) = state.view() else {
            panic!("expected table view, got {:?}", state.view());
        };
        assert_eq!(payload.columns, ["t"]);
        assert!(payload.rows.is_empty());
    }

    #[test]
    fn removing_the_active_dataset_resets_everything() {
        let dir = TempDir::new().unwrap();
        let mut state = ready(&dir);

        state.remove("data.csv").unwrap();
        assert_eq!(state.view(), &ViewState::NoData);
        assert!(state.active_dataset().is_none());
        assert!(state.filter_spec().is_none());
        assert!(state.axes().is_none());
        assert!(state.column_filters.is_empty());
        assert_eq!(state.status(), "Successfully removed data.csv");
    }

    #[test]
    fn removing_another_dataset_keeps_the_view() {
        let dir = TempDir::new().unwrap();
        let mut state = ready(&dir);
        let other = dir.path().join("other.csv");
        fs::write(&other, "a\n1\n").unwrap();
        state.load(&other).unwrap();

        state.remove("other.csv").unwrap();
        assert!(matches!(state.view(), ViewState::Table(_)));
        assert!(state.remove("other.csv").is_err());
    }

    #[test]
    fn switching_datasets_resets_selections() {
        let dir = TempDir::new().unwrap();
        let mut state = ready(&dir);
        let other = dir.path().join("other.csv");
        fs::write(&other, "a,b\n1,2\n").unwrap();
        state.load(&other).unwrap();

        state.activate("other.csv").unwrap();
        assert!(state.filter_spec().is_none());
        assert!(state.axes().is_none());
        assert!(state.view().is_awaiting_selection());
    }

    #[test]
    fn reactivating_keeps_selections() {
        let dir = TempDir::new().unwrap();
        let mut state = ready(&dir);
        state.activate("data.csv").unwrap();
        assert!(state.filter_spec().is_some());
        assert!(matches!(state.view(), ViewState::Table(_)));
    }

    #[test]
    fn reselecting_keeps_text_of_surviving_filter_columns() {
        let dir = TempDir::new().unwrap();
        let mut state = ready(&dir);
        state.set_filter_text("v", "> 10").unwrap();

        state.submit_selection(selection(&["t", "v"], "t", "v")).unwrap();
        assert_eq!(
            state.column_filters,
            vec![
                ColumnFilterExpression::new("t", ""),
                ColumnFilterExpression::new("v", "> 10"),
            ]
        );
        assert!(state.set_filter_text("label", "> 1").is_err());
    }

    #[test]
    fn request_column_selection_reopens_dialog() {
        let dir = TempDir::new().unwrap();
        let mut state = ready(&dir);
        state.request_column_selection().unwrap();
        assert!(state.view().is_awaiting_selection());
    }

    #[test]
    fn duplicate_loads_are_reported() {
        let dir = TempDir::new().unwrap();
        let mut state = loaded(&dir);
        let name = state.load(&dir.path().join("data.csv")).unwrap();
        assert_eq!(name, "Copy - data.csv");
        assert!(state.status().ends_with("under new name Copy - data.csv"));
    }

    #[test]
    fn failed_load_reports_and_keeps_registry() {
        let dir = TempDir::new().unwrap();
        let mut state = loaded(&dir);
        let err = state.load(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, EngineError::Load(_)));
        assert_eq!(state.registry.len(), 1);
        assert!(state.status().starts_with("Error: Failed to load file"));
    }

    #[test]
    fn save_writes_current_table() {
        let dir = TempDir::new().unwrap();
        let mut state = ready(&dir);
        state.set_filter_text("v", "> 50").unwrap();
        state.submit_filters().unwrap();

        let path = state.save().unwrap();
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "t,v,label\n4,60,d\n5,80,e\n"
        );
        assert_eq!(state.status(), "Successfully saved file: data.csv");
    }

    #[test]
    fn save_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut state = ready(&dir);
        fs::remove_dir_all(dir.path()).unwrap();

        let err = state.save().unwrap_err();
        assert!(matches!(err, EngineError::Save(_)));
    }
}
