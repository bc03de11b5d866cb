use std::fmt;

use clap::ValueEnum;

use crate::data::filter::FilterSpec;
use crate::data::model::{CellValue, Table};
use crate::error::{EngineError, EngineResult};

// ---------------------------------------------------------------------------
// View mode and selections
// ---------------------------------------------------------------------------

/// Which derived representation is rebuilt on every state or data change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ViewMode {
    #[default]
    Table,
    Plot,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Table => write!(f, "table"),
            ViewMode::Plot => write!(f, "plot"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSelection {
    pub x_column: String,
    pub y_column: String,
}

impl AxisSelection {
    /// Axis columns that `table` does not have.
    pub fn missing_from(&self, table: &Table) -> Vec<String> {
        [&self.x_column, &self.y_column]
            .into_iter()
            .filter(|c| !table.has_column(c))
            .cloned()
            .collect()
    }
}

/// Everything the column-selection dialog submits at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    pub filters: FilterSpec,
    pub axes: AxisSelection,
}

impl ColumnSelection {
    /// Every named column must exist in `table`, and both axes must be numeric.
    pub fn validate(&self, table: &Table) -> EngineResult<()> {
        let mut missing = self.axes.missing_from(table);
        missing.extend(self.filters.missing_from(table));
        if !missing.is_empty() {
            return Err(EngineError::Selection(format!(
                "unknown column(s): {}",
                missing.join(", ")
            )));
        }
        for axis in [&self.axes.x_column, &self.axes.y_column] {
            if !table.is_numeric_column(axis) {
                return Err(EngineError::Selection(format!(
                    "axis column '{axis}' is not numeric"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Render payloads handed to the presentation layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TablePayload {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TablePayload {
    /// Project `table` onto the filter columns; an empty spec shows everything.
    pub fn build(table: &Table, spec: &FilterSpec) -> Self {
        let shown = if spec.is_empty() {
            table.clone()
        } else {
            table.project(spec.columns())
        };
        Self {
            columns: shown.columns().to_vec(),
            rows: shown.rows().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotPayload {
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    pub x_label: String,
    pub y_label: String,
    pub title: String,
}

impl PlotPayload {
    /// Read the two axis columns out of `table`, skipping rows where either
    /// cell is missing.
    pub fn build(table: &Table, axes: &AxisSelection) -> EngineResult<Self> {
        let column = |name: &str| {
            table
                .column_index(name)
                .filter(|_| table.is_numeric_column(name))
                .ok_or_else(|| {
                    EngineError::Selection(format!("'{name}' is not a numeric column"))
                })
        };
        let x_idx = column(axes.x_column.as_str())?;
        let y_idx = column(axes.y_column.as_str())?;

        let (x_values, y_values): (Vec<f64>, Vec<f64>) = table
            .rows()
            .iter()
            .filter_map(|row| Some((row[x_idx].as_f64()?, row[y_idx].as_f64()?)))
            .unzip();

        Ok(Self {
            x_values,
            y_values,
            x_label: axes.x_column.clone(),
            y_label: axes.y_column.clone(),
            title: "Data Plot".to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    /// No active dataset.
    #[default]
    NoData,
    Table(TablePayload),
    Plot(PlotPayload),
    /// The requested mode needs a (new) column selection before it can render.
    AwaitingColumnSelection { requested: ViewMode, reason: String },
}

impl ViewState {
    pub fn is_awaiting_selection(&self) -> bool {
        matches!(self, ViewState::AwaitingColumnSelection { .. })
    }
}

/// Derive the view for `mode` from `table`, or explain which selection is
/// missing.
pub fn derive_view(
    table: &Table,
    mode: ViewMode,
    filters: Option<&FilterSpec>,
    axes: Option<&AxisSelection>,
) -> ViewState {
    let awaiting = |reason: String| {
        log::warn!("{mode} view needs a column selection: {reason}");
        ViewState::AwaitingColumnSelection {
            requested: mode,
            reason,
        }
    };

    match mode {
        ViewMode::Table => match filters {
            None => awaiting("no filter columns selected".to_string()),
            Some(spec) => {
                let missing = spec.missing_from(table);
                if missing.is_empty() {
                    ViewState::Table(TablePayload::build(table, spec))
                } else {
                    awaiting(format!("unknown filter column(s): {}", missing.join(", ")))
                }
            }
        },
        ViewMode::Plot => match axes {
            None => awaiting("no axis columns selected".to_string()),
            Some(axes) => match PlotPayload::build(table, axes) {
                Ok(payload) => ViewState::Plot(payload),
                Err(e) => awaiting(e.to_string()),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(
            vec!["x".into(), "y".into(), "label".into()],
            vec![
                vec![CellValue::Integer(1), CellValue::Float(2.0), CellValue::Text("a".into())],
                vec![CellValue::Integer(2), CellValue::Null, CellValue::Text("b".into())],
                vec![CellValue::Integer(3), CellValue::Float(6.0), CellValue::Text("c".into())],
            ],
        )
        .unwrap()
    }

    fn axes(x: &str, y: &str) -> AxisSelection {
        AxisSelection {
            x_column: x.into(),
            y_column: y.into(),
        }
    }

    #[test]
    fn plot_with_unknown_axis_awaits_selection() {
        let view = derive_view(&table(), ViewMode::Plot, None, Some(&axes("nope", "y")));
        assert!(matches!(
            view,
            ViewState::AwaitingColumnSelection {
                requested: ViewMode::Plot,
                ..
            }
        ));
    }

    #[test]
    fn plot_without_axes_awaits_selection() {
        let spec = FilterSpec::new(["x"]);
        let view = derive_view(&table(), ViewMode::Plot, Some(&spec), None);
        assert!(view.is_awaiting_selection());
    }

    #[test]
    fn plot_skips_rows_with_missing_cells() {
        let view = derive_view(&table(), ViewMode::Plot, None, Some(&axes("x", "y")));
        let ViewState::Plot(payload) = view else {
            panic!("expected a plot, got {view:?}");
        };
        assert_eq!(payload.x_values, vec![1.0, 3.0]);
        assert_eq!(payload.y_values, vec![2.0, 6.0]);
        assert_eq!(payload.x_label, "x");
        assert_eq!(payload.title, "Data Plot");
    }

    #[test]
    fn table_projects_onto_filter_columns() {
        let spec = FilterSpec::new(["label", "x"]);
        let ViewState::Table(payload) = derive_view(&table(), ViewMode::Table, Some(&spec), None)
        else {
            panic!("expected a table");
        };
        assert_eq!(payload.columns, ["label", "x"]);
        assert_eq!(payload.rows[0], vec![CellValue::Text("a".into()), CellValue::Integer(1)]);
    }

    #[test]
    fn empty_filter_spec_shows_every_column() {
        let ViewState::Table(payload) =
            derive_view(&table(), ViewMode::Table, Some(&FilterSpec::default()), None)
        else {
            panic!("expected a table");
        };
        assert_eq!(payload.columns.len(), 3);
        assert_eq!(payload.rows.len(), 3);
    }

    #[test]
    fn table_with_stale_filter_columns_awaits_selection() {
        let spec = FilterSpec::new(["gone"]);
        assert!(derive_view(&table(), ViewMode::Table, Some(&spec), None).is_awaiting_selection());
        assert!(derive_view(&table(), ViewMode::Table, None, None).is_awaiting_selection());
    }

    #[test]
    fn selection_validation() {
        let ok = ColumnSelection {
            filters: FilterSpec::new(["label"]),
            axes: axes("x", "y"),
        };
        assert!(ok.validate(&table()).is_ok());

        let unknown = ColumnSelection {
            filters: FilterSpec::new(["ghost"]),
            axes: axes("x", "y"),
        };
        assert!(matches!(unknown.validate(&table()), Err(EngineError::Selection(_))));

        let text_axis = ColumnSelection {
            filters: FilterSpec::default(),
            axes: axes("label", "y"),
        };
        assert!(matches!(text_axis.validate(&table()), Err(EngineError::Selection(_))));
    }
}
