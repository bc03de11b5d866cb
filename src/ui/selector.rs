use eframe::egui::{self, Color32, Context, Ui};

use crate::data::filter::FilterSpec;
use crate::data::model::Table;
use crate::state::EngineState;
use crate::view::{AxisSelection, ColumnSelection};

use super::UiState;

// ---------------------------------------------------------------------------
// Column-selection dialog contents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionDraft {
    pub columns: Vec<String>,
    /// One flag per entry of `columns`.
    pub checked: Vec<bool>,
    pub x_column: String,
    pub y_column: String,
}

impl SelectionDraft {
    /// Pre-fill from the previous selection where it still fits `table`;
    /// otherwise X is the first column and Y the second.
    pub fn new(table: &Table, filters: Option<&FilterSpec>, axes: Option<&AxisSelection>) -> Self {
        let columns = table.columns().to_vec();
        let checked = columns
            .iter()
            .map(|c| filters.is_some_and(|f| f.contains(c)))
            .collect();

        let fallback_x = columns.first().cloned().unwrap_or_default();
        let fallback_y = columns.get(1).cloned().unwrap_or_else(|| fallback_x.clone());
        let keep = |col: Option<&String>, fallback: String| {
            col.filter(|c| table.has_column(c))
                .cloned()
                .unwrap_or(fallback)
        };

        Self {
            x_column: keep(axes.map(|a| &a.x_column), fallback_x),
            y_column: keep(axes.map(|a| &a.y_column), fallback_y),
            columns,
            checked,
        }
    }

    pub fn to_selection(&self) -> ColumnSelection {
        ColumnSelection {
            filters: FilterSpec::new(
                self.columns
                    .iter()
                    .zip(&self.checked)
                    .filter(|&(_, &on)| on)
                    .map(|(c, _)| c.clone()),
            ),
            axes: AxisSelection {
                x_column: self.x_column.clone(),
                y_column: self.y_column.clone(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Dialog window
// ---------------------------------------------------------------------------

/// Show the selection dialog while the engine waits for one.
pub fn column_selector(ctx: &Context, state: &mut EngineState, ui_state: &mut UiState) {
    if !state.view().is_awaiting_selection() {
        ui_state.draft = None;
        return;
    }
    let Some(dataset) = state.active_dataset() else {
        return;
    };
    let draft = ui_state
        .draft
        .get_or_insert_with(|| SelectionDraft::new(&dataset.current, state.filter_spec(), state.axes()));

    let mut submitted = false;
    egui::Window::new("Select Plot Settings")
        .collapsible(false)
        .resizable(false)
        .default_width(400.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label("Filter by Columns:");
            for (col, on) in draft.columns.iter().zip(draft.checked.iter_mut()) {
                ui.checkbox(on, col.as_str());
            }
            ui.separator();

            axis_combo(ui, "Select X-axis column:", "x_axis", &draft.columns, &mut draft.x_column);
            axis_combo(ui, "Select Y-axis column:", "y_axis", &draft.columns, &mut draft.y_column);

            ui.add_space(8.0);
            if ui.button("Submit").clicked() {
                submitted = true;
            }
            if let Some(err) = state.status().strip_prefix("Error: ") {
                ui.colored_label(Color32::RED, err);
            }
        });

    if submitted {
        let selection = draft.to_selection();
        if state.submit_selection(selection).is_ok() {
            ui_state.draft = None;
        }
    }
}

fn axis_combo(ui: &mut Ui, label: &str, id: &str, columns: &[String], selected: &mut String) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for col in columns {
                ui.selectable_value(selected, col.clone(), col.as_str());
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn table() -> Table {
        Table::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(3)]],
        )
        .unwrap()
    }

    #[test]
    fn defaults_to_first_two_columns() {
        let draft = SelectionDraft::new(&table(), None, None);
        assert_eq!(draft.x_column, "a");
        assert_eq!(draft.y_column, "b");
        assert_eq!(draft.checked, vec![false, false, false]);
    }

    #[test]
    fn single_column_uses_it_for_both_axes() {
        let t = Table::new(vec!["only".into()], Vec::new()).unwrap();
        let draft = SelectionDraft::new(&t, None, None);
        assert_eq!(draft.x_column, "only");
        assert_eq!(draft.y_column, "only");
    }

    #[test]
    fn keeps_previous_choices_that_still_exist() {
        let spec = FilterSpec::new(["c", "gone"]);
        let axes = AxisSelection {
            x_column: "c".into(),
            y_column: "gone".into(),
        };
        let draft = SelectionDraft::new(&table(), Some(&spec), Some(&axes));
        assert_eq!(draft.checked, vec![false, false, true]);
        assert_eq!(draft.x_column, "c");
        assert_eq!(draft.y_column, "b");
    }

    #[test]
    fn selection_lists_checked_columns_in_table_order() {
        let mut draft = SelectionDraft::new(&table(), None, None);
        draft.checked = vec![true, false, true];
        let selection = draft.to_selection();
        assert_eq!(selection.filters.columns(), ["a".to_string(), "c".to_string()]);
        assert_eq!(selection.axes.x_column, "a");
    }
}
