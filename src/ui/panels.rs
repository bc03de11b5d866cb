use std::path::PathBuf;

use eframe::egui::{self, Color32, Context, RichText, ScrollArea, Ui};

use crate::state::EngineState;
use crate::view::{ViewMode, ViewState};

use super::{plot, table, Toolbar, UiState};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu bar.
pub fn top_bar(ui: &mut Ui, state: &mut EngineState, ui_state: &mut UiState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state, ui_state);
                ui.close_menu();
            }
            if ui.button("Save file").clicked() {
                // Outcome is reported on the status line.
                let _ = state.save();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Exit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.menu_button("Windows", |ui: &mut Ui| {
            if ui
                .selectable_label(ui_state.show_filter_window, "Filter Window")
                .clicked()
            {
                toggle_filter_window(state, ui_state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = state.active_dataset() {
            ui.label(format!(
                "{}: {} rows shown, {} in baseline",
                ds.display_name,
                ds.current.len(),
                ds.baseline.len()
            ));
        }
    });
}

fn toggle_filter_window(state: &mut EngineState, ui_state: &mut UiState) {
    if ui_state.show_filter_window {
        ui_state.show_filter_window = false;
    } else if state.filter_spec().is_some_and(|s| !s.is_empty()) {
        ui_state.show_filter_window = true;
        state.set_status("Successfully added filter window");
    } else {
        state.set_status("No Filters Set");
    }
}

// ---------------------------------------------------------------------------
// Left side panel – data list, actions, filter window
// ---------------------------------------------------------------------------

/// Render the left side panel.
pub fn side_panel(ui: &mut Ui, state: &mut EngineState, ui_state: &mut UiState) {
    ui.heading("Imported Data");
    ui.separator();

    let names: Vec<String> = state.registry.iter().map(|d| d.display_name.clone()).collect();
    let active = state.active_dataset().map(|d| d.display_name.clone());

    ScrollArea::vertical()
        .id_salt("data_list")
        .max_height(200.0)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            if names.is_empty() {
                ui.label("No data imported.");
            }
            for name in &names {
                let highlighted = ui_state.highlighted.as_deref() == Some(name.as_str());
                let mut text = RichText::new(name.as_str());
                if active.as_deref() == Some(name.as_str()) {
                    text = text.strong();
                }
                let response = ui.selectable_label(highlighted, text);
                if response.clicked() {
                    ui_state.highlighted = Some(name.clone());
                }
                if response.double_clicked() && state.activate(name).is_ok() {
                    ui_state.toolbar = Toolbar::Plotting;
                }
            }
        });

    if ui.button("Remove Data").clicked() {
        if let Some(name) = ui_state.highlighted.take() {
            let _ = state.remove(&name);
            if state.active_dataset().is_none() {
                ui_state.toolbar = Toolbar::Hidden;
                ui_state.show_filter_window = false;
            }
        }
    }

    ui.separator();

    ui.vertical_centered_justified(|ui: &mut Ui| {
        if ui.button("Import File").clicked() {
            open_file_dialog(state, ui_state);
        }
        if ui.button("Plotting").clicked() {
            select_toolbar(state, ui_state, Toolbar::Plotting);
        }
        if ui.button("Transformations").clicked() {
            select_toolbar(state, ui_state, Toolbar::Transformations);
        }
    });

    if ui_state.show_filter_window {
        ui.separator();
        filter_window(ui, state);
    }
}

fn select_toolbar(state: &mut EngineState, ui_state: &mut UiState, toolbar: Toolbar) {
    if state.active_dataset().is_some() {
        ui_state.toolbar = toolbar;
    } else {
        state.set_status("Please select or import data");
    }
}

/// One text entry per filter column plus the submit button.
fn filter_window(ui: &mut Ui, state: &mut EngineState) {
    ui.heading("Filters");
    if state.column_filters.is_empty() {
        ui.label("No Filters Set");
        return;
    }
    for expr in state.column_filters.iter_mut() {
        ui.label(format!("{}:", expr.column));
        ui.text_edit_singleline(&mut expr.text);
    }
    ui.add_space(8.0);
    if ui.button("Add Filter").clicked() {
        let _ = state.submit_filters();
    }
}

// ---------------------------------------------------------------------------
// Central panel – toolbar and the current view
// ---------------------------------------------------------------------------

/// Render the toolbar for the selected section.
pub fn toolbar(ui: &mut Ui, state: &mut EngineState, ui_state: &mut UiState) {
    if state.active_dataset().is_none() {
        return;
    }
    ui.horizontal(|ui: &mut Ui| match ui_state.toolbar {
        Toolbar::Hidden => {}
        Toolbar::Plotting => {
            if ui
                .selectable_label(state.mode() == ViewMode::Table, "Table")
                .clicked()
            {
                let _ = state.set_mode(ViewMode::Table);
            }
            if ui
                .selectable_label(state.mode() == ViewMode::Plot, "Plot Graph")
                .clicked()
            {
                let _ = state.set_mode(ViewMode::Plot);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
                if ui.button("Set Filters").clicked() {
                    let _ = state.request_column_selection();
                }
            });
        }
        Toolbar::Transformations => {
            if ui.button("Log Transform").clicked() {
                let _ = state.apply_log();
            }
        }
    });
    ui.separator();
}

/// Render whatever the engine currently derives.
pub fn main_view(ui: &mut Ui, state: &EngineState) {
    match state.view() {
        ViewState::NoData => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Import a file, then double-click it in the data list");
            });
        }
        ViewState::Table(payload) => table::data_table(ui, payload),
        ViewState::Plot(payload) => plot::xy_plot(ui, payload),
        ViewState::AwaitingColumnSelection { requested, reason } => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(format!("Select columns to show the {requested} view ({reason})"));
            });
        }
    }
}

/// Render the status line.
pub fn status_bar(ui: &mut Ui, state: &EngineState) {
    let status = state.status();
    if status.starts_with("Error: ") {
        ui.label(RichText::new(status).color(Color32::RED));
    } else {
        ui.label(status);
    }
}

/// Blocking error dialog for failed loads.
pub fn error_dialog(ctx: &Context, ui_state: &mut UiState) {
    let Some(message) = ui_state.error_dialog.clone() else {
        return;
    };
    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label(message);
            if ui.button("OK").clicked() {
                ui_state.error_dialog = None;
            }
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut EngineState, ui_state: &mut UiState) {
    let file: Option<PathBuf> = rfd::FileDialog::new()
        .set_title("Select a File")
        .add_filter("CSV Files", &["csv"])
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("All Files", &["*"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.load(&path) {
            ui_state.error_dialog = Some(e.to_string());
        }
    }
}
