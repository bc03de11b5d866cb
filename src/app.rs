use eframe::egui;

use crate::state::EngineState;
use crate::ui::{panels, selector, UiState};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DataVisApp {
    pub state: EngineState,
    pub ui_state: UiState,
}

impl DataVisApp {
    pub fn new(state: EngineState) -> Self {
        Self {
            state,
            ui_state: UiState::default(),
        }
    }
}

impl eframe::App for DataVisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &mut self.ui_state);
        });

        // ---- Bottom panel: status line ----
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            panels::status_bar(ui, &self.state);
        });

        // ---- Left side panel: data list and filters ----
        egui::SidePanel::left("data_panel")
            .default_width(250.0)
            .min_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &mut self.ui_state);
            });

        // ---- Central panel: toolbar, then table or plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::toolbar(ui, &mut self.state, &mut self.ui_state);
            panels::main_view(ui, &self.state);
        });

        // ---- Dialogs ----
        selector::column_selector(ctx, &mut self.state, &mut self.ui_state);
        panels::error_dialog(ctx, &mut self.ui_state);
    }
}
