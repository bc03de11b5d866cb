use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::view::TablePayload;

// ---------------------------------------------------------------------------
// Table view (central panel)
// ---------------------------------------------------------------------------

/// Render the table payload with one header row.
pub fn data_table(ui: &mut Ui, payload: &TablePayload) {
    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::centered_and_justified(egui::Direction::LeftToRight))
            .columns(Column::auto().at_least(100.0), payload.columns.len())
            .header(20.0, |mut header| {
                for col in &payload.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, payload.rows.len(), |mut row| {
                    let cells = &payload.rows[row.index()];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell.to_string());
                        });
                    }
                });
            });
    });
}
