use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints, Points};

use crate::view::PlotPayload;

// ---------------------------------------------------------------------------
// X/Y plot (central panel)
// ---------------------------------------------------------------------------

/// Render the payload as a line with a marker on every point.
pub fn xy_plot(ui: &mut Ui, payload: &PlotPayload) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(payload.title.as_str());
    });

    let points: Vec<[f64; 2]> = payload
        .x_values
        .iter()
        .zip(&payload.y_values)
        .map(|(&x, &y)| [x, y])
        .collect();

    Plot::new("xy_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label(payload.x_label.clone())
        .y_axis_label(payload.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let line = Line::new(PlotPoints::from(points.clone()))
                .name(&payload.y_label)
                .color(Color32::LIGHT_BLUE)
                .width(1.5);
            plot_ui.line(line);
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .radius(3.0)
                    .color(Color32::LIGHT_BLUE),
            );
        });
}
