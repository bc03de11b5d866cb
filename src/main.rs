mod app;
mod cli;
mod data;
mod error;
mod state;
mod ui;
mod view;

use app::DataVisApp;
use clap::Parser;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let args = cli::Args::parse();
    let state = args.initial_state();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Analysis Application",
        options,
        Box::new(|_cc| Ok(Box::new(DataVisApp::new(state)))),
    )
}
