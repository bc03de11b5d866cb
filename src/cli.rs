use std::path::PathBuf;

use clap::Parser;

use crate::state::EngineState;
use crate::view::ViewMode;

/// Load tabular data, filter it per column, log-transform it, and view it as
/// a table or an X/Y plot.
#[derive(Debug, Parser)]
#[command(name = "rusty-datavis", version, about)]
pub struct Args {
    /// Files to load at startup (CSV, JSON records or Parquet), in order
    pub files: Vec<PathBuf>,

    /// View mode used when a dataset is first shown
    #[arg(long, value_enum, default_value_t = ViewMode::Table)]
    pub view: ViewMode,

    /// Make the last successfully loaded file the active dataset
    #[arg(long)]
    pub activate: bool,
}

impl Args {
    /// Build the starting state. A file that fails to load is logged and
    /// reported on the status line; the rest still load.
    pub fn initial_state(&self) -> EngineState {
        let mut state = EngineState::new(self.view);
        let mut last_loaded = None;
        let mut failed = Vec::new();

        for path in &self.files {
            match state.load(path) {
                Ok(name) => last_loaded = Some(name),
                Err(e) => {
                    log::warn!("Skipping {}: {e}", path.display());
                    failed.push(path.display().to_string());
                }
            }
        }

        if self.activate {
            if let Some(name) = last_loaded {
                // Status reports the outcome.
                let _ = state.activate(&name);
            }
        }
        if !failed.is_empty() {
            state.set_status(format!("Failed to load: {}", failed.join(", ")));
        }
        state
    }
}
