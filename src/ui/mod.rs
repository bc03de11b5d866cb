pub mod panels;
pub mod plot;
pub mod selector;
pub mod table;

use selector::SelectionDraft;

/// Toolbar section picked with the side-panel buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Toolbar {
    #[default]
    Hidden,
    Plotting,
    Transformations,
}

/// Presentation-only state: nothing here affects what the engine derives.
#[derive(Debug, Default)]
pub struct UiState {
    /// Entry highlighted in the "Imported Data" list.
    pub highlighted: Option<String>,
    pub toolbar: Toolbar,
    pub show_filter_window: bool,
    /// Column-selection dialog contents while it is open.
    pub draft: Option<SelectionDraft>,
    /// Message for the blocking error dialog (failed loads).
    pub error_dialog: Option<String>,
}
