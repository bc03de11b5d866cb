use thiserror::Error;

// ---------------------------------------------------------------------------
// Engine error taxonomy
// ---------------------------------------------------------------------------

/// Every failure an engine operation can report. None of them are fatal:
/// the state layer turns each into a status line and leaves prior state intact.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Unreadable or malformed source file.
    #[error("Failed to load file: {0}")]
    Load(String),

    /// Writing the current table back to disk failed.
    #[error("Failed to save file: {0}")]
    Save(String),

    /// An elementwise transform hit a value it cannot map.
    #[error("Error in log transformation: {0}")]
    Transform(String),

    /// Missing or invalid column selection.
    #[error("Invalid column selection: {0}")]
    Selection(String),

    /// Malformed operand inside an accepted filter pair.
    #[error("Invalid filter: {0}")]
    Filter(String),

    #[error("No data selected")]
    NoData,

    #[error("No dataset named '{0}'")]
    DatasetNotFound(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
