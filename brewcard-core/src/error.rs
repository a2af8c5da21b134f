//! Error types for brew card operations.

use thiserror::Error;

/// Result type for brew card operations.
pub type BrewResult<T> = Result<T, BrewError>;

/// Errors that can occur in brew card operations.
#[derive(Debug, Error)]
pub enum BrewError {
    /// Typed text is not a usable number; the previous value is kept.
    #[error("Invalid numeric input: {0:?}")]
    InvalidNumericInput(String),

    /// A canvas or container has zero, negative or non-finite dimensions.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A quantized range has an unusable min/max/step combination.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// The operation needs a loaded photo.
    #[error("No photo loaded")]
    PhotoRequired,

    /// The frame id is not in the frame catalog.
    #[error("Unknown frame: {0}")]
    UnknownFrame(String),

    /// The filter is not in the filter catalog.
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    /// A drag gesture is already active on the element.
    #[error("Drag already in progress")]
    DragInProgress,

    /// A drag update or end arrived without a gesture start.
    #[error("No active drag")]
    NoActiveDrag,

    /// Payload serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while reading configuration or catalogs.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
