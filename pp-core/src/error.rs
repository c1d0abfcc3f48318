/// Error types for the PowerPlot libraries
use thiserror::Error;

/// Main error type for PowerPlot operations
#[derive(Error, Debug)]
pub enum PowerPlotError {
    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Network response was not ok: HTTP {0}")]
    HttpStatus(u16),

    /// Response was neither JSON nor an object-storage octet stream
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),

    /// Payload did not match the expected schema
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A reading's key is not a recognizable timestamp
    #[error("Failed to parse timestamp: {0}")]
    TimestampParse(String),

    /// Mean of nothing, or a percentage against a zero baseline
    #[error("Division by zero")]
    DivisionByZero,

    /// An operation that needs at least one data point got none
    #[error("Series is empty")]
    EmptySeries,

    /// Brush selection contained no points
    #[error("Selection is empty")]
    EmptySelection,

    /// Brush indices fall outside the series
    #[error("Invalid selection {start}..={end} for series of length {len}")]
    InvalidSelection { start: usize, end: usize, len: usize },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

/// Type alias for Results using PowerPlotError
pub type Result<T> = std::result::Result<T, PowerPlotError>;
