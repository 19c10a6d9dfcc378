//! LUT error types.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur while building transfer tables.
#[derive(Debug, Error)]
pub enum LutError {
    /// Invalid table size.
    #[error("invalid LUT size: {0}")]
    InvalidSize(String),

    /// Invalid input range.
    #[error("invalid input range: [{min}, {max}]")]
    InvalidRange {
        /// Minimum value
        min: f64,
        /// Maximum value
        max: f64,
    },

    /// Number of supplied functions does not match the number of channels.
    #[error("number of {what} ({got}) != number of inputs ({expected})")]
    CountMismatch {
        /// Kind of function being counted
        what: &'static str,
        /// Number of channels
        expected: usize,
        /// Number supplied
        got: usize,
    },

    /// Intensity remap does not cover the channel's color table.
    #[error("intensity remap for channel {channel} has {len} entries, color table needs {needed}")]
    RemapTooShort {
        /// Channel index
        channel: usize,
        /// Remap length
        len: usize,
        /// Color table length
        needed: usize,
    },

    /// Parse error when loading node files.
    #[error("parse error: {0}")]
    ParseError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
