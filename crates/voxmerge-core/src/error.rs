//! Error types for voxmerge-core operations.
//!
//! The [`Error`] enum covers the failure modes of the core data types:
//! - Unsupported element types
//! - Invalid extents and volume dimensions
//! - Sample buffers too small for their declared layout
//!
//! # Usage
//!
//! ```rust
//! use voxmerge_core::{Error, Result};
//!
//! fn check_components(components: usize) -> Result<()> {
//!     if components == 0 {
//!         return Err(Error::invalid_layout("component count must be > 0"));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Used By
//!
//! - [`crate::volume::Volume`] - Layout validation
//! - [`crate::format::ScalarKind`] - Parsing element type names
//! - `voxmerge-ops` - Wrapped into `OpsError`

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or addressing volumes.
#[derive(Debug, Error)]
pub enum Error {
    /// Element type is not one of the supported scalar kinds.
    ///
    /// Supported kinds are signed/unsigned 8/16/32-bit integers and
    /// 32/64-bit floats.
    #[error("unsupported scalar type: {format}")]
    UnsupportedFormat {
        /// Type name or description
        format: String,
    },

    /// Extent bounds are reversed or otherwise unusable.
    #[error("invalid extent {extent}: {reason}")]
    InvalidExtent {
        /// Extent in `[x0,x1]x[y0,y1]x[z0,z1]` notation
        extent: String,
        /// Reason why the extent is invalid
        reason: String,
    },

    /// Invalid volume dimensions.
    ///
    /// Returned when a dimension is zero or the sample count overflows.
    #[error("invalid dimensions: {width}x{height}x{depth} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Requested depth
        depth: usize,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Sample layout (components or strides) is unusable.
    #[error("invalid sample layout: {0}")]
    InvalidLayout(String),

    /// Sample buffer is shorter than the layout requires.
    #[error("buffer too small: need {required} samples, got {actual}")]
    BufferTooSmall {
        /// Samples required by the layout
        required: usize,
        /// Samples actually provided
        actual: usize,
    },

    /// I/O error while decoding raw samples.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates an [`Error::UnsupportedFormat`] error.
    #[inline]
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(dims: [usize; 3], reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width: dims[0],
            height: dims[1],
            depth: dims[2],
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::InvalidLayout`] error.
    #[inline]
    pub fn invalid_layout(reason: impl Into<String>) -> Self {
        Self::InvalidLayout(reason.into())
    }

    /// Returns `true` if the element type was rejected.
    #[inline]
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_dimensions([0, 4, 4], "width must be > 0");
        assert_eq!(err.to_string(), "invalid dimensions: 0x4x4 (width must be > 0)");

        let err = Error::BufferTooSmall { required: 64, actual: 10 };
        assert!(err.to_string().contains("64"));
    }

    #[test]
    fn test_is_unsupported_format() {
        assert!(Error::unsupported_format("f16").is_unsupported_format());
        assert!(!Error::invalid_layout("x").is_unsupported_format());
    }
}
