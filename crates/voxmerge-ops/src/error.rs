//! Error types for merge operations.

use thiserror::Error;
use voxmerge_core::ScalarKind;
use voxmerge_lut::LutError;

/// Error type for merge operations.
///
/// Every variant except [`OpsError::Io`] is a configuration error: it is
/// reported before any tile work starts and leaves the output untouched.
#[derive(Error, Debug)]
pub enum OpsError {
    /// No input channels were supplied.
    #[error("input 0 must be specified")]
    MissingInput,

    /// Channels do not share one element type.
    #[error("channel {channel} is {got}, expected {expected} like channel 0")]
    MixedScalarKinds {
        /// Offending channel
        channel: usize,
        /// Kind of channel 0
        expected: ScalarKind,
        /// Kind of the offending channel
        got: ScalarKind,
    },

    /// Channel component count the kernel cannot consume.
    #[error("channel {channel} has {components} components; expected 1 or at least 3")]
    UnsupportedComponents {
        /// Offending channel
        channel: usize,
        /// Its component count
        components: usize,
    },

    /// Volumes or output have incompatible extents.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Tile lies outside the output or overlaps another tile.
    #[error("invalid tile: {0}")]
    InvalidTile(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Transfer table construction failed.
    #[error(transparent)]
    Lut(#[from] LutError),

    /// Core type error (unsupported scalar kind, bad layout).
    #[error(transparent)]
    Core(#[from] voxmerge_core::Error),

    /// Merge settings could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// I/O error while loading settings.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OpsError {
    /// Returns `true` if the merge was rejected because of its inputs or
    /// settings rather than an environment failure.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(
            self,
            Self::Io(_) | Self::Core(voxmerge_core::Error::Io(_)) | Self::Lut(LutError::Io(_))
        )
    }
}

/// Result type for merge operations.
pub type OpsResult<T> = Result<T, OpsError>;
