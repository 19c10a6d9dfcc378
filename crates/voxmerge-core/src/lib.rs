//! # voxmerge-core
//!
//! Core types for merging multichannel scalar volumes.
//!
//! This crate provides the foundational types used by the other voxmerge crates:
//!
//! - [`ScalarKind`], [`Sample`] - The closed set of supported element types
//! - [`Extent`] - Inclusive 3D regions (whole volumes and per-worker tiles)
//! - [`Volume`], [`SampleCursor`] - Strided sample storage with explicit cursors
//! - [`AnyVolume`] - A volume whose element type is only known at runtime
//!
//! ## Crate Structure
//!
//! ```text
//! voxmerge-core (this crate)     voxmerge-lut (color ranges, remaps, tables)
//!    ^                               ^
//!    |                               |
//!    +------- voxmerge-ops ----------+   (merge kernel, tiling, parallel execution)
//!                  ^
//!                  |
//!             voxmerge-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod format;
pub mod rect;
pub mod volume;

pub use error::*;
pub use format::{Sample, ScalarKind};
pub use rect::Extent;
pub use volume::{AnyVolume, SampleCursor, Volume, VolumeSample};

/// Prelude module for convenient imports.
///
/// ```
/// use voxmerge_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::format::{Sample, ScalarKind};
    pub use crate::rect::Extent;
    pub use crate::volume::{AnyVolume, SampleCursor, Volume};
}
