//! # voxmerge-ops
//!
//! Tiled, multi-threaded merging of multichannel scalar volumes into one
//! displayable RGB(A) volume.
//!
//! # Modules
//!
//! - [`config`] - Merge settings and alpha modes
//! - [`kernel`] - The per-tile voxel merge
//! - [`merge`] - Validation, table building and dispatch
//! - [`output`] - Output buffer and its partitioning into tiles
//! - [`parallel`] - Tile execution on the worker pool
//! - [`progress`] - Abort flag and progress reporting
//!
//! # Example
//!
//! ```rust
//! use voxmerge_core::{AnyVolume, Volume};
//! use voxmerge_lut::ColorRange;
//! use voxmerge_ops::{AlphaMode, ColorMerge, ExecutionContext, MergeConfig};
//!
//! let dims = [16, 16, 4];
//! let dapi: AnyVolume = Volume::from_vec(vec![40u8; 1024], dims, 1).unwrap().into();
//! let gfp: AnyVolume = Volume::from_vec(vec![90u8; 1024], dims, 1).unwrap().into();
//!
//! let mut merge = ColorMerge::new(MergeConfig::new().with_alpha_mode(AlphaMode::Maximum));
//! merge.add_color_range(ColorRange::from_color([0, 0, 255]));
//! merge.add_color_range(ColorRange::from_color([0, 255, 0]));
//!
//! let (out, status) = merge.run_tiled(&[dapi, gfp], 4, &ExecutionContext::default()).unwrap();
//! assert!(status.is_complete());
//! assert_eq!(out.voxel(0, 0, 0), Some(&[0u8, 90, 40, 90][..]));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod config;
pub mod kernel;
pub mod merge;
pub mod output;
pub mod parallel;
pub mod progress;

pub use config::{AlphaMode, MergeConfig, DEFAULT_AVERAGE_THRESHOLD};
pub use error::{OpsError, OpsResult};
pub use merge::{ColorMerge, MergeStatus};
pub use output::{MergedVolume, OutputInfo, TileRows};
pub use progress::{AbortFlag, ExecutionContext, LogProgress, NoProgress, ProgressSink};
