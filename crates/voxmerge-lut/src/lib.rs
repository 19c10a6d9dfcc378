//! # voxmerge-lut
//!
//! Lookup tables that color one channel of a multichannel volume.
//!
//! # Types
//!
//! - [`ColorRange`] - Piecewise-linear scalar-to-RGB transfer function
//! - [`IntensityRemap`] - Discrete remapping of raw intensities
//! - [`TransferTable`] - Both combined into an 8-bit RGB table indexed by intensity
//! - [`ChannelLookup`] - Table or pass-through, as consumed by the merge kernel
//!
//! # Usage
//!
//! ```rust
//! use voxmerge_lut::{ColorRange, IntensityRemap, TransferTable};
//!
//! let ctf = ColorRange::from_color([255, 0, 255]);
//! let remap = IntensityRemap::levels(256, 20.0, 200.0, 1.0).unwrap();
//! let table = TransferTable::build(0, &ctf, Some(&remap)).unwrap();
//!
//! assert_eq!(table.lookup(10), [0, 0, 0]);
//! assert_eq!(table.lookup(220), [255, 0, 255]);
//! ```
//!
//! # Used By
//!
//! - `voxmerge-ops` - Builds tables once per merge
//! - `voxmerge-cli` - Loads node files, dumps tables

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod color_range;
mod error;
mod remap;
mod transfer;
pub mod ctf;

pub use color_range::{ColorNode, ColorRange, MAX_TABLE_SPAN};
pub use error::{LutError, LutResult};
pub use remap::IntensityRemap;
pub use transfer::{build_lookups, ChannelLookup, TransferTable};
