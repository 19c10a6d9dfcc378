//! Tile execution over a worker pool.
//!
//! Each tile of a merge runs as one task on the Rayon pool; within a tile the
//! kernel is strictly sequential. Tiles are disjoint, so workers share only
//! read-only inputs, the abort flag and (for tile 0) the progress sink.
//!
//! Without the `parallel` feature the tiles run one after another on the
//! calling thread, with identical results.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;
use voxmerge_core::{Extent, Sample, Volume};
use voxmerge_lut::ChannelLookup;

use crate::config::AlphaMode;
use crate::kernel::{merge_tile, TileOutcome};
use crate::output::TileRows;
use crate::progress::ExecutionContext;

/// Number of tiles to cut a merge into by default: one per pool thread.
pub fn default_tile_count() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        1
    }
}

/// Splits `extent` into at most `pieces` disjoint slabs for the workers.
///
/// See [`Extent::split`] for the slab layout.
pub fn split_extent(extent: &Extent, pieces: usize) -> Vec<Extent> {
    let tiles = extent.split(pieces);
    debug!(extent = %extent, requested = pieces, tiles = tiles.len(), "Split output into tiles");
    tiles
}

/// Runs [`merge_tile`] for every tile, in parallel when available.
///
/// Returns one outcome per tile, in tile order.
pub fn run_tiles<T: Sample>(
    channels: &[&Volume<T>],
    lookups: &[ChannelLookup],
    alpha: AlphaMode,
    threshold: i64,
    tiles: Vec<TileRows<'_>>,
    ctx: &ExecutionContext,
) -> Vec<TileOutcome> {
    #[cfg(feature = "parallel")]
    let iter = tiles.into_par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = tiles.into_iter();

    iter.map(|mut rows| merge_tile(channels, lookups, alpha, threshold, &mut rows, ctx))
        .collect()
}
