//! The voxel merge kernel.
//!
//! [`merge_tile`] fills one tile of the output. For every voxel it sums the
//! color contributed by each channel (looked up through the channel's
//! transfer table, or taken directly from a pre-colored channel), saturates
//! the sums to 8 bits and optionally synthesizes alpha.
//!
//! # Alpha
//!
//! - [`AlphaMode::Maximum`] - largest channel value
//! - [`AlphaMode::Average`] - integer mean (truncated) of the values strictly
//!   above the threshold, 0 when no value exceeds it
//! - [`AlphaMode::Luminance`] - `round(0.30 R + 0.59 G + 0.11 B)` of the
//!   emitted color
//!
//! All accumulation is integer.

use tracing::trace;
use voxmerge_core::{Sample, SampleCursor, Volume};
use voxmerge_lut::ChannelLookup;

use crate::config::AlphaMode;
use crate::output::TileRows;
use crate::progress::{ExecutionContext, RowProgress};

/// How far a worker got through its tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileOutcome {
    /// Tile index
    pub index: usize,
    /// Rows fully written
    pub rows_written: usize,
    /// Worker stopped early because the abort flag was raised
    pub aborted: bool,
}

/// Merges one tile.
///
/// Walks the tile Z outer, Y middle, X inner. The abort flag is polled before
/// each row; once raised, the remaining rows are left untouched. The worker
/// owning tile 0 reports progress after completed rows.
///
/// `channels[i]` is colored by `lookups[i]`. Every channel must cover the
/// tile, and every row of `out` must hold `width * components` bytes, with 4
/// components when `alpha` is not [`AlphaMode::None`] and 3 otherwise.
pub fn merge_tile<T: Sample>(
    channels: &[&Volume<T>],
    lookups: &[ChannelLookup],
    alpha: AlphaMode,
    threshold: i64,
    out: &mut TileRows<'_>,
    ctx: &ExecutionContext,
) -> TileOutcome {
    debug_assert_eq!(channels.len(), lookups.len());

    let tile = out.tile;
    let height = tile.height();
    let comps = if alpha == AlphaMode::None { 3 } else { 4 };
    let mut progress = (out.index == 0).then(|| RowProgress::new(tile.rows(), tile.depth()));

    let mut outcome = TileOutcome {
        index: out.index,
        rows_written: 0,
        aborted: false,
    };

    for (row_idx, row) in out.rows.iter_mut().enumerate() {
        if ctx.abort.is_aborted() {
            outcome.aborted = true;
            break;
        }

        let slice = row_idx / height;
        let y = tile.y0 + (row_idx % height) as i32;
        let z = tile.z0 + slice as i32;

        let mut cursors: Vec<SampleCursor<'_, T>> =
            channels.iter().map(|v| v.cursor_at(tile.x0, y, z)).collect();

        for px in row.chunks_exact_mut(comps) {
            blend_voxel(&mut cursors, lookups, alpha, threshold, px);
        }
        outcome.rows_written += 1;

        if let Some(p) = progress.as_mut() {
            p.row_done(slice, ctx.progress.as_ref());
        }
    }

    trace!(
        tile = out.index,
        rows = outcome.rows_written,
        aborted = outcome.aborted,
        "Tile finished"
    );
    outcome
}

#[inline(always)]
fn blend_voxel<T: Sample>(
    cursors: &mut [SampleCursor<'_, T>],
    lookups: &[ChannelLookup],
    alpha_mode: AlphaMode,
    threshold: i64,
    px: &mut [u8],
) {
    let (mut r, mut g, mut b) = (0i64, 0i64, 0i64);
    let mut alpha = 0i64;
    let mut n = 0i64;

    for (cursor, lookup) in cursors.iter_mut().zip(lookups) {
        let curr = cursor.current().widen();

        match alpha_mode {
            AlphaMode::Maximum => alpha = alpha.max(curr),
            AlphaMode::Average if curr > threshold => {
                alpha += curr;
                n += 1;
            }
            _ => {}
        }

        match lookup {
            ChannelLookup::Table(table) => {
                let [cr, cg, cb] = table.lookup(curr);
                r += cr as i64;
                g += cg as i64;
                b += cb as i64;
            }
            ChannelLookup::PassThrough => {
                r += curr.max(0);
                g += cursor.component(1).widen().max(0);
                b += cursor.component(2).widen().max(0);
            }
        }

        cursor.next_voxel();
    }

    let out_r = r.min(255) as u8;
    let out_g = g.min(255) as u8;
    let out_b = b.min(255) as u8;
    px[0] = out_r;
    px[1] = out_g;
    px[2] = out_b;

    let alpha = match alpha_mode {
        AlphaMode::None => return,
        AlphaMode::Maximum => alpha,
        AlphaMode::Average if n > 0 => alpha / n,
        AlphaMode::Average => alpha,
        AlphaMode::Luminance => luminance(out_r, out_g, out_b),
    };
    px[3] = alpha.clamp(0, 255) as u8;
}

/// `round(0.30 r + 0.59 g + 0.11 b)`, half-up, in integer arithmetic.
#[inline(always)]
pub fn luminance(r: u8, g: u8, b: u8) -> i64 {
    (30 * r as i64 + 59 * g as i64 + 11 * b as i64 + 50) / 100
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{MergedVolume, OutputInfo};
    use voxmerge_core::{Extent, ScalarKind};
    use voxmerge_lut::{ColorRange, TransferTable};

    fn gray() -> ChannelLookup {
        ChannelLookup::Table(TransferTable::build(0, &ColorRange::grayscale(0.0, 255.0), None).unwrap())
    }

    /// Merges single voxels: `values[c]` is channel `c`'s sample.
    fn merge_voxel(values: &[u8], alpha: AlphaMode, threshold: i64) -> Vec<u8> {
        let vols: Vec<Volume<u8>> = values
            .iter()
            .map(|&v| Volume::from_vec(vec![v], [1, 1, 1], 1).unwrap())
            .collect();
        let refs: Vec<&Volume<u8>> = vols.iter().collect();
        let lookups = vec![gray(); values.len()];

        let extent = Extent::from_dims([1, 1, 1]);
        let comps = if alpha == AlphaMode::None { 3 } else { 4 };
        let mut out = MergedVolume::new(&OutputInfo { extent, components: comps, kind: ScalarKind::U8 }).unwrap();
        {
            let mut parts = out.partition(&[extent]).unwrap();
            merge_tile(&refs, &lookups, alpha, threshold, &mut parts[0], &ExecutionContext::default());
        }
        out.into_data()
    }

    #[test]
    fn test_luminance_rounding() {
        assert_eq!(luminance(100, 50, 10), 61);
        assert_eq!(luminance(255, 255, 255), 255);
        assert_eq!(luminance(0, 0, 0), 0);
        // 0.30 * 5 = 1.5 rounds up
        assert_eq!(luminance(5, 0, 0), 2);
    }

    #[test]
    fn test_maximum_alpha() {
        let px = merge_voxel(&[10, 200, 5], AlphaMode::Maximum, 10);
        assert_eq!(px[3], 200);
        // gray tables: 10 + 200 + 5 = 215
        assert_eq!(&px[..3], &[215, 215, 215]);
    }

    #[test]
    fn test_average_alpha_strict_threshold() {
        assert_eq!(merge_voxel(&[5, 15, 25], AlphaMode::Average, 10)[3], 20);
        // 10 does not exceed 10
        assert_eq!(merge_voxel(&[10, 10, 30], AlphaMode::Average, 10)[3], 30);
        assert_eq!(merge_voxel(&[1, 10, 3], AlphaMode::Average, 10)[3], 0);
        // (11 + 12) / 2 = 11.5 truncates
        assert_eq!(merge_voxel(&[11, 12], AlphaMode::Average, 10)[3], 11);
        assert_eq!(merge_voxel(&[11, 12, 14], AlphaMode::Average, 10)[3], 12);
    }

    #[test]
    fn test_luminance_alpha_uses_clamped_color() {
        // 200 + 200 saturates to 255 on every component
        assert_eq!(merge_voxel(&[200, 200], AlphaMode::Luminance, 10)[3], 255);
        assert_eq!(merge_voxel(&[40], AlphaMode::Luminance, 10)[3], 40);
    }

    #[test]
    fn test_no_alpha_writes_three_components() {
        assert_eq!(merge_voxel(&[1, 2], AlphaMode::None, 10), vec![3, 3, 3]);
    }

    #[test]
    fn test_pass_through_ignores_extra_components() {
        let rgba = Volume::from_vec(vec![20u16, 40, 60, 999, 1, 2, 3, 999], [2, 1, 1], 4).unwrap();
        let extent = rgba.extent();
        let mut out = MergedVolume::new(&OutputInfo { extent, components: 3, kind: ScalarKind::U8 }).unwrap();
        {
            let mut parts = out.partition(&[extent]).unwrap();
            merge_tile(
                &[&rgba],
                &[ChannelLookup::PassThrough],
                AlphaMode::None,
                10,
                &mut parts[0],
                &ExecutionContext::default(),
            );
        }
        assert_eq!(out.data(), &[20, 40, 60, 1, 2, 3]);
    }

    #[test]
    fn test_negative_samples() {
        let vol = Volume::from_vec(vec![-40i16, -2, 7], [1, 1, 1], 3).unwrap();
        let gray_vol = Volume::from_vec(vec![-5i16], [1, 1, 1], 1).unwrap();
        let extent = vol.extent();
        let mut out = MergedVolume::new(&OutputInfo { extent, components: 4, kind: ScalarKind::U8 }).unwrap();
        {
            let mut parts = out.partition(&[extent]).unwrap();
            merge_tile(
                &[&vol, &gray_vol],
                &[ChannelLookup::PassThrough, gray()],
                AlphaMode::Maximum,
                10,
                &mut parts[0],
                &ExecutionContext::default(),
            );
        }
        // negative components contribute nothing, negative lookup uses entry 0
        assert_eq!(out.data(), &[0, 0, 7, 0]);
    }
}
