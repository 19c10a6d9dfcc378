//! Merge orchestration.
//!
//! [`ColorMerge`] holds the per-channel color ranges and intensity remaps and
//! the [`MergeConfig`]. One call to [`ColorMerge::execute`]:
//!
//! 1. validates the channels, transfer function counts, output and tiles;
//! 2. builds every channel's transfer table once;
//! 3. resolves the element type once and runs the tiles on the worker pool.
//!
//! Any configuration problem is reported before step 3, with the output left
//! untouched.
//!
//! # Example
//!
//! ```rust
//! use voxmerge_core::{AnyVolume, Volume};
//! use voxmerge_lut::ColorRange;
//! use voxmerge_ops::{ColorMerge, ExecutionContext, MergeConfig, MergeStatus};
//!
//! let red: AnyVolume = Volume::from_vec(vec![255u8; 8], [2, 2, 2], 1).unwrap().into();
//! let green: AnyVolume = Volume::from_vec(vec![128u8; 8], [2, 2, 2], 1).unwrap().into();
//!
//! let mut merge = ColorMerge::new(MergeConfig::default());
//! merge.add_color_range(ColorRange::from_color([255, 0, 0]));
//! merge.add_color_range(ColorRange::from_color([0, 255, 0]));
//!
//! let (out, status) = merge.run(&[red, green], &ExecutionContext::default()).unwrap();
//! assert_eq!(status, MergeStatus::Completed);
//! assert_eq!(out.voxel(1, 1, 1), Some(&[255u8, 128, 0][..]));
//! ```

use tracing::{debug, warn};
use voxmerge_core::{AnyVolume, Extent, ScalarKind, Volume, VolumeSample};
use voxmerge_lut::{build_lookups, ChannelLookup, ColorRange, IntensityRemap};

use crate::config::MergeConfig;
use crate::output::{MergedVolume, OutputInfo, TileRows};
use crate::parallel::{default_tile_count, run_tiles, split_extent};
use crate::progress::ExecutionContext;
use crate::{OpsError, OpsResult};

/// Result of a merge that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStatus {
    /// Every tile was fully written.
    Completed,
    /// The abort flag stopped at least one worker; rows already written stay.
    Aborted,
}

impl MergeStatus {
    /// Returns `true` for [`MergeStatus::Completed`].
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Multichannel color merge.
#[derive(Debug, Clone, Default)]
pub struct ColorMerge {
    config: MergeConfig,
    colors: Vec<ColorRange>,
    remaps: Vec<IntensityRemap>,
}

impl ColorMerge {
    /// Creates a merge with no transfer functions.
    pub fn new(config: MergeConfig) -> Self {
        Self {
            config,
            colors: Vec::new(),
            remaps: Vec::new(),
        }
    }

    /// Current settings.
    #[inline]
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Replaces the settings.
    pub fn set_config(&mut self, config: MergeConfig) {
        self.config = config;
    }

    /// Appends the color range of the next channel.
    pub fn add_color_range(&mut self, color: ColorRange) {
        self.colors.push(color);
    }

    /// Appends the intensity remap of the next channel.
    ///
    /// Remaps are optional, but once any is given there must be one per channel.
    pub fn add_intensity_remap(&mut self, remap: IntensityRemap) {
        self.remaps.push(remap);
    }

    /// Removes all color ranges.
    pub fn clear_color_ranges(&mut self) {
        self.colors.clear();
    }

    /// Removes all intensity remaps.
    pub fn clear_intensity_remaps(&mut self) {
        self.remaps.clear();
    }

    /// Color ranges in channel order.
    pub fn color_ranges(&self) -> &[ColorRange] {
        &self.colors
    }

    /// Intensity remaps in channel order.
    pub fn intensity_remaps(&self) -> &[IntensityRemap] {
        &self.remaps
    }

    /// Output layout for the given whole region: `u8` with 3 or 4 components.
    pub fn output_info(&self, whole: Extent) -> OutputInfo {
        OutputInfo {
            extent: whole,
            components: self.config.output_components(),
            kind: ScalarKind::U8,
        }
    }

    /// Validates the channels against the transfer functions and builds the
    /// per-channel lookups.
    pub fn prepare(&self, channels: &[AnyVolume]) -> OpsResult<Vec<ChannelLookup>> {
        let first = channels.first().ok_or(OpsError::MissingInput)?;
        let kind = first.kind();

        for (i, ch) in channels.iter().enumerate() {
            if ch.kind() != kind {
                return Err(OpsError::MixedScalarKinds {
                    channel: i,
                    expected: kind,
                    got: ch.kind(),
                });
            }
            if ch.components() == 2 {
                return Err(OpsError::UnsupportedComponents {
                    channel: i,
                    components: 2,
                });
            }
        }

        let components: Vec<usize> = channels.iter().map(AnyVolume::components).collect();
        let remaps = (!self.remaps.is_empty()).then_some(self.remaps.as_slice());
        Ok(build_lookups(&components, &self.colors, remaps)?)
    }

    /// Merges `channels` into `output` over the given tiles.
    ///
    /// The tiles must be disjoint and inside the output; voxels outside every
    /// tile are not written. Every channel must cover the output region.
    pub fn execute(
        &self,
        channels: &[AnyVolume],
        output: &mut MergedVolume,
        tiles: &[Extent],
        ctx: &ExecutionContext,
    ) -> OpsResult<MergeStatus> {
        let lookups = self.prepare(channels)?;

        let expected = self.config.output_components();
        if output.components() != expected {
            return Err(OpsError::SizeMismatch(format!(
                "output has {} components, settings need {}",
                output.components(),
                expected
            )));
        }
        for (i, ch) in channels.iter().enumerate() {
            if !ch.extent().contains_extent(&output.extent()) {
                return Err(OpsError::SizeMismatch(format!(
                    "channel {} covers {}, output needs {}",
                    i,
                    ch.extent(),
                    output.extent()
                )));
            }
        }

        let alpha = self.config.alpha_mode();
        debug!(
            channels = channels.len(),
            kind = %channels[0].kind(),
            tiles = tiles.len(),
            alpha = ?alpha,
            extent = %output.extent(),
            "Merging channels"
        );

        let parts = output.partition(tiles)?;
        let outcomes = match channels[0].kind() {
            ScalarKind::I8 => self.dispatch::<i8>(channels, &lookups, parts, ctx),
            ScalarKind::U8 => self.dispatch::<u8>(channels, &lookups, parts, ctx),
            ScalarKind::I16 => self.dispatch::<i16>(channels, &lookups, parts, ctx),
            ScalarKind::U16 => self.dispatch::<u16>(channels, &lookups, parts, ctx),
            ScalarKind::I32 => self.dispatch::<i32>(channels, &lookups, parts, ctx),
            ScalarKind::U32 => self.dispatch::<u32>(channels, &lookups, parts, ctx),
            ScalarKind::F32 => self.dispatch::<f32>(channels, &lookups, parts, ctx),
            ScalarKind::F64 => self.dispatch::<f64>(channels, &lookups, parts, ctx),
        }?;

        let aborted = outcomes.iter().filter(|o| o.aborted).count();
        if aborted > 0 {
            warn!(
                tiles = aborted,
                rows = outcomes.iter().map(|o| o.rows_written).sum::<usize>(),
                "Merge aborted"
            );
            Ok(MergeStatus::Aborted)
        } else {
            Ok(MergeStatus::Completed)
        }
    }

    /// Allocates the output for the first channel's region, splits it into
    /// one tile per worker and merges.
    pub fn run(
        &self,
        channels: &[AnyVolume],
        ctx: &ExecutionContext,
    ) -> OpsResult<(MergedVolume, MergeStatus)> {
        self.run_tiled(channels, default_tile_count(), ctx)
    }

    /// Like [`ColorMerge::run`] with an explicit tile count.
    pub fn run_tiled(
        &self,
        channels: &[AnyVolume],
        tiles: usize,
        ctx: &ExecutionContext,
    ) -> OpsResult<(MergedVolume, MergeStatus)> {
        let whole = channels.first().ok_or(OpsError::MissingInput)?.extent();
        let mut output = MergedVolume::new(&self.output_info(whole))?;
        let tiles = split_extent(&whole, tiles);
        let status = self.execute(channels, &mut output, &tiles, ctx)?;
        Ok((output, status))
    }

    fn dispatch<T: VolumeSample>(
        &self,
        channels: &[AnyVolume],
        lookups: &[ChannelLookup],
        parts: Vec<TileRows<'_>>,
        ctx: &ExecutionContext,
    ) -> OpsResult<Vec<crate::kernel::TileOutcome>> {
        let typed = channels
            .iter()
            .enumerate()
            .map(|(i, ch)| {
                ch.as_volume::<T>().ok_or(OpsError::MixedScalarKinds {
                    channel: i,
                    expected: T::KIND,
                    got: ch.kind(),
                })
            })
            .collect::<OpsResult<Vec<&Volume<T>>>>()?;

        Ok(run_tiles(
            &typed,
            lookups,
            self.config.alpha_mode(),
            self.config.average_threshold,
            parts,
            ctx,
        ))
    }
}
