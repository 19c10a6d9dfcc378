//! Per-channel transfer tables.
//!
//! A [`TransferTable`] combines a channel's [`ColorRange`] and optional
//! [`IntensityRemap`] into one array of 8-bit RGB triples indexed by the
//! channel's native intensity value. Tables are built once per merge and then
//! read concurrently by every worker.
//!
//! # Example
//!
//! ```rust
//! use voxmerge_lut::{build_lookups, ChannelLookup, ColorRange};
//!
//! let ranges = vec![ColorRange::from_color([0, 255, 0]), ColorRange::from_color([255, 0, 0])];
//! // second channel is already RGB
//! let lookups = build_lookups(&[1, 3], &ranges, None).unwrap();
//!
//! assert!(matches!(lookups[0], ChannelLookup::Table(_)));
//! assert!(lookups[1].is_pass_through());
//! ```

use tracing::{debug, trace};

use crate::{ColorRange, IntensityRemap, LutError, LutResult};

/// Integral-indexed RGB lookup for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTable {
    entries: Vec<[u8; 3]>,
}

impl TransferTable {
    /// Builds the table for one channel.
    ///
    /// The color range is sampled into `n = floor(hi - lo) + 1` entries. Entry
    /// `x` then receives color `remap[x]` when a non-identity remap is given,
    /// color `x` otherwise. Remapped indices are clamped into `[0, n)`.
    pub fn build(
        channel: usize,
        color: &ColorRange,
        remap: Option<&IntensityRemap>,
    ) -> LutResult<Self> {
        let (lo, hi) = color.range()?;
        let n = color.table_len()?;
        let map = color.sample_table(lo, hi, n);

        let remap = remap.filter(|r| !r.is_identity());
        let entries = match remap {
            None => map,
            Some(r) => {
                if r.len() < n {
                    return Err(LutError::RemapTooShort {
                        channel,
                        len: r.len(),
                        needed: n,
                    });
                }
                r.as_slice()[..n]
                    .iter()
                    .map(|&x| map[(x.max(0) as usize).min(n - 1)])
                    .collect()
            }
        };

        trace!(channel, entries = n, lo, hi, remapped = remap.is_some(), "Built transfer table");
        Ok(Self { entries })
    }

    /// Wraps precomputed entries.
    pub fn from_entries(entries: Vec<[u8; 3]>) -> LutResult<Self> {
        if entries.is_empty() {
            return Err(LutError::InvalidSize("transfer table must have entries".into()));
        }
        Ok(Self { entries })
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, indexed by intensity.
    #[inline]
    pub fn entries(&self) -> &[[u8; 3]] {
        &self.entries
    }

    /// Color for intensity `value`, clamped into the table.
    ///
    /// Values below 0 use the first entry, values past the end the last one.
    #[inline(always)]
    pub fn lookup(&self, value: i64) -> [u8; 3] {
        let last = self.entries.len() - 1;
        let idx = if value <= 0 { 0 } else { (value as u64).min(last as u64) as usize };
        self.entries[idx]
    }
}

/// How the merge kernel turns one channel's samples into color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelLookup {
    /// Single-component channel colored through its table.
    Table(TransferTable),
    /// Multi-component channel whose first three components are used as RGB.
    PassThrough,
}

impl ChannelLookup {
    /// Returns true for pre-colored channels.
    #[inline]
    pub fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough)
    }

    /// The transfer table, if this channel uses one.
    #[inline]
    pub fn table(&self) -> Option<&TransferTable> {
        match self {
            Self::Table(t) => Some(t),
            Self::PassThrough => None,
        }
    }
}

/// Builds the lookups for every channel of a merge.
///
/// `components[i]` is the component count of channel `i`. Channels with more
/// than one component become [`ChannelLookup::PassThrough`] and their color
/// range is not sampled.
///
/// Fails before building anything when the number of color ranges differs
/// from the number of channels, or when remaps are supplied but their number
/// differs from the number of channels.
pub fn build_lookups(
    components: &[usize],
    colors: &[ColorRange],
    remaps: Option<&[IntensityRemap]>,
) -> LutResult<Vec<ChannelLookup>> {
    let channels = components.len();
    if colors.len() != channels {
        return Err(LutError::CountMismatch {
            what: "color transfer functions",
            expected: channels,
            got: colors.len(),
        });
    }
    if let Some(remaps) = remaps {
        if remaps.len() != channels {
            return Err(LutError::CountMismatch {
                what: "intensity transfer functions",
                expected: channels,
                got: remaps.len(),
            });
        }
    }

    let lookups = components
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if c > 1 {
                return Ok(ChannelLookup::PassThrough);
            }
            let remap = remaps.map(|r| &r[i]);
            TransferTable::build(i, &colors[i], remap).map(ChannelLookup::Table)
        })
        .collect::<LutResult<Vec<_>>>()?;

    debug!(
        channels,
        tables = lookups.iter().filter(|l| !l.is_pass_through()).count(),
        "Built channel lookups"
    );
    Ok(lookups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_remap() {
        let table = TransferTable::build(0, &ColorRange::grayscale(0.0, 255.0), None).unwrap();
        assert_eq!(table.len(), 256);
        assert_eq!(table.lookup(200), [200, 200, 200]);
    }

    #[test]
    fn test_identity_remap_is_ignored() {
        let ctf = ColorRange::grayscale(0.0, 255.0);
        let plain = TransferTable::build(0, &ctf, None).unwrap();
        let remapped = TransferTable::build(0, &ctf, Some(&IntensityRemap::identity(256))).unwrap();
        assert_eq!(plain, remapped);
    }

    #[test]
    fn test_remap_reorders_entries() {
        let ctf = ColorRange::grayscale(0.0, 3.0);
        // 0 -> 0, 85, 170, 255 sampled colors
        let remap = IntensityRemap::from_table(vec![3, 3, 0, 1]);
        let table = TransferTable::build(0, &ctf, Some(&remap)).unwrap();
        assert_eq!(
            table.entries(),
            &[[255, 255, 255], [255, 255, 255], [0, 0, 0], [85, 85, 85]]
        );
    }

    #[test]
    fn test_remap_out_of_range_is_clamped() {
        let ctf = ColorRange::grayscale(0.0, 3.0);
        let remap = IntensityRemap::from_table(vec![-4, 9, 2, 3]);
        let table = TransferTable::build(0, &ctf, Some(&remap)).unwrap();
        assert_eq!(table.entries()[0], [0, 0, 0]);
        assert_eq!(table.entries()[1], [255, 255, 255]);
    }

    #[test]
    fn test_remap_too_short() {
        let ctf = ColorRange::grayscale(0.0, 255.0);
        let remap = IntensityRemap::from_table(vec![1, 0]);
        let err = TransferTable::build(2, &ctf, Some(&remap)).unwrap_err();
        assert!(matches!(err, LutError::RemapTooShort { channel: 2, len: 2, needed: 256 }));
    }

    #[test]
    fn test_lookup_clamps() {
        let table = TransferTable::from_entries(vec![[1, 1, 1], [2, 2, 2]]).unwrap();
        assert_eq!(table.lookup(-5), [1, 1, 1]);
        assert_eq!(table.lookup(1), [2, 2, 2]);
        assert_eq!(table.lookup(1_000_000), [2, 2, 2]);
        assert!(TransferTable::from_entries(vec![]).is_err());
    }

    #[test]
    fn test_build_rejects_oversized_range() {
        let err = TransferTable::build(0, &ColorRange::grayscale(0.0, 1e300), None).unwrap_err();
        assert!(matches!(err, LutError::InvalidRange { .. }));
    }

    #[test]
    fn test_build_lookups_counts() {
        let colors = vec![ColorRange::grayscale(0.0, 255.0); 2];
        let err = build_lookups(&[1, 1, 1], &colors, None).unwrap_err();
        assert!(matches!(err, LutError::CountMismatch { expected: 3, got: 2, .. }));

        let remaps = vec![IntensityRemap::identity(256)];
        let err = build_lookups(&[1, 1], &colors, Some(remaps.as_slice())).unwrap_err();
        assert!(matches!(err, LutError::CountMismatch { expected: 2, got: 1, .. }));
    }

    #[test]
    fn test_pass_through_skips_sampling() {
        // An empty color range would fail to sample; pass-through never samples it
        let colors = vec![ColorRange::grayscale(0.0, 255.0), ColorRange::new()];
        let lookups = build_lookups(&[1, 3], &colors, None).unwrap();
        assert!(lookups[0].table().is_some());
        assert!(lookups[1].is_pass_through());
    }
}
