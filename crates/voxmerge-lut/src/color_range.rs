//! Piecewise-linear color transfer functions.
//!
//! A [`ColorRange`] maps a scalar domain `[lo, hi]` to RGB through a sorted
//! list of nodes, interpolating linearly between them and clamping outside
//! the first and last node. It is consumed by sampling it into a discrete
//! 8-bit table with [`ColorRange::sample_table`].
//!
//! # Example
//!
//! ```rust
//! use voxmerge_lut::ColorRange;
//!
//! // Black at 0 ramping to pure red at 255
//! let ctf = ColorRange::from_color([255, 0, 0]);
//! assert_eq!(ctf.range().unwrap(), (0.0, 255.0));
//!
//! let table = ctf.sample_table(0.0, 255.0, 256);
//! assert_eq!(table[0], [0, 0, 0]);
//! assert_eq!(table[255], [255, 0, 0]);
//! ```

use crate::{LutError, LutResult};

/// Largest `hi - lo` a color range may span when sampled into a table.
pub const MAX_TABLE_SPAN: f64 = u32::MAX as f64;

/// One node of a [`ColorRange`]: a domain position and an RGB color in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorNode {
    /// Domain position
    pub x: f64,
    /// Color components in `[0, 1]`
    pub rgb: [f64; 3],
}

/// Continuous scalar-to-RGB transfer function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorRange {
    nodes: Vec<ColorNode>,
}

impl ColorRange {
    /// Creates an empty color range. Add nodes with [`ColorRange::add_rgb_point`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Ramp from black at 0 to the given 8-bit color at 255.
    ///
    /// This is the usual transfer function for a single-color fluorescence
    /// channel.
    pub fn from_color(rgb: [u8; 3]) -> Self {
        let mut ctf = Self::new();
        ctf.add_rgb_point(0.0, [0.0, 0.0, 0.0]);
        ctf.add_rgb_point(
            255.0,
            [
                rgb[0] as f64 / 255.0,
                rgb[1] as f64 / 255.0,
                rgb[2] as f64 / 255.0,
            ],
        );
        ctf
    }

    /// Ramp from black at `lo` to white at `hi`.
    pub fn grayscale(lo: f64, hi: f64) -> Self {
        let mut ctf = Self::new();
        ctf.add_rgb_point(lo, [0.0; 3]);
        ctf.add_rgb_point(hi, [1.0; 3]);
        ctf
    }

    /// Inserts a node, keeping nodes sorted by `x`. A node at an existing
    /// position replaces it. Components are clamped to `[0, 1]`.
    pub fn add_rgb_point(&mut self, x: f64, rgb: [f64; 3]) {
        let node = ColorNode {
            x,
            rgb: rgb.map(|c| c.clamp(0.0, 1.0)),
        };
        match self.nodes.binary_search_by(|n| n.x.total_cmp(&x)) {
            Ok(i) => self.nodes[i] = node,
            Err(i) => self.nodes.insert(i, node),
        }
    }

    /// Nodes in ascending `x` order.
    #[inline]
    pub fn nodes(&self) -> &[ColorNode] {
        &self.nodes
    }

    /// Returns true if no nodes were added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Domain `(lo, hi)` spanned by the nodes.
    pub fn range(&self) -> LutResult<(f64, f64)> {
        match (self.nodes.first(), self.nodes.last()) {
            (Some(first), Some(last)) => Ok((first.x, last.x)),
            _ => Err(LutError::InvalidSize("color range has no nodes".into())),
        }
    }

    /// Number of integral entries covering the domain: `floor(hi - lo) + 1`.
    ///
    /// The span may not exceed [`MAX_TABLE_SPAN`], the widest range of a
    /// 32-bit integer channel.
    pub fn table_len(&self) -> LutResult<usize> {
        let (lo, hi) = self.range()?;
        let span = (hi - lo).floor();
        if !span.is_finite() || !(0.0..=MAX_TABLE_SPAN).contains(&span) {
            return Err(LutError::InvalidRange { min: lo, max: hi });
        }
        (span as usize)
            .checked_add(1)
            .ok_or(LutError::InvalidRange { min: lo, max: hi })
    }

    /// Evaluates the function at `x`.
    ///
    /// Returns black for an empty color range.
    pub fn color_at(&self, x: f64) -> [f64; 3] {
        let (first, last) = match (self.nodes.first(), self.nodes.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return [0.0; 3],
        };
        if x <= first.x {
            return first.rgb;
        }
        if x >= last.x {
            return last.rgb;
        }
        // First node strictly right of x; x is inside (first.x, last.x)
        let i = self.nodes.partition_point(|n| n.x <= x);
        let a = &self.nodes[i - 1];
        let b = &self.nodes[i];
        let t = (x - a.x) / (b.x - a.x);
        [
            a.rgb[0] + (b.rgb[0] - a.rgb[0]) * t,
            a.rgb[1] + (b.rgb[1] - a.rgb[1]) * t,
            a.rgb[2] + (b.rgb[2] - a.rgb[2]) * t,
        ]
    }

    /// Samples `n` evenly spaced 8-bit colors over `[lo, hi]`.
    ///
    /// Entry `i` is taken at `lo + i * (hi - lo) / (n - 1)`; with `n == 1` the
    /// single entry is taken at `lo`. Components are quantized with
    /// `floor(255 * c + 0.5)`.
    pub fn sample_table(&self, lo: f64, hi: f64, n: usize) -> Vec<[u8; 3]> {
        let step = if n > 1 { (hi - lo) / (n - 1) as f64 } else { 0.0 };
        (0..n)
            .map(|i| {
                let rgb = self.color_at(lo + i as f64 * step);
                rgb.map(quantize)
            })
            .collect()
    }
}

#[inline]
fn quantize(c: f64) -> u8 {
    (255.0 * c + 0.5).floor().clamp(0.0, 255.0) as u8
}
