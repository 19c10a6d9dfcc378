//! Discrete intensity remapping.
//!
//! An [`IntensityRemap`] maps a raw intensity index to the index used for the
//! color lookup. It is applied once, while the channel's transfer table is
//! built, so the merge kernel never sees it.

use crate::{LutError, LutResult};

/// Discrete raw-index to remapped-index table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityRemap {
    table: Vec<i32>,
    identity: bool,
}

impl IntensityRemap {
    /// Identity remap with `len` entries.
    pub fn identity(len: usize) -> Self {
        Self {
            table: (0..len as i32).collect(),
            identity: true,
        }
    }

    /// Wraps an explicit table. Identity is detected from the contents.
    pub fn from_table(table: Vec<i32>) -> Self {
        let identity = table.iter().enumerate().all(|(i, &v)| v as i64 == i as i64);
        Self { table, identity }
    }

    /// Contrast stretch of `[min, max]` onto `[0, len - 1]` with a gamma curve.
    ///
    /// Indices at or below `min` map to 0, at or above `max` to `len - 1`.
    /// In between, `t = (x - min) / (max - min)` maps to
    /// `round(t^(1/gamma) * (len - 1))`.
    pub fn levels(len: usize, min: f64, max: f64, gamma: f64) -> LutResult<Self> {
        if len == 0 {
            return Err(LutError::InvalidSize("remap size must be > 0".into()));
        }
        if !(max > min) || !min.is_finite() || !max.is_finite() {
            return Err(LutError::InvalidRange { min, max });
        }
        if !(gamma > 0.0) || !gamma.is_finite() {
            return Err(LutError::InvalidSize(format!("gamma must be > 0, got {}", gamma)));
        }

        let top = (len - 1) as f64;
        let inv_gamma = 1.0 / gamma;
        let table = (0..len)
            .map(|x| {
                let x = x as f64;
                if x <= min {
                    0
                } else if x >= max {
                    top as i32
                } else {
                    let t = (x - min) / (max - min);
                    (t.powf(inv_gamma) * top).round() as i32
                }
            })
            .collect();
        Ok(Self::from_table(table))
    }

    /// Returns true if every index maps to itself.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the remap has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Remapped index for `x`, if `x` is covered.
    #[inline]
    pub fn get(&self, x: usize) -> Option<i32> {
        self.table.get(x).copied()
    }

    /// Raw table.
    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.table
    }
}
