//! Inclusive 3D extents.
//!
//! An [`Extent`] names a box of voxels with inclusive bounds on every axis,
//! `[x0,x1]x[y0,y1]x[z0,z1]`. It describes both the whole region of a volume
//! and the tile one worker is responsible for.
//!
//! # Example
//!
//! ```rust
//! use voxmerge_core::Extent;
//!
//! let whole = Extent::from_dims([64, 64, 8]);
//! assert_eq!(whole.dims(), [64, 64, 8]);
//! assert_eq!(whole.rows(), 64 * 8);
//!
//! let tiles = whole.split(4);
//! assert_eq!(tiles.len(), 4);
//! assert_eq!(tiles.iter().map(|t| t.voxel_count()).sum::<u64>(), whole.voxel_count());
//! ```

use std::fmt;

use crate::{Error, Result};

/// Inclusive 3D voxel extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    /// X begin (inclusive)
    pub x0: i32,
    /// X end (inclusive)
    pub x1: i32,
    /// Y begin (inclusive)
    pub y0: i32,
    /// Y end (inclusive)
    pub y1: i32,
    /// Z begin (inclusive)
    pub z0: i32,
    /// Z end (inclusive)
    pub z1: i32,
}

impl Extent {
    /// Creates an extent from inclusive bounds.
    #[inline]
    pub const fn new(x0: i32, x1: i32, y0: i32, y1: i32, z0: i32, z1: i32) -> Self {
        Self { x0, x1, y0, y1, z0, z1 }
    }

    /// Creates the extent `[0,w-1]x[0,h-1]x[0,d-1]`.
    ///
    /// Zero dimensions yield an empty extent (see [`Extent::is_empty`]).
    #[inline]
    pub const fn from_dims(dims: [usize; 3]) -> Self {
        Self::new(
            0,
            dims[0] as i32 - 1,
            0,
            dims[1] as i32 - 1,
            0,
            dims[2] as i32 - 1,
        )
    }

    /// Returns `true` if any axis has its end before its begin.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.x1 < self.x0 || self.y1 < self.y0 || self.z1 < self.z0
    }

    /// Fails with [`Error::InvalidExtent`] for empty extents.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidExtent {
                extent: self.to_string(),
                reason: "end before begin".into(),
            });
        }
        Ok(())
    }

    /// Number of samples along X.
    #[inline]
    pub const fn width(&self) -> usize {
        if self.x1 < self.x0 { 0 } else { (self.x1 - self.x0) as usize + 1 }
    }

    /// Number of samples along Y.
    #[inline]
    pub const fn height(&self) -> usize {
        if self.y1 < self.y0 { 0 } else { (self.y1 - self.y0) as usize + 1 }
    }

    /// Number of samples along Z.
    #[inline]
    pub const fn depth(&self) -> usize {
        if self.z1 < self.z0 { 0 } else { (self.z1 - self.z0) as usize + 1 }
    }

    /// `[width, height, depth]`.
    #[inline]
    pub const fn dims(&self) -> [usize; 3] {
        [self.width(), self.height(), self.depth()]
    }

    /// Number of X rows (one per `(y, z)` pair).
    #[inline]
    pub const fn rows(&self) -> usize {
        self.height() * self.depth()
    }

    /// Total number of voxels.
    #[inline]
    pub fn voxel_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64 * self.depth() as u64
    }

    /// Returns `true` if the voxel lies inside the extent.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1 && z >= self.z0 && z <= self.z1
    }

    /// Returns `true` if `other` lies completely inside this extent.
    #[inline]
    pub const fn contains_extent(&self, other: &Extent) -> bool {
        other.x0 >= self.x0
            && other.x1 <= self.x1
            && other.y0 >= self.y0
            && other.y1 <= self.y1
            && other.z0 >= self.z0
            && other.z1 <= self.z1
    }

    /// Returns the overlapping region, if any.
    pub fn intersection(&self, other: &Extent) -> Option<Extent> {
        let e = Extent::new(
            self.x0.max(other.x0),
            self.x1.min(other.x1),
            self.y0.max(other.y0),
            self.y1.min(other.y1),
            self.z0.max(other.z0),
            self.z1.min(other.z1),
        );
        if e.is_empty() { None } else { Some(e) }
    }

    /// Returns `true` if the two extents share at least one voxel.
    #[inline]
    pub fn intersects(&self, other: &Extent) -> bool {
        self.intersection(other).is_some()
    }

    /// Splits the extent into at most `pieces` disjoint slabs.
    ///
    /// Slabs are cut along the slowest-varying axis that has more than one
    /// sample (Z, then Y, then X), so each slab stays a run of whole rows
    /// or slices where possible. The slabs cover the extent exactly.
    pub fn split(&self, pieces: usize) -> Vec<Extent> {
        if self.is_empty() {
            return Vec::new();
        }
        let pieces = pieces.max(1);

        let (lo, len) = if self.depth() > 1 {
            (self.z0, self.depth())
        } else if self.height() > 1 {
            (self.y0, self.height())
        } else {
            (self.x0, self.width())
        };

        let n = pieces.min(len);
        let base = len / n;
        let extra = len % n;

        let mut out = Vec::with_capacity(n);
        let mut start = lo;
        for i in 0..n {
            let size = (base + usize::from(i < extra)) as i32;
            let end = start + size - 1;
            let mut slab = *self;
            if self.depth() > 1 {
                slab.z0 = start;
                slab.z1 = end;
            } else if self.height() > 1 {
                slab.y0 = start;
                slab.y1 = end;
            } else {
                slab.x0 = start;
                slab.x1 = end;
            }
            out.push(slab);
            start = end + 1;
        }
        out
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{}]x[{},{}]x[{},{}]",
            self.x0, self.x1, self.y0, self.y1, self.z0, self.z1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dims() {
        let e = Extent::from_dims([4, 3, 2]);
        assert_eq!(e, Extent::new(0, 3, 0, 2, 0, 1));
        assert_eq!(e.dims(), [4, 3, 2]);
        assert_eq!(e.rows(), 6);
        assert_eq!(e.voxel_count(), 24);
    }

    #[test]
    fn test_empty() {
        let e = Extent::from_dims([0, 3, 2]);
        assert!(e.is_empty());
        assert_eq!(e.width(), 0);
        assert!(e.validate().is_err());
        assert!(e.split(4).is_empty());
    }

    #[test]
    fn test_contains() {
        let e = Extent::new(2, 5, 0, 0, -1, 1);
        assert!(e.contains(2, 0, -1));
        assert!(e.contains(5, 0, 1));
        assert!(!e.contains(6, 0, 0));
        assert!(e.contains_extent(&Extent::new(3, 4, 0, 0, 0, 0)));
        assert!(!e.contains_extent(&Extent::new(3, 6, 0, 0, 0, 0)));
    }

    #[test]
    fn test_intersection() {
        let a = Extent::from_dims([10, 10, 10]);
        let b = Extent::new(5, 15, 5, 15, 9, 20);
        assert_eq!(a.intersection(&b), Some(Extent::new(5, 9, 5, 9, 9, 9)));

        let c = Extent::new(10, 12, 0, 0, 0, 0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_split_along_z() {
        let e = Extent::from_dims([8, 8, 5]);
        let tiles = e.split(2);
        assert_eq!(tiles, vec![Extent::new(0, 7, 0, 7, 0, 2), Extent::new(0, 7, 0, 7, 3, 4)]);
    }

    #[test]
    fn test_split_falls_back_to_y_then_x() {
        let e = Extent::from_dims([8, 4, 1]);
        let tiles = e.split(8);
        assert_eq!(tiles.len(), 4);
        assert!(tiles.iter().all(|t| t.height() == 1 && t.width() == 8));

        let row = Extent::from_dims([6, 1, 1]);
        let tiles = row.split(3);
        assert_eq!(tiles.len(), 3);
        assert!(tiles.iter().all(|t| t.width() == 2));
    }

    #[test]
    fn test_split_is_disjoint_and_covering() {
        let e = Extent::new(-3, 9, 2, 7, 1, 13);
        let tiles = e.split(5);
        for (i, a) in tiles.iter().enumerate() {
            assert!(e.contains_extent(a));
            for b in &tiles[i + 1..] {
                assert!(!a.intersects(b));
            }
        }
        let total: u64 = tiles.iter().map(|t| t.voxel_count()).sum();
        assert_eq!(total, e.voxel_count());
    }

    #[test]
    fn test_display() {
        assert_eq!(Extent::new(0, 1, 2, 3, 4, 5).to_string(), "[0,1]x[2,3]x[4,5]");
    }
}
