//! Merged RGB(A) output and its partitioning into tiles.
//!
//! The output of a merge is one packed `u8` buffer over the whole region with
//! 3 or 4 components per voxel. Before workers start, the buffer is split
//! into per-tile sets of row segments ([`TileRows`]); since tiles are
//! disjoint, every worker gets exclusive `&mut` access to exactly its voxels
//! and no locking is needed.

use voxmerge_core::{Extent, ScalarKind};

use crate::{OpsError, OpsResult};

/// Output layout published before any tile work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputInfo {
    /// Whole output region
    pub extent: Extent,
    /// 3 (RGB) or 4 (RGBA)
    pub components: usize,
    /// Always [`ScalarKind::U8`]
    pub kind: ScalarKind,
}

/// Packed, interleaved 8-bit RGB(A) volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedVolume {
    extent: Extent,
    components: usize,
    data: Vec<u8>,
}

impl MergedVolume {
    /// Zero-filled output for `info`.
    pub fn new(info: &OutputInfo) -> OpsResult<Self> {
        info.extent.validate()?;
        if info.kind != ScalarKind::U8 {
            return Err(OpsError::InvalidParameter(format!(
                "output must be u8, got {}",
                info.kind
            )));
        }
        if !matches!(info.components, 3 | 4) {
            return Err(OpsError::InvalidParameter(format!(
                "output must have 3 or 4 components, got {}",
                info.components
            )));
        }
        let len = usize::try_from(info.extent.voxel_count())
            .ok()
            .and_then(|n| n.checked_mul(info.components))
            .ok_or_else(|| OpsError::InvalidParameter("output size overflows".into()))?;
        Ok(Self {
            extent: info.extent,
            components: info.components,
            data: vec![0; len],
        })
    }

    /// Region covered.
    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Components per voxel.
    #[inline]
    pub fn components(&self) -> usize {
        self.components
    }

    /// Layout of this buffer.
    pub fn info(&self) -> OutputInfo {
        OutputInfo {
            extent: self.extent,
            components: self.components,
            kind: ScalarKind::U8,
        }
    }

    /// Raw interleaved bytes, X fastest, then Y, then Z.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the volume, returning its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Components of voxel `(x, y, z)`, or `None` outside the extent.
    pub fn voxel(&self, x: i32, y: i32, z: i32) -> Option<&[u8]> {
        if !self.extent.contains(x, y, z) {
            return None;
        }
        let [w, h, _] = self.extent.dims();
        let idx = ((z - self.extent.z0) as usize * h + (y - self.extent.y0) as usize) * w
            + (x - self.extent.x0) as usize;
        let start = idx * self.components;
        self.data.get(start..start + self.components)
    }

    /// Checks that `tiles` lie inside the output and are pairwise disjoint.
    pub fn validate_tiles(&self, tiles: &[Extent]) -> OpsResult<()> {
        for (i, tile) in tiles.iter().enumerate() {
            if tile.is_empty() {
                return Err(OpsError::InvalidTile(format!("tile {} {} is empty", i, tile)));
            }
            if !self.extent.contains_extent(tile) {
                return Err(OpsError::InvalidTile(format!(
                    "tile {} {} exceeds output {}",
                    i, tile, self.extent
                )));
            }
            if let Some(j) = tiles[..i].iter().position(|other| other.intersects(tile)) {
                return Err(OpsError::InvalidTile(format!(
                    "tile {} {} overlaps tile {} {}",
                    i, tile, j, tiles[j]
                )));
            }
        }
        Ok(())
    }

    /// Splits the buffer into one [`TileRows`] per tile.
    ///
    /// Row segments of each tile are ordered Z outer, Y inner. Voxels not
    /// covered by any tile are not handed out.
    pub fn partition(&mut self, tiles: &[Extent]) -> OpsResult<Vec<TileRows<'_>>> {
        self.validate_tiles(tiles)?;

        let comps = self.components;
        let [w, h, _] = self.extent.dims();
        let origin = self.extent;

        let mut parts: Vec<TileRows<'_>> = tiles
            .iter()
            .enumerate()
            .map(|(index, &tile)| TileRows {
                index,
                tile,
                rows: Vec::with_capacity(tile.rows()),
            })
            .collect();

        // Tile indices sorted by x0, so each row is cut left to right
        let mut by_x: Vec<usize> = (0..tiles.len()).collect();
        by_x.sort_by_key(|&i| tiles[i].x0);

        for (row_idx, row) in self.data.chunks_exact_mut(w * comps).enumerate() {
            let y = origin.y0 + (row_idx % h) as i32;
            let z = origin.z0 + (row_idx / h) as i32;

            let mut rest = row;
            let mut next_x = origin.x0;
            for &i in &by_x {
                let t = &tiles[i];
                if y < t.y0 || y > t.y1 || z < t.z0 || z > t.z1 {
                    continue;
                }
                let skip = (t.x0 - next_x) as usize * comps;
                let (_, tail) = std::mem::take(&mut rest).split_at_mut(skip);
                let (segment, tail) = tail.split_at_mut(t.width() * comps);
                parts[i].rows.push(segment);
                rest = tail;
                next_x = t.x1 + 1;
            }
        }

        Ok(parts)
    }
}

/// Exclusive view of one tile's output rows.
#[derive(Debug)]
pub struct TileRows<'a> {
    /// Position of the tile in the tile list; tile 0 reports progress
    pub index: usize,
    /// The tile
    pub tile: Extent,
    /// One segment of `width * components` bytes per row, Z outer, Y inner
    pub rows: Vec<&'a mut [u8]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(extent: Extent) -> MergedVolume {
        MergedVolume::new(&OutputInfo {
            extent,
            components: 3,
            kind: ScalarKind::U8,
        })
        .unwrap()
    }

    #[test]
    fn test_new_validates() {
        let extent = Extent::from_dims([2, 2, 2]);
        let bad = OutputInfo { extent, components: 2, kind: ScalarKind::U8 };
        assert!(MergedVolume::new(&bad).is_err());
        let bad = OutputInfo { extent, components: 3, kind: ScalarKind::U16 };
        assert!(MergedVolume::new(&bad).is_err());
        assert_eq!(rgb(extent).data().len(), 24);
    }

    #[test]
    fn test_voxel_access() {
        let out = rgb(Extent::new(1, 2, 0, 1, 0, 0));
        assert_eq!(out.voxel(1, 0, 0), Some(&[0u8, 0, 0][..]));
        assert_eq!(out.voxel(2, 1, 0), Some(&[0u8, 0, 0][..]));
        assert_eq!(out.voxel(0, 0, 0), None);
    }

    #[test]
    fn test_rejects_overlap_and_outside() {
        let out = rgb(Extent::from_dims([4, 4, 1]));
        let overlap = [Extent::new(0, 2, 0, 3, 0, 0), Extent::new(2, 3, 0, 3, 0, 0)];
        assert!(matches!(out.validate_tiles(&overlap), Err(OpsError::InvalidTile(_))));

        let outside = [Extent::new(0, 4, 0, 3, 0, 0)];
        assert!(matches!(out.validate_tiles(&outside), Err(OpsError::InvalidTile(_))));
    }

    #[test]
    fn test_partition_side_by_side_tiles() {
        let mut out = rgb(Extent::from_dims([4, 2, 2]));
        let tiles = [
            Extent::new(2, 3, 0, 1, 0, 1),
            Extent::new(0, 1, 0, 1, 0, 0),
            Extent::new(0, 1, 0, 1, 1, 1),
        ];
        {
            let mut parts = out.partition(&tiles).unwrap();
            assert_eq!(parts[0].rows.len(), 4);
            assert_eq!(parts[1].rows.len(), 2);
            assert_eq!(parts[2].rows.len(), 2);
            for part in parts.iter_mut() {
                let value = part.index as u8 + 1;
                for row in part.rows.iter_mut() {
                    assert_eq!(row.len(), 6);
                    row.fill(value);
                }
            }
        }
        assert_eq!(out.voxel(3, 1, 1), Some(&[1u8, 1, 1][..]));
        assert_eq!(out.voxel(0, 1, 0), Some(&[2u8, 2, 2][..]));
        assert_eq!(out.voxel(1, 0, 1), Some(&[3u8, 3, 3][..]));
    }

    #[test]
    fn test_partition_leaves_uncovered_voxels() {
        let mut out = rgb(Extent::from_dims([3, 1, 1]));
        {
            let mut parts = out.partition(&[Extent::new(1, 1, 0, 0, 0, 0)]).unwrap();
            parts[0].rows[0].fill(9);
        }
        assert_eq!(out.data(), &[0, 0, 0, 9, 9, 9, 0, 0, 0]);
    }
}
