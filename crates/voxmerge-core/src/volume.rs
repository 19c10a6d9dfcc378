//! Strided sample storage for one channel.
//!
//! A [`Volume`] owns the samples of one channel together with its extent,
//! component count and per-axis sample strides. Strides let a volume describe
//! a sub-region view of a larger buffer without copying.
//!
//! Reads during a merge go through a [`SampleCursor`], an explicit
//! `(offset, step)` pair that the kernel advances voxel by voxel.
//!
//! # Example
//!
//! ```rust
//! use voxmerge_core::Volume;
//!
//! // 2x2x1 RGB volume, packed
//! let data: Vec<u8> = (0..12).collect();
//! let vol = Volume::from_vec(data, [2, 2, 1], 3).unwrap();
//!
//! let mut cursor = vol.cursor_at(0, 1, 0);
//! assert_eq!(cursor.current(), 6);
//! assert_eq!(cursor.component(2), 8);
//! cursor.next_voxel();
//! assert_eq!(cursor.current(), 9);
//! ```

use crate::{Error, Extent, Result, Sample, ScalarKind};

/// One channel's samples with layout information.
#[derive(Debug, Clone)]
pub struct Volume<T: Sample> {
    data: Vec<T>,
    extent: Extent,
    components: usize,
    strides: [usize; 3],
}

impl<T: Sample> Volume<T> {
    /// Creates a zero-filled, packed volume covering `extent`.
    pub fn new(extent: Extent, components: usize) -> Result<Self> {
        extent.validate()?;
        let strides = packed_strides(extent.dims(), components)?;
        let len = required_len(extent.dims(), components, strides)?;
        Ok(Self {
            data: vec![T::default(); len],
            extent,
            components,
            strides,
        })
    }

    /// Wraps packed, interleaved samples for a volume of `dims` at the origin.
    pub fn from_vec(data: Vec<T>, dims: [usize; 3], components: usize) -> Result<Self> {
        let strides = packed_strides(dims, components)?;
        Self::from_parts(data, Extent::from_dims(dims), components, strides)
    }

    /// Wraps samples with explicit `[x, y, z]` strides (in samples).
    ///
    /// The X stride must cover all components of a voxel; every voxel of the
    /// extent must be addressable inside `data`.
    pub fn from_parts(
        data: Vec<T>,
        extent: Extent,
        components: usize,
        strides: [usize; 3],
    ) -> Result<Self> {
        extent.validate()?;
        if components == 0 {
            return Err(Error::invalid_layout("component count must be > 0"));
        }
        if strides[0] < components {
            return Err(Error::invalid_layout(format!(
                "x stride {} is less than component count {}",
                strides[0], components
            )));
        }
        let required = required_len(extent.dims(), components, strides)?;
        if data.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            extent,
            components,
            strides,
        })
    }

    /// Decodes packed little-endian bytes into a volume at the origin.
    pub fn from_le_bytes(bytes: &[u8], dims: [usize; 3], components: usize) -> Result<Self> {
        let size = T::KIND.size_bytes();
        let expected = dims[0]
            .checked_mul(dims[1])
            .and_then(|v| v.checked_mul(dims[2]))
            .and_then(|v| v.checked_mul(components))
            .ok_or_else(|| Error::invalid_dimensions(dims, "sample count overflows"))?;
        if bytes.len() != expected * size {
            return Err(Error::invalid_layout(format!(
                "expected {} bytes of {} data, got {}",
                expected * size,
                T::KIND,
                bytes.len()
            )));
        }
        let data = bytes.chunks_exact(size).map(T::from_le_slice).collect();
        Self::from_vec(data, dims, components)
    }

    /// Element type of the samples.
    #[inline]
    pub fn kind(&self) -> ScalarKind {
        T::KIND
    }

    /// Region covered by this volume.
    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// `[width, height, depth]`.
    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.extent.dims()
    }

    /// Components per voxel.
    #[inline]
    pub fn components(&self) -> usize {
        self.components
    }

    /// `[x, y, z]` sample strides.
    #[inline]
    pub fn strides(&self) -> [usize; 3] {
        self.strides
    }

    /// Raw sample storage.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Sample offset of the first component of voxel `(x, y, z)`.
    ///
    /// The voxel must lie inside the extent.
    #[inline]
    pub fn offset(&self, x: i32, y: i32, z: i32) -> usize {
        debug_assert!(self.extent.contains(x, y, z));
        (x - self.extent.x0) as usize * self.strides[0]
            + (y - self.extent.y0) as usize * self.strides[1]
            + (z - self.extent.z0) as usize * self.strides[2]
    }

    /// Component `c` of voxel `(x, y, z)`, or `None` outside the volume.
    pub fn get(&self, x: i32, y: i32, z: i32, c: usize) -> Option<T> {
        if !self.extent.contains(x, y, z) || c >= self.components {
            return None;
        }
        self.data.get(self.offset(x, y, z) + c).copied()
    }

    /// Sets component `c` of voxel `(x, y, z)`. Returns `false` outside the volume.
    pub fn set(&mut self, x: i32, y: i32, z: i32, c: usize, value: T) -> bool {
        if !self.extent.contains(x, y, z) || c >= self.components {
            return false;
        }
        let idx = self.offset(x, y, z) + c;
        match self.data.get_mut(idx) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Cursor positioned on voxel `(x, y, z)`, stepping along X.
    #[inline]
    pub fn cursor_at(&self, x: i32, y: i32, z: i32) -> SampleCursor<'_, T> {
        SampleCursor {
            data: &self.data,
            pos: self.offset(x, y, z),
            step: self.strides[0],
        }
    }
}

/// Read cursor over one channel's samples.
///
/// Holds an explicit sample offset and the X stride. The merge kernel reads
/// the components of the current voxel, then moves on with
/// [`SampleCursor::next_voxel`].
#[derive(Debug, Clone, Copy)]
pub struct SampleCursor<'a, T> {
    data: &'a [T],
    pos: usize,
    step: usize,
}

impl<T: Sample> SampleCursor<'_, T> {
    /// First component of the current voxel.
    #[inline(always)]
    pub fn current(&self) -> T {
        self.data[self.pos]
    }

    /// Component `k` of the current voxel.
    #[inline(always)]
    pub fn component(&self, k: usize) -> T {
        self.data[self.pos + k]
    }

    /// Moves the cursor forward by `k` samples.
    #[inline(always)]
    pub fn advance(&mut self, k: usize) {
        self.pos += k;
    }

    /// Moves the cursor to the next voxel along X.
    #[inline(always)]
    pub fn next_voxel(&mut self) {
        self.advance(self.step);
    }

    /// Current sample offset.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}

fn packed_strides(dims: [usize; 3], components: usize) -> Result<[usize; 3]> {
    if components == 0 {
        return Err(Error::invalid_layout("component count must be > 0"));
    }
    let sy = dims[0]
        .checked_mul(components)
        .ok_or_else(|| Error::invalid_dimensions(dims, "row size overflows"))?;
    let sz = sy
        .checked_mul(dims[1])
        .ok_or_else(|| Error::invalid_dimensions(dims, "slice size overflows"))?;
    Ok([components, sy, sz])
}

fn required_len(dims: [usize; 3], components: usize, strides: [usize; 3]) -> Result<usize> {
    if dims.contains(&0) {
        return Err(Error::invalid_dimensions(dims, "all dimensions must be > 0"));
    }
    let overflow = || Error::invalid_dimensions(dims, "sample offsets overflow");
    let mut last = 0usize;
    for axis in 0..3 {
        let span = (dims[axis] - 1).checked_mul(strides[axis]).ok_or_else(overflow)?;
        last = last.checked_add(span).ok_or_else(overflow)?;
    }
    last.checked_add(components).ok_or_else(overflow)
}

/// A volume whose element type is chosen at runtime.
///
/// Resolved once per merge into the generic [`Volume`] code path.
#[derive(Debug, Clone)]
pub enum AnyVolume {
    /// Signed 8-bit samples.
    I8(Volume<i8>),
    /// Unsigned 8-bit samples.
    U8(Volume<u8>),
    /// Signed 16-bit samples.
    I16(Volume<i16>),
    /// Unsigned 16-bit samples.
    U16(Volume<u16>),
    /// Signed 32-bit samples.
    I32(Volume<i32>),
    /// Unsigned 32-bit samples.
    U32(Volume<u32>),
    /// 32-bit float samples.
    F32(Volume<f32>),
    /// 64-bit float samples.
    F64(Volume<f64>),
}

macro_rules! any_volume_dispatch {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            AnyVolume::I8($v) => $body,
            AnyVolume::U8($v) => $body,
            AnyVolume::I16($v) => $body,
            AnyVolume::U16($v) => $body,
            AnyVolume::I32($v) => $body,
            AnyVolume::U32($v) => $body,
            AnyVolume::F32($v) => $body,
            AnyVolume::F64($v) => $body,
        }
    };
}

impl AnyVolume {
    /// Decodes packed little-endian bytes of the given kind.
    pub fn from_le_bytes(
        kind: ScalarKind,
        bytes: &[u8],
        dims: [usize; 3],
        components: usize,
    ) -> Result<Self> {
        Ok(match kind {
            ScalarKind::I8 => Self::I8(Volume::from_le_bytes(bytes, dims, components)?),
            ScalarKind::U8 => Self::U8(Volume::from_le_bytes(bytes, dims, components)?),
            ScalarKind::I16 => Self::I16(Volume::from_le_bytes(bytes, dims, components)?),
            ScalarKind::U16 => Self::U16(Volume::from_le_bytes(bytes, dims, components)?),
            ScalarKind::I32 => Self::I32(Volume::from_le_bytes(bytes, dims, components)?),
            ScalarKind::U32 => Self::U32(Volume::from_le_bytes(bytes, dims, components)?),
            ScalarKind::F32 => Self::F32(Volume::from_le_bytes(bytes, dims, components)?),
            ScalarKind::F64 => Self::F64(Volume::from_le_bytes(bytes, dims, components)?),
        })
    }

    /// Element type tag.
    pub fn kind(&self) -> ScalarKind {
        any_volume_dispatch!(self, v => v.kind())
    }

    /// Region covered by the volume.
    pub fn extent(&self) -> Extent {
        any_volume_dispatch!(self, v => v.extent())
    }

    /// Components per voxel.
    pub fn components(&self) -> usize {
        any_volume_dispatch!(self, v => v.components())
    }

    /// The typed volume, if the samples are of type `T`.
    #[inline]
    pub fn as_volume<T: VolumeSample>(&self) -> Option<&Volume<T>> {
        T::from_any(self)
    }
}

/// Sample types that can be recovered from an [`AnyVolume`].
pub trait VolumeSample: Sample {
    /// Borrows the typed volume if `any` holds this sample type.
    fn from_any(any: &AnyVolume) -> Option<&Volume<Self>>;
}

macro_rules! impl_from_volume {
    ($t:ty, $variant:ident) => {
        impl From<Volume<$t>> for AnyVolume {
            fn from(v: Volume<$t>) -> Self {
                AnyVolume::$variant(v)
            }
        }

        impl VolumeSample for $t {
            #[inline]
            fn from_any(any: &AnyVolume) -> Option<&Volume<Self>> {
                match any {
                    AnyVolume::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_from_volume!(i8, I8);
impl_from_volume!(u8, U8);
impl_from_volume!(i16, I16);
impl_from_volume!(u16, U16);
impl_from_volume!(i32, I32);
impl_from_volume!(u32, U32);
impl_from_volume!(f32, F32);
impl_from_volume!(f64, F64);
