//! Supported scalar element types.
//!
//! Every channel of a merge shares one element type. The set of types is
//! closed: it is resolved once per invocation into a generic code path, never
//! dispatched per voxel.
//!
//! # Types
//!
//! - [`ScalarKind`] - Runtime tag for the element type
//! - [`Sample`] - Compile-time trait implemented for each supported primitive
//!
//! # Usage
//!
//! ```rust
//! use voxmerge_core::format::{Sample, ScalarKind};
//!
//! let kind: ScalarKind = "uint16".parse().unwrap();
//! assert_eq!(kind, ScalarKind::U16);
//! assert_eq!(kind.size_bytes(), 2);
//!
//! assert_eq!(<u16 as Sample>::KIND, ScalarKind::U16);
//! assert_eq!(300u16.widen(), 300);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Runtime tag for a supported element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Signed 8-bit integer.
    I8,
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 16-bit integer.
    I16,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 32-bit integer.
    U32,
    /// 32-bit IEEE 754 float.
    F32,
    /// 64-bit IEEE 754 float.
    F64,
}

impl ScalarKind {
    /// All supported kinds.
    pub const ALL: [ScalarKind; 8] = [
        Self::I8,
        Self::U8,
        Self::I16,
        Self::U16,
        Self::I32,
        Self::U32,
        Self::F32,
        Self::F64,
    ];

    /// Bytes per sample.
    #[inline]
    pub const fn size_bytes(&self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    /// Whether this is a floating-point kind.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Whether this is a signed kind (floats count as signed).
    #[inline]
    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::F32 | Self::F64)
    }

    /// Canonical short name (`"u8"`, `"f32"`, ...).
    pub const fn name(&self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalarKind {
    type Err = Error;

    /// Parses short (`u8`), C-style (`uint8`, `unsigned char`) and float
    /// aliases (`float`, `double`). Anything else is unsupported.
    fn from_str(s: &str) -> Result<Self> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "i8" | "int8" | "char" | "signed char" => Self::I8,
            "u8" | "uint8" | "unsigned char" | "byte" => Self::U8,
            "i16" | "int16" | "short" => Self::I16,
            "u16" | "uint16" | "unsigned short" => Self::U16,
            "i32" | "int32" | "int" => Self::I32,
            "u32" | "uint32" | "unsigned int" => Self::U32,
            "f32" | "float32" | "float" => Self::F32,
            "f64" | "float64" | "double" => Self::F64,
            other => return Err(Error::unsupported_format(other)),
        };
        Ok(kind)
    }
}

/// A primitive element type a channel can be stored in.
///
/// `widen` is the accumulator conversion used by the merge kernel: integers
/// convert exactly, floats truncate toward zero (saturating, NaN becomes 0).
pub trait Sample: Copy + Default + Send + Sync + PartialOrd + fmt::Debug + 'static {
    /// Runtime tag for this type.
    const KIND: ScalarKind;

    /// Widens the sample into the kernel's integer accumulator type.
    fn widen(self) -> i64;

    /// Decodes one sample from exactly `KIND.size_bytes()` little-endian bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_sample {
    ($t:ty, $kind:expr) => {
        impl Sample for $t {
            const KIND: ScalarKind = $kind;

            #[inline(always)]
            fn widen(self) -> i64 {
                self as i64
            }

            #[inline]
            fn from_le_slice(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(&bytes[..std::mem::size_of::<$t>()]);
                <$t>::from_le_bytes(raw)
            }
        }
    };
}

impl_sample!(i8, ScalarKind::I8);
impl_sample!(u8, ScalarKind::U8);
impl_sample!(i16, ScalarKind::I16);
impl_sample!(u16, ScalarKind::U16);
impl_sample!(i32, ScalarKind::I32);
impl_sample!(u32, ScalarKind::U32);
impl_sample!(f32, ScalarKind::F32);
impl_sample!(f64, ScalarKind::F64);
