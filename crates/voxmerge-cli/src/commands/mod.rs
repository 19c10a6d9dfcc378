//! CLI command implementations

pub mod merge;
pub mod table;

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use voxmerge_core::{AnyVolume, ScalarKind};
use voxmerge_lut::{ctf, ColorRange, IntensityRemap};
use voxmerge_ops::AlphaMode;

/// Parses `WIDTHxHEIGHTxDEPTH`.
pub fn parse_dims(s: &str) -> Result<[usize; 3]> {
    let parts: Vec<&str> = s.split(['x', 'X']).collect();
    if parts.len() != 3 {
        bail!("Invalid dimensions '{}', expected WIDTHxHEIGHTxDEPTH", s);
    }
    let mut dims = [0usize; 3];
    for (d, p) in dims.iter_mut().zip(&parts) {
        *d = p
            .trim()
            .parse()
            .with_context(|| format!("Invalid dimension '{}' in '{}'", p, s))?;
        if *d == 0 {
            bail!("Dimensions must be positive: '{}'", s);
        }
    }
    Ok(dims)
}

/// Parses `PATH[:COMPONENTS]`. The suffix only counts when it is a number.
pub fn parse_input(s: &str) -> Result<(PathBuf, usize)> {
    if let Some((path, comps)) = s.rsplit_once(':') {
        if let Ok(n) = comps.parse::<usize>() {
            if n == 0 {
                bail!("Component count must be positive: '{}'", s);
            }
            return Ok((PathBuf::from(path), n));
        }
    }
    Ok((PathBuf::from(s), 1))
}

/// Named ramp colors.
fn named_color(name: &str) -> Option<[u8; 3]> {
    let rgb = match name.to_ascii_lowercase().as_str() {
        "red" => [255, 0, 0],
        "green" => [0, 255, 0],
        "blue" => [0, 0, 255],
        "cyan" => [0, 255, 255],
        "magenta" => [255, 0, 255],
        "yellow" => [255, 255, 0],
        "white" | "gray" | "grey" => [255, 255, 255],
        _ => return None,
    };
    Some(rgb)
}

/// Parses a channel color: `R,G,B`, a color name, or a node file path.
pub fn parse_color(s: &str) -> Result<ColorRange> {
    if let Some(rgb) = named_color(s) {
        return Ok(ColorRange::from_color(rgb));
    }
    if s.contains(',') {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<std::result::Result<Vec<u8>, _>>()
            .with_context(|| format!("Invalid color '{}', expected R,G,B in 0..=255", s))?;
        if parts.len() != 3 {
            bail!("Invalid color '{}', expected R,G,B", s);
        }
        return Ok(ColorRange::from_color([parts[0], parts[1], parts[2]]));
    }
    ctf::read(s).with_context(|| format!("Failed to load color file: {}", s))
}

/// Parses `MIN:MAX[:GAMMA]`.
pub fn parse_remap(s: &str) -> Result<(f64, f64, f64)> {
    let values = s
        .split(':')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<f64>, _>>()
        .with_context(|| format!("Invalid remap '{}', expected MIN:MAX[:GAMMA]", s))?;
    match values.as_slice() {
        [min, max] => Ok((*min, *max, 1.0)),
        [min, max, gamma] => Ok((*min, *max, *gamma)),
        _ => bail!("Invalid remap '{}', expected MIN:MAX[:GAMMA]", s),
    }
}

/// Builds the remap for a color range from a `MIN:MAX[:GAMMA]` spec.
///
/// The remap covers `len` entries, the color table length by default.
pub fn build_remap(spec: &str, color: &ColorRange, len: Option<usize>) -> Result<IntensityRemap> {
    let (min, max, gamma) = parse_remap(spec)?;
    let len = match len {
        Some(n) => n,
        None => color.table_len()?,
    };
    IntensityRemap::levels(len, min, max, gamma)
        .with_context(|| format!("Invalid remap '{}'", spec))
}

/// Parses an alpha mode name.
pub fn parse_alpha(s: &str) -> Result<AlphaMode> {
    let mode = match s.to_ascii_lowercase().as_str() {
        "none" | "off" => AlphaMode::None,
        "max" | "maximum" => AlphaMode::Maximum,
        "avg" | "average" => AlphaMode::Average,
        "lum" | "luminance" => AlphaMode::Luminance,
        other => bail!("Unknown alpha mode '{}' (none, max, average, luminance)", other),
    };
    Ok(mode)
}

/// Parses an element type name.
pub fn parse_kind(s: &str) -> Result<ScalarKind> {
    s.parse::<ScalarKind>()
        .with_context(|| format!("Unsupported element type '{}'", s))
}

/// Loads one raw channel volume.
pub fn load_channel(
    path: &Path,
    kind: ScalarKind,
    dims: [usize; 3],
    components: usize,
) -> Result<AnyVolume> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to load: {}", path.display()))?;
    AnyVolume::from_le_bytes(kind, &bytes, dims, components)
        .with_context(|| format!("Invalid volume: {}", path.display()))
}

/// Writes raw bytes to path
pub fn save_raw(path: &Path, data: &[u8]) -> Result<()> {
    std::fs::write(path, data).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Format byte count for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dims() {
        assert_eq!(parse_dims("512x256x40").unwrap(), [512, 256, 40]);
        assert_eq!(parse_dims("4X4X1").unwrap(), [4, 4, 1]);
        assert!(parse_dims("512x256").is_err());
        assert!(parse_dims("0x1x1").is_err());
        assert!(parse_dims("axbxc").is_err());
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("a.raw").unwrap(), (PathBuf::from("a.raw"), 1));
        assert_eq!(parse_input("rgb.raw:3").unwrap(), (PathBuf::from("rgb.raw"), 3));
        assert_eq!(
            parse_input("dir:with:colon/a.raw").unwrap(),
            (PathBuf::from("dir:with:colon/a.raw"), 1)
        );
        assert!(parse_input("a.raw:0").is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("255,0,0").unwrap(), ColorRange::from_color([255, 0, 0]));
        assert_eq!(parse_color("Green").unwrap(), ColorRange::from_color([0, 255, 0]));
        assert!(parse_color("256,0,0").is_err());
        assert!(parse_color("1,2").is_err());
        assert!(parse_color("/no/such/file.ctf").is_err());
    }

    #[test]
    fn test_parse_color_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fire.ctf");
        std::fs::write(&path, "# fire\n0 0 0 0\n100 1 0.5 0\n").unwrap();
        let range = parse_color(path.to_str().unwrap()).unwrap();
        assert_eq!(range.nodes().len(), 2);
        assert_eq!(range.table_len().unwrap(), 101);
    }

    #[test]
    fn test_parse_remap() {
        assert_eq!(parse_remap("10:200").unwrap(), (10.0, 200.0, 1.0));
        assert_eq!(parse_remap("10:200:0.5").unwrap(), (10.0, 200.0, 0.5));
        assert!(parse_remap("10").is_err());
        assert!(parse_remap("a:b").is_err());
    }

    #[test]
    fn test_build_remap_length() {
        let color = ColorRange::from_color([255, 0, 0]);
        assert_eq!(build_remap("0:255", &color, None).unwrap().len(), 256);
        assert_eq!(build_remap("0:255", &color, Some(1000)).unwrap().len(), 1000);
        assert!(build_remap("50:10", &color, None).is_err());
    }

    #[test]
    fn test_parse_alpha_and_kind() {
        assert_eq!(parse_alpha("max").unwrap(), AlphaMode::Maximum);
        assert_eq!(parse_alpha("Luminance").unwrap(), AlphaMode::Luminance);
        assert!(parse_alpha("median").is_err());
        assert_eq!(parse_kind("uint16").unwrap(), ScalarKind::U16);
        assert!(parse_kind("f16").is_err());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
    }
}
