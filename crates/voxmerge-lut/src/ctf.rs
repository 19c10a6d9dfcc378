//! Plain-text color transfer function node files.
//!
//! # Format
//!
//! ```text
//! # Comment
//! # x      r     g     b
//! 0        0.0   0.0   0.0
//! 255      1.0   0.5   0.0
//! ```
//!
//! One node per line: a domain position followed by three color components
//! in `[0, 1]`. Blank lines and lines starting with `#` are ignored.
//!
//! # Example
//!
//! ```rust
//! use voxmerge_lut::ctf;
//!
//! let text = "# magenta ramp\n0 0 0 0\n4095 1 0 1\n";
//! let range = ctf::parse(text.as_bytes()).unwrap();
//! assert_eq!(range.table_len().unwrap(), 4096);
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::{ColorRange, LutError, LutResult};

/// Reads a color range from a node file.
pub fn read<P: AsRef<Path>>(path: P) -> LutResult<ColorRange> {
    let file = File::open(path.as_ref())?;
    parse(BufReader::new(file))
}

/// Parses a color range from a reader.
pub fn parse<R: BufRead>(reader: R) -> LutResult<ColorRange> {
    let mut range = ColorRange::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let values = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>().map_err(|_| {
                    LutError::ParseError(format!("line {}: invalid number '{}'", lineno + 1, tok))
                })
            })
            .collect::<LutResult<Vec<f64>>>()?;

        if values.len() != 4 {
            return Err(LutError::ParseError(format!(
                "line {}: expected 4 values (x r g b), found {}",
                lineno + 1,
                values.len()
            )));
        }
        range.add_rgb_point(values[0], [values[1], values[2], values[3]]);
    }

    if range.is_empty() {
        return Err(LutError::ParseError("no nodes found".into()));
    }
    Ok(range)
}

/// Writes a color range as a node file.
pub fn write<P: AsRef<Path>>(path: P, range: &ColorRange) -> LutResult<()> {
    let file = File::create(path.as_ref())?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# x r g b")?;
    for node in range.nodes() {
        writeln!(
            w,
            "{} {:.6} {:.6} {:.6}",
            node.x, node.rgb[0], node.rgb[1], node.rgb[2]
        )?;
    }
    w.flush()?;
    Ok(())
}
