//! Transfer table dump command

use crate::TableArgs;
use anyhow::{bail, Result};
use std::io::{self, BufWriter, Write};
use tracing::debug;
use voxmerge_lut::TransferTable;

pub fn run(args: TableArgs, verbose: u8) -> Result<()> {
    if args.step == 0 {
        bail!("--step must be positive");
    }

    let color = super::parse_color(&args.color)?;
    let remap = args
        .remap
        .as_deref()
        .map(|spec| super::build_remap(spec, &color, args.len))
        .transpose()?;
    let table = TransferTable::build(0, &color, remap.as_ref())?;

    let (lo, hi) = color.range()?;
    debug!(lo, hi, entries = table.len(), remapped = remap.is_some(), "Built transfer table");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if verbose > 0 {
        writeln!(out, "# range [{}, {}], {} entries", lo, hi, table.len())?;
    }
    writeln!(out, "# index r g b")?;
    for (i, [r, g, b]) in table.entries().iter().enumerate().step_by(args.step) {
        writeln!(out, "{} {} {} {}", i, r, g, b)?;
    }
    out.flush()?;

    Ok(())
}
