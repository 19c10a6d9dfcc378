//! Channel merge command

use crate::MergeArgs;
use anyhow::{bail, Context, Result};
use std::time::Instant;
use tracing::{debug, info};
use voxmerge_ops::{
    parallel::default_tile_count, ColorMerge, ExecutionContext, LogProgress, MergeConfig,
    MergeStatus,
};

pub fn run(args: MergeArgs, verbose: u8) -> Result<()> {
    let dims = super::parse_dims(&args.dims)?;
    let kind = super::parse_kind(&args.kind)?;

    if args.colors.len() != args.inputs.len() {
        bail!(
            "{} inputs but {} colors; give one --color per --input",
            args.inputs.len(),
            args.colors.len()
        );
    }
    if !args.remaps.is_empty() && args.remaps.len() != args.inputs.len() {
        bail!(
            "{} inputs but {} remaps; give none or one --remap per --input",
            args.inputs.len(),
            args.remaps.len()
        );
    }

    let mut config = match &args.config {
        Some(path) => MergeConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => MergeConfig::default(),
    };
    if let Some(alpha) = &args.alpha {
        config = config.with_alpha_mode(super::parse_alpha(alpha)?);
    }
    if let Some(threshold) = args.threshold {
        config = config.with_threshold(threshold);
    }
    debug!(?config, "Merge settings");

    let mut merge = ColorMerge::new(config);
    for (i, spec) in args.colors.iter().enumerate() {
        let color = super::parse_color(spec)?;
        if let Some(remap) = args.remaps.get(i) {
            merge.add_intensity_remap(super::build_remap(remap, &color, None)?);
        }
        merge.add_color_range(color);
    }

    let mut channels = Vec::with_capacity(args.inputs.len());
    for spec in &args.inputs {
        let (path, components) = super::parse_input(spec)?;
        let volume = super::load_channel(&path, kind, dims, components)?;
        info!(path = %path.display(), kind = %kind, components, "Loaded channel");
        channels.push(volume);
    }

    if verbose > 0 {
        println!(
            "Merging {} {} channel(s) of {}x{}x{} -> {} components",
            channels.len(),
            kind,
            dims[0],
            dims[1],
            dims[2],
            merge.config().output_components()
        );
    }

    let tiles = args.tiles.unwrap_or_else(default_tile_count);
    let ctx = ExecutionContext::with_progress(LogProgress);
    let start = Instant::now();
    let (output, status) = merge
        .run_tiled(&channels, tiles, &ctx)
        .context("Merge failed")?;

    if status == MergeStatus::Aborted {
        bail!("Merge aborted");
    }
    info!(elapsed_ms = start.elapsed().as_millis() as u64, tiles, "Merge finished");

    super::save_raw(&args.output, output.data())?;

    if verbose > 0 {
        println!(
            "Wrote {} ({})",
            args.output.display(),
            super::format_size(output.data().len() as u64)
        );
    }

    Ok(())
}
