//! voxmerge - merge multichannel raw volumes into one RGB(A) volume
//!
//! Each input channel is colored through its transfer function and the
//! colors are summed per voxel, with an optional synthesized alpha.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "voxmerge")]
#[command(author, version, about = "Merge multichannel volumes into RGB(A)")]
#[command(long_about = "
Colors every channel of a multichannel volume through its own transfer
function and adds the colors into one 8-bit RGB or RGBA volume.

Inputs and output are raw, packed, little-endian files with X varying
fastest, then Y, then Z.

Examples:
  voxmerge merge -d 512x512x40 -t u16 -i dapi.raw -i gfp.raw -c 0,0,255 -c 0,255,0 -o rgb.raw
  voxmerge merge -d 256x256x8 -i a.raw -i b.raw -c red -c green --alpha max -o rgba.raw
  voxmerge merge -d 256x256x8 -i a.raw -c fire.ctf -r 20:200:0.8 -o out.raw
  voxmerge merge -d 64x64x64 -i rgb.raw:3 -i mask.raw -c 0,0,0 -c 255,255,0 -o out.raw
  voxmerge table -c 255,0,0 -r 10:240
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Also write the log to this file
    #[arg(long, global = true)]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge raw channel volumes into one RGB(A) volume
    #[command(visible_alias = "m")]
    Merge(MergeArgs),

    /// Print a channel's transfer table
    #[command(visible_alias = "t")]
    Table(TableArgs),
}

#[derive(Args)]
struct MergeArgs {
    /// Volume dimensions as WIDTHxHEIGHTxDEPTH
    #[arg(short, long)]
    dims: String,

    /// Element type of every input (u8, i16, u16, f32, ...)
    #[arg(short = 't', long = "type", default_value = "u8")]
    kind: String,

    /// Input channel, optionally with a component count (PATH[:COMPONENTS])
    #[arg(short, long = "input", required = true)]
    inputs: Vec<String>,

    /// Channel color: R,G,B, a color name or a node file (one per input)
    #[arg(short, long = "color", required = true)]
    colors: Vec<String>,

    /// Intensity remap MIN:MAX[:GAMMA] (none, or one per input)
    #[arg(short, long = "remap")]
    remaps: Vec<String>,

    /// Alpha mode: none, max, average or luminance
    #[arg(short, long)]
    alpha: Option<String>,

    /// Average alpha threshold
    #[arg(long)]
    threshold: Option<i64>,

    /// YAML merge settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of tiles (default: one per thread)
    #[arg(long)]
    tiles: Option<usize>,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct TableArgs {
    /// Color: R,G,B, a color name or a node file
    #[arg(short, long)]
    color: String,

    /// Intensity remap MIN:MAX[:GAMMA]
    #[arg(short, long)]
    remap: Option<String>,

    /// Remap length (default: table length)
    #[arg(long)]
    len: Option<usize>,

    /// Print only every Nth entry
    #[arg(long, default_value = "1")]
    step: usize,
}

/// Installs the fmt subscriber. `RUST_LOG` wins over `-v`.
///
/// The returned guard flushes the log file on drop.
fn init_logging(verbose: u8, log: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log {
        Some(path) => {
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log file: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log.as_deref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Merge(args) => commands::merge::run(args, cli.verbose),
        Commands::Table(args) => commands::table::run(args, cli.verbose),
    }
}
