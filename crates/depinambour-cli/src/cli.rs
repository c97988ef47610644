//! CLI argument definitions for depinambour.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use depinambour_core::config::ColorMode;

#[derive(Parser, Debug)]
#[command(
    name = "depinambour",
    version,
    about = "Show which dependencies hold a module below a reference version",
    long_about = "Reads the module graph (`go mod graph` by default), finds every module that \
                  depends on the reference module's path at a lower version, and prints the \
                  affected paths from the main module as a tree."
)]
pub struct Cli {
    /// Reference module: `path` or `path@version`
    pub reference: String,

    /// Read the module graph from a file (`-` for stdin) instead of running the producer
    #[arg(short, long)]
    pub input: Option<String>,

    /// Module to use as the tree root (defaults to the parent of the first edge)
    #[arg(long)]
    pub root: Option<String>,

    /// Directory in which to run the producer
    #[arg(short = 'C', long)]
    pub dir: Option<PathBuf>,

    /// When to colour the output (overrides the config file)
    #[arg(long, value_enum)]
    pub color: Option<ColorArg>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorMode::Auto,
            ColorArg::Always => ColorMode::Always,
            ColorArg::Never => ColorMode::Never,
        }
    }
}

/// Parse command-line arguments into a [`Cli`] struct.
pub fn parse() -> Cli {
    Cli::parse()
}
