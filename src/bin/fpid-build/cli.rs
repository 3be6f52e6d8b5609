//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// fpid-build - build orchestrator for the fpid project
#[derive(Parser)]
#[command(name = "fpid-build")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Remove build caches and the output directory, then exit
    #[arg(long)]
    pub clean: bool,

    /// Path to the build configuration file
    #[arg(long, default_value = "build_config.toml")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
