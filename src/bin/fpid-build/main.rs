//! fpid-build CLI - one command to a quality-gated fpid release binary

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

use fpid_build::config::{BuildConfig, RawConfig};
use fpid_build::util::SystemRunner;
use fpid_build::{clean, Pipeline, ToolchainEnv};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("fpid_build=debug")
    } else {
        EnvFilter::new("fpid_build=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let runner = SystemRunner;

    // Clean takes precedence over the build pipeline and never fails the
    // process, even when the config file is unusable.
    if cli.clean {
        let raw = RawConfig::load_or_default(&cli.config).unwrap_or_else(|e| {
            tracing::warn!("{e:#}; using default paths for clean");
            RawConfig::default()
        });
        clean::clean(&runner, &ToolchainEnv::default(), &raw.paths.output_dir);
        return Ok(());
    }

    let raw = RawConfig::load_or_default(&cli.config)?;
    let (config, mode) = BuildConfig::resolve(raw)?;
    let env = ToolchainEnv::compose(&config, mode);

    let report = Pipeline::new(&config, mode, &env, &runner).run()?;
    eprint!("{}", report.render(&config.binary_name, &config.target));

    Ok(())
}
