//! Removal of build caches and the staged output directory.
//!
//! Clean is an independent entry point, not a pipeline stage. Nothing in it
//! is fatal: a failed `cargo clean` is logged and the output directory is
//! removed anyway, and removing an already-absent directory is a no-op.

use std::path::Path;

use crate::pipeline::run_tool;
use crate::toolchain::ToolchainEnv;
use crate::util::fs::remove_dir_all_if_exists;
use crate::util::process::{CommandRunner, RunOutcome};

/// Remove cargo's build cache and the output directory.
pub fn clean(runner: &dyn CommandRunner, env: &ToolchainEnv, output_dir: &Path) {
    match run_tool(runner, env, "cargo", &["clean"]) {
        RunOutcome::Completed(out) if out.success() => {
            tracing::info!("cargo clean finished");
        }
        RunOutcome::Completed(out) => {
            tracing::warn!("cargo clean failed: {}", out.stderr.trim());
        }
        RunOutcome::ToolMissing => {
            tracing::warn!("cargo not found; skipping cargo clean");
        }
        RunOutcome::SpawnFailed(reason) => {
            tracing::warn!("could not run cargo clean: {reason}");
        }
    }

    match remove_dir_all_if_exists(output_dir) {
        Ok(()) => tracing::info!("removed {}", output_dir.display()),
        Err(e) => tracing::warn!("{e:#}"),
    }
}
