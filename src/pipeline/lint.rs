//! Lint gate: clippy with warnings treated as errors.

use crate::error::BuildError;
use crate::toolchain::ToolchainEnv;
use crate::util::process::{CommandRunner, RunOutcome, ToolCapability};

use super::{run_tool, StageOutcome};

/// Run clippy. Any diagnostic is fatal; there is no recovery path.
pub fn run(runner: &dyn CommandRunner, env: &ToolchainEnv) -> Result<StageOutcome, BuildError> {
    match runner.capability("cargo-clippy") {
        ToolCapability::Available(_) => {}
        ToolCapability::Unavailable => {
            tracing::warn!(
                "cargo-clippy not found; skipping lint check. Install with `rustup component add clippy`"
            );
            return Ok(StageOutcome::Skipped("cargo-clippy not found".to_string()));
        }
        ToolCapability::FailedToRun(reason) => {
            tracing::warn!("could not probe cargo-clippy: {reason}");
            return Ok(StageOutcome::Skipped(reason));
        }
    }

    match run_tool(runner, env, "cargo", &["clippy", "--", "-D", "warnings"]) {
        RunOutcome::Completed(out) if out.success() => Ok(StageOutcome::Passed),
        RunOutcome::Completed(out) => Err(BuildError::Lint {
            stdout: out.stdout,
            stderr: out.stderr,
        }),
        RunOutcome::ToolMissing => {
            Ok(StageOutcome::Skipped("cargo-clippy not found".to_string()))
        }
        RunOutcome::SpawnFailed(reason) => {
            tracing::warn!("could not run cargo clippy: {reason}");
            Ok(StageOutcome::Skipped(reason))
        }
    }
}
