//! Best-effort rustup target installation.
//!
//! Every branch in this stage is advisory: a missing rustup, a failed query,
//! or a failed install is logged and the pipeline continues. The build stage
//! will surface the real error if the target genuinely cannot be used.

use crate::toolchain::ToolchainEnv;
use crate::util::process::{CommandRunner, RunOutcome, ToolCapability};

use super::{run_tool, StageOutcome};

/// Make sure the requested compilation target is registered with rustup.
pub fn ensure_target(
    runner: &dyn CommandRunner,
    env: &ToolchainEnv,
    target: &str,
) -> Result<StageOutcome, crate::error::BuildError> {
    match runner.capability("rustup") {
        ToolCapability::Available(_) => {}
        ToolCapability::Unavailable => {
            tracing::warn!(
                "rustup not found; skipping target check. Make sure `{target}` is installed"
            );
            return Ok(StageOutcome::Skipped("rustup not found".to_string()));
        }
        ToolCapability::FailedToRun(reason) => {
            tracing::warn!("could not probe rustup: {reason}");
            return Ok(StageOutcome::Skipped(reason));
        }
    }

    let installed = match run_tool(runner, env, "rustup", &["target", "list", "--installed"]) {
        RunOutcome::Completed(out) if out.success() => out.stdout,
        RunOutcome::Completed(_) => {
            tracing::warn!("querying installed rustup targets failed, continuing");
            return Ok(StageOutcome::Skipped("target query failed".to_string()));
        }
        RunOutcome::ToolMissing => {
            return Ok(StageOutcome::Skipped("rustup not found".to_string()));
        }
        RunOutcome::SpawnFailed(reason) => {
            tracing::warn!("could not run rustup: {reason}");
            return Ok(StageOutcome::Skipped(reason));
        }
    };

    if installed.split_whitespace().any(|t| t == target) {
        return Ok(StageOutcome::Passed);
    }

    tracing::info!("rustup target {target} not installed, attempting to install...");
    match run_tool(runner, env, "rustup", &["target", "add", target]) {
        RunOutcome::Completed(out) if out.success() => {
            tracing::info!("rustup target {target} installed");
            Ok(StageOutcome::Passed)
        }
        _ => {
            tracing::warn!(
                "automatic install failed; run `rustup target add {target}` manually"
            );
            Ok(StageOutcome::Skipped("target install failed".to_string()))
        }
    }
}
