//! The release build invocation.

use crate::config::{BuildConfig, BuildMode};
use crate::error::BuildError;
use crate::toolchain::ToolchainEnv;
use crate::util::process::{CommandRunner, RunOutcome, ToolCapability};

use super::{run_tool, StageOutcome};

/// Run `cargo build --release` for the resolved target.
///
/// Native builds omit the explicit `--target` argument; cross builds pass
/// it. Unlike the advisory gates, a missing cargo is fatal here since there
/// is no meaningful degradation.
pub fn run(
    runner: &dyn CommandRunner,
    env: &ToolchainEnv,
    config: &BuildConfig,
    mode: BuildMode,
) -> Result<StageOutcome, BuildError> {
    if !matches!(runner.capability("cargo"), ToolCapability::Available(_)) {
        return Err(BuildError::ToolAbsent {
            tool: "cargo".to_string(),
        });
    }

    let mut args = vec!["build", "--release"];
    if mode == BuildMode::Cross {
        args.push("--target");
        args.push(&config.target);
    }

    match run_tool(runner, env, "cargo", &args) {
        RunOutcome::Completed(out) if out.success() => Ok(StageOutcome::Passed),
        RunOutcome::Completed(out) => Err(BuildError::Build { stderr: out.stderr }),
        RunOutcome::ToolMissing => Err(BuildError::ToolAbsent {
            tool: "cargo".to_string(),
        }),
        RunOutcome::SpawnFailed(reason) => Err(BuildError::Build { stderr: reason }),
    }
}
