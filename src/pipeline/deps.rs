//! Dependency validation before any expensive stage runs.

use crate::config::{BuildConfig, BuildMode};
use crate::error::BuildError;

use super::StageOutcome;

/// Confirm the required toolchain directories exist.
///
/// Native builds have no external dependencies. Cross builds require the
/// NDK and LLVM roots; every missing entry is collected so the user sees
/// the full list at once rather than one problem per run.
pub fn validate(config: &BuildConfig, mode: BuildMode) -> Result<StageOutcome, BuildError> {
    if mode == BuildMode::Native {
        return Ok(StageOutcome::Passed);
    }

    let required = [
        (config.ndk_root.as_deref(), "Android NDK"),
        (config.llvm_root.as_deref(), "LLVM"),
    ];

    let mut missing = Vec::new();
    for (path, name) in required {
        match path {
            Some(p) if p.exists() => {}
            Some(p) => missing.push(format!("{name}: {}", p.display())),
            None => missing.push(format!("{name}: not configured")),
        }
    }

    if missing.is_empty() {
        tracing::debug!("all toolchain dependencies present");
        Ok(StageOutcome::Passed)
    } else {
        Err(BuildError::DependencyMissing(missing))
    }
}
