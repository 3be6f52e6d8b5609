//! fpid-build - Build orchestrator for the fpid project
//!
//! This crate drives a single-command release build of fpid, either for the
//! host platform or cross-compiled for ARM64 Android with an NDK/LLVM
//! toolchain, through a sequential gated pipeline: dependency validation,
//! rustup target installation (advisory), format check with one automatic
//! fix attempt, clippy with warnings-as-errors, the release build itself,
//! and artifact staging.

pub mod clean;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod toolchain;
pub mod util;

/// Test utilities and mocks for fpid-build unit tests.
///
/// Only available when running tests. Provides a mock command runner so the
/// pipeline can be exercised without spawning real processes.
#[cfg(test)]
pub mod test_support;

pub use config::{BuildConfig, BuildMode};
pub use error::BuildError;
pub use pipeline::{Pipeline, PipelineReport, StageOutcome};
pub use toolchain::ToolchainEnv;
