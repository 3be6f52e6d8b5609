//! The gated build pipeline.
//!
//! Stages run strictly in sequence: dependency validation, rustup target
//! installation (advisory), format gate, lint gate, release build, artifact
//! staging. Each stage gates the next; any fatal failure halts the pipeline
//! and is reported upward. Advisory outcomes are logged and the pipeline
//! proceeds.

pub mod artifact;
pub mod compile;
pub mod deps;
pub mod format;
pub mod lint;
pub mod rustup;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::{BuildConfig, BuildMode};
use crate::error::BuildError;
use crate::toolchain::ToolchainEnv;
use crate::util::process::{CommandRunner, CommandSpec, RunOutcome};

pub use artifact::StagedArtifact;

/// Per-stage outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// Stage completed successfully.
    Passed,
    /// Stage completed after one automatic recovery attempt.
    PassedWithRecovery,
    /// Stage failed fatally; the pipeline halted here.
    Failed(String),
    /// Optional stage bypassed (tool absent or advisory failure).
    Skipped(String),
}

impl StageOutcome {
    fn label(&self) -> &'static str {
        match self {
            StageOutcome::Passed => "[OK]",
            StageOutcome::PassedWithRecovery => "[FIXED]",
            StageOutcome::Failed(_) => "[FAIL]",
            StageOutcome::Skipped(_) => "[SKIP]",
        }
    }
}

/// Result of a single pipeline stage, for the final report.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub name: &'static str,
    pub outcome: StageOutcome,
    pub duration: Duration,
}

/// Complete pipeline run report.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub stages: Vec<StageReport>,
    pub total_duration: Duration,
    /// The staged binary, when the pipeline reached the end.
    pub artifact: Option<StagedArtifact>,
}

impl PipelineReport {
    fn push(&mut self, name: &'static str, outcome: StageOutcome, duration: Duration) {
        self.stages.push(StageReport {
            name,
            outcome,
            duration,
        });
    }

    /// Whether every stage passed or was skipped.
    pub fn passed(&self) -> bool {
        !self
            .stages
            .iter()
            .any(|s| matches!(s.outcome, StageOutcome::Failed(_)))
    }

    /// Render the report for display.
    pub fn render(&self, binary_name: &str, target: &str) -> String {
        let mut output = String::new();

        writeln!(output, "Build: {binary_name} ({target})").unwrap();
        writeln!(output, "{}", "=".repeat(50)).unwrap();

        for stage in &self.stages {
            writeln!(
                output,
                "  {:<7} {} ({:.2?})",
                stage.outcome.label(),
                stage.name,
                stage.duration
            )
            .unwrap();
            match &stage.outcome {
                StageOutcome::Failed(reason) | StageOutcome::Skipped(reason) => {
                    writeln!(output, "          {reason}").unwrap();
                }
                _ => {}
            }
        }

        let status = if self.passed() { "PASSED" } else { "FAILED" };
        writeln!(output, "Result: {status} ({} stages)", self.stages.len()).unwrap();
        writeln!(output, "Total time: {:.2?}", self.total_duration).unwrap();

        if let Some(artifact) = &self.artifact {
            writeln!(
                output,
                "Artifact: {} ({} bytes)",
                artifact.path.display(),
                artifact.size_bytes
            )
            .unwrap();
        }

        output
    }
}

/// Run a tool with the toolchain environment overlay applied.
pub(crate) fn run_tool(
    runner: &dyn CommandRunner,
    env: &ToolchainEnv,
    program: &str,
    args: &[&str],
) -> RunOutcome {
    let spec = CommandSpec::new(program)
        .args(args.iter().copied())
        .envs(env.vars());
    tracing::debug!("running: {}", spec.rendered());
    runner.run(&spec)
}

/// The sequential build pipeline.
pub struct Pipeline<'a> {
    config: &'a BuildConfig,
    mode: BuildMode,
    env: &'a ToolchainEnv,
    runner: &'a dyn CommandRunner,
    project_root: PathBuf,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a BuildConfig,
        mode: BuildMode,
        env: &'a ToolchainEnv,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Pipeline {
            config,
            mode,
            env,
            runner,
            project_root: PathBuf::from("."),
        }
    }

    /// Resolve build and output paths against an explicit project root
    /// instead of the current directory.
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// Run the full pipeline. Halts at the first fatal failure.
    pub fn run(&self) -> Result<PipelineReport, BuildError> {
        let started = Instant::now();
        let mut report = PipelineReport::default();

        self.stage(&mut report, "check dependencies", || {
            deps::validate(self.config, self.mode)
        })?;
        self.stage(&mut report, "rustup target", || {
            rustup::ensure_target(self.runner, self.env, &self.config.target)
        })?;
        self.stage(&mut report, "format check", || {
            format::run(self.runner, self.env)
        })?;
        self.stage(&mut report, "lint", || lint::run(self.runner, self.env))?;
        self.stage(&mut report, "build", || {
            compile::run(self.runner, self.env, self.config, self.mode)
        })?;

        // Artifact staging also produces the staged path and size.
        let stage_started = Instant::now();
        match artifact::stage(self.config, self.mode, &self.project_root) {
            Ok(staged) => {
                report.push("stage artifact", StageOutcome::Passed, stage_started.elapsed());
                report.artifact = Some(staged);
            }
            Err(e) => {
                report.push(
                    "stage artifact",
                    StageOutcome::Failed(e.to_string()),
                    stage_started.elapsed(),
                );
                return Err(e);
            }
        }

        report.total_duration = started.elapsed();
        Ok(report)
    }

    fn stage<F>(
        &self,
        report: &mut PipelineReport,
        name: &'static str,
        f: F,
    ) -> Result<(), BuildError>
    where
        F: FnOnce() -> Result<StageOutcome, BuildError>,
    {
        tracing::info!("{name}...");
        let started = Instant::now();
        match f() {
            Ok(outcome) => {
                match &outcome {
                    StageOutcome::Passed => tracing::info!("{name} passed"),
                    StageOutcome::PassedWithRecovery => {
                        tracing::info!("{name} passed after automatic fix")
                    }
                    StageOutcome::Skipped(reason) => tracing::warn!("{name} skipped: {reason}"),
                    StageOutcome::Failed(_) => {}
                }
                report.push(name, outcome, started.elapsed());
                Ok(())
            }
            Err(e) => {
                report.push(name, StageOutcome::Failed(e.to_string()), started.elapsed());
                Err(e)
            }
        }
    }
}

/// Resolve a possibly-relative path against the project root.
pub(crate) fn under_root(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
