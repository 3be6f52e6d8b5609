//! Subprocess execution utilities.
//!
//! The pipeline never talks to `std::process` directly; it goes through the
//! [`CommandRunner`] seam so gates can be tested without spawning anything.
//! Tool availability is an explicit tri-state ([`ToolCapability`]) rather
//! than a "file not found" error caught somewhere downstream.

use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Availability of an external tool, checked before a gate runs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCapability {
    /// The tool was found at this path.
    Available(PathBuf),
    /// The tool binary does not exist on the search path.
    Unavailable,
    /// The lookup itself failed (unreadable PATH, broken entry).
    FailedToRun(String),
}

/// A command to execute: program, arguments, and an environment overlay.
///
/// The overlay is *added* to the inherited environment of the child; the
/// orchestrator's own process environment is never mutated.
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl CommandSpec {
    /// Create a new command spec for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Extend the environment overlay.
    pub fn envs(mut self, vars: &[(String, String)]) -> Self {
        self.env.extend(vars.iter().cloned());
        self
    }

    /// Get the program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the environment overlay.
    pub fn get_env(&self) -> &[(String, String)] {
        &self.env
    }

    /// Render the command line for log and error messages.
    pub fn rendered(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Captured output of a finished subprocess.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with code zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Outcome of attempting to run a command.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The process ran to completion (exit code may still be non-zero).
    Completed(CommandOutput),
    /// The program binary itself does not exist.
    ToolMissing,
    /// Spawn failed for a reason other than a missing binary.
    SpawnFailed(String),
}

/// Seam between the pipeline and the operating system.
///
/// Every external tool invocation is a blocking call that waits for process
/// exit and captures output in full before the pipeline inspects it.
pub trait CommandRunner {
    /// Detect whether a tool is available before deciding how a gate behaves.
    fn capability(&self, program: &str) -> ToolCapability;

    /// Run a command to completion, capturing stdout and stderr.
    fn run(&self, spec: &CommandSpec) -> RunOutcome;
}

/// Runner backed by real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn capability(&self, program: &str) -> ToolCapability {
        match which::which(program) {
            Ok(path) => ToolCapability::Available(path),
            Err(which::Error::CannotFindBinaryPath) => ToolCapability::Unavailable,
            Err(e) => ToolCapability::FailedToRun(e.to_string()),
        }
    }

    fn run(&self, spec: &CommandSpec) -> RunOutcome {
        let mut cmd = Command::new(spec.program());
        cmd.args(spec.get_args());
        for (key, value) in spec.get_env() {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        match cmd.output() {
            Ok(output) => RunOutcome::Completed(CommandOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => RunOutcome::ToolMissing,
            Err(e) => RunOutcome::SpawnFailed(e.to_string()),
        }
    }
}
