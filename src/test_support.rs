//! Test utilities and mocks for fpid-build unit tests.
//!
//! Provides [`MockRunner`], a [`CommandRunner`] that answers from scripted
//! expectations instead of spawning processes, so pipeline gates can be
//! exercised deterministically.
//!
//! # Example
//!
//! ```rust,ignore
//! let runner = MockRunner::new()
//!     .expect("cargo fmt --check", ok())
//!     .tool_missing("cargo-clippy");
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::util::process::{CommandOutput, CommandRunner, CommandSpec, RunOutcome, ToolCapability};

/// A successful run with empty output.
pub fn ok() -> RunOutcome {
    ok_with_stdout("")
}

/// A successful run with the given stdout.
pub fn ok_with_stdout(stdout: &str) -> RunOutcome {
    RunOutcome::Completed(CommandOutput {
        code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    })
}

/// A completed run with a non-zero exit code and the given stderr.
pub fn fail(code: i32, stderr: &str) -> RunOutcome {
    RunOutcome::Completed(CommandOutput {
        code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
    })
}

struct Expectation {
    cmd: String,
    outcome: RunOutcome,
    /// None = usable any number of times.
    times: Option<u32>,
    used: u32,
}

impl Expectation {
    fn available(&self) -> bool {
        self.times.map_or(true, |t| self.used < t)
    }
}

/// Command runner answering from scripted expectations.
///
/// Commands are matched on their full rendered command line, in declaration
/// order, skipping exhausted expectations. Every tool is reported as
/// available unless overridden with [`MockRunner::tool_missing`]. An
/// unexpected command panics the test.
pub struct MockRunner {
    expectations: Mutex<Vec<Expectation>>,
    capabilities: HashMap<String, ToolCapability>,
    calls: Mutex<Vec<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        MockRunner {
            expectations: Mutex::new(Vec::new()),
            capabilities: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Expect a command (reusable any number of times).
    pub fn expect(self, cmd: &str, outcome: RunOutcome) -> Self {
        self.push_expectation(cmd, outcome, None);
        self
    }

    /// Expect a command for a limited number of uses. Later declarations of
    /// the same command take over once earlier ones are exhausted.
    pub fn expect_times(self, cmd: &str, outcome: RunOutcome, times: u32) -> Self {
        self.push_expectation(cmd, outcome, Some(times));
        self
    }

    /// Report a tool as not installed.
    pub fn tool_missing(mut self, name: &str) -> Self {
        self.capabilities
            .insert(name.to_string(), ToolCapability::Unavailable);
        self
    }

    /// All commands that were run, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn push_expectation(&self, cmd: &str, outcome: RunOutcome, times: Option<u32>) {
        self.expectations.lock().unwrap().push(Expectation {
            cmd: cmd.to_string(),
            outcome,
            times,
            used: 0,
        });
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn capability(&self, program: &str) -> ToolCapability {
        self.capabilities
            .get(program)
            .cloned()
            .unwrap_or_else(|| ToolCapability::Available(PathBuf::from(program)))
    }

    fn run(&self, spec: &CommandSpec) -> RunOutcome {
        let rendered = spec.rendered();
        self.calls.lock().unwrap().push(rendered.clone());

        if self.capability(spec.program()) == ToolCapability::Unavailable {
            return RunOutcome::ToolMissing;
        }

        let mut expectations = self.expectations.lock().unwrap();
        for exp in expectations.iter_mut() {
            if exp.cmd == rendered && exp.available() {
                exp.used += 1;
                return exp.outcome.clone();
            }
        }

        panic!("unexpected command: {rendered}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expectations_match_in_order() {
        let runner = MockRunner::new()
            .expect_times("cargo fmt --check", fail(1, "dirty"), 1)
            .expect_times("cargo fmt --check", ok(), 1);

        let spec = CommandSpec::new("cargo").args(["fmt", "--check"]);
        assert!(matches!(
            runner.run(&spec),
            RunOutcome::Completed(out) if !out.success()
        ));
        assert!(matches!(
            runner.run(&spec),
            RunOutcome::Completed(out) if out.success()
        ));
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_missing_tool_reports_tool_missing() {
        let runner = MockRunner::new().tool_missing("cargo");
        assert_eq!(
            runner.capability("cargo"),
            ToolCapability::Unavailable
        );
        assert!(matches!(
            runner.run(&CommandSpec::new("cargo").arg("clean")),
            RunOutcome::ToolMissing
        ));
    }
}
