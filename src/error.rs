//! Error taxonomy for the build pipeline.
//!
//! Every fatal pipeline condition maps to one variant here. Advisory
//! conditions (skipped gates, failed rustup installs) never become errors;
//! they are logged and the pipeline proceeds.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal build pipeline errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Cross-compilation was requested but required toolchain paths are
    /// missing from the config or absent on disk. Raised at construction
    /// time, before any environment is composed.
    #[error("invalid build configuration:\n{}", format_list(.missing))]
    Config { missing: Vec<String> },

    /// Required toolchain directories disappeared between configuration and
    /// the build. Lists every missing path at once.
    #[error("missing build dependencies:\n{}", format_list(.0))]
    DependencyMissing(Vec<String>),

    /// A tool with no skip path (cargo) is not installed.
    #[error("`{tool}` not found; install it and ensure it is on PATH")]
    ToolAbsent { tool: String },

    /// The automatic `cargo fmt` fix itself failed.
    #[error("code formatting failed and could not be fixed automatically; run `cargo fmt` manually\n{stderr}")]
    Format { stderr: String },

    /// Clippy reported diagnostics (warnings are treated as errors).
    #[error("lint check failed; fix the reported warnings and errors\n{stdout}\n{stderr}")]
    Lint { stdout: String, stderr: String },

    /// The release build exited non-zero.
    #[error("build failed\n{stderr}")]
    Build { stderr: String },

    /// The build claimed success but the expected binary is not there.
    #[error("compiled binary not found: {}", .0.display())]
    ArtifactMissing(PathBuf),

    /// Copying the binary into the output directory failed.
    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn format_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
