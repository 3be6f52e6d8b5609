//! Artifact staging: locate the compiled binary and copy it to the output
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{BuildConfig, BuildMode};
use crate::error::BuildError;

use super::under_root;

/// A binary copied into the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Binary filename suffix for a target triple.
///
/// Decided by the target triple, not the host OS: a Windows binary
/// cross-built on Linux still gets `.exe`.
pub fn binary_suffix(target: &str) -> &'static str {
    if target.contains("windows") {
        ".exe"
    } else {
        ""
    }
}

/// Cargo's release output directory for the given mode.
///
/// Native builds run without `--target`, so cargo writes to
/// `target/release`; cross builds write to `target/<triple>/release`.
pub fn release_dir(mode: BuildMode, target: &str) -> PathBuf {
    match mode {
        BuildMode::Native => PathBuf::from("target").join("release"),
        BuildMode::Cross => PathBuf::from("target").join(target).join("release"),
    }
}

/// Copy the compiled binary into the output directory.
///
/// A missing source binary means either the build silently produced nothing
/// at the expected path or the target/output layout does not match; the
/// error names the path so the user can tell which.
pub fn stage(
    config: &BuildConfig,
    mode: BuildMode,
    project_root: &Path,
) -> Result<StagedArtifact, BuildError> {
    let filename = format!("{}{}", config.binary_name, binary_suffix(&config.target));
    let source = under_root(project_root, &release_dir(mode, &config.target)).join(&filename);

    if !source.exists() {
        return Err(BuildError::ArtifactMissing(source));
    }

    let output_dir = under_root(project_root, &config.output_dir);
    let dest = output_dir.join(&filename);

    let copy_err = |e| BuildError::Copy {
        from: source.clone(),
        to: dest.clone(),
        source: e,
    };

    fs::create_dir_all(&output_dir).map_err(copy_err)?;
    fs::copy(&source, &dest).map_err(copy_err)?;
    let size_bytes = fs::metadata(&dest).map_err(copy_err)?.len();

    tracing::info!("binary staged at {} ({size_bytes} bytes)", dest.display());

    Ok(StagedArtifact {
        path: dest,
        size_bytes,
    })
}
