//! Build configuration loading and mode resolution.
//!
//! Configuration lives in `build_config.toml` under a `[paths]` table. The
//! raw file is deserialized with serde, then resolved into an immutable
//! [`BuildConfig`] plus a [`BuildMode`]. Mode is derived exactly once, from
//! the shape of the target triple and whether both toolchain roots are
//! supplied and present on disk; it is never re-evaluated mid-pipeline.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::BuildError;

/// Default Android API level, used to pick the NDK clang frontend
/// (`aarch64-linux-android<api>-clang`). 64-bit targets start at 21.
const DEFAULT_API_LEVEL: u32 = 33;

/// Raw on-disk configuration (`build_config.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Path and project settings
    pub paths: PathsSection,
}

/// The `[paths]` table of the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Android NDK root (required for cross builds)
    pub android_ndk_home: Option<PathBuf>,

    /// LLVM distribution root (required for cross builds)
    pub llvm_path: Option<PathBuf>,

    /// Android API level for the NDK clang frontend
    pub android_api_level: u32,

    /// Target triple to build for
    pub target: String,

    /// Base name of the produced binary
    pub binary_name: String,

    /// Directory the staged binary is copied into
    pub output_dir: PathBuf,
}

impl Default for PathsSection {
    fn default() -> Self {
        PathsSection {
            android_ndk_home: None,
            llvm_path: None,
            android_api_level: DEFAULT_API_LEVEL,
            target: host_triple().to_string(),
            binary_name: "fpid".to_string(),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl RawConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

/// How the build is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Compile for the host platform with the default toolchain.
    Native,
    /// Compile for a foreign target with an external NDK/LLVM toolchain.
    Cross,
}

/// Resolved, validated build configuration. Immutable after construction.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub ndk_root: Option<PathBuf>,
    pub llvm_root: Option<PathBuf>,
    pub api_level: u32,
    pub target: String,
    pub binary_name: String,
    pub output_dir: PathBuf,
}

impl BuildConfig {
    /// Resolve a raw config into a validated config and its build mode.
    ///
    /// In cross mode both toolchain roots must be set and exist on disk;
    /// every violation is collected and reported in a single error, before
    /// any toolchain environment is composed.
    pub fn resolve(raw: RawConfig) -> Result<(BuildConfig, BuildMode), BuildError> {
        let paths = raw.paths;
        let mode = resolve_mode(
            &paths.target,
            paths.android_ndk_home.as_deref(),
            paths.llvm_path.as_deref(),
        );

        if mode == BuildMode::Cross {
            let mut missing = Vec::new();
            check_cross_path(&mut missing, "android_ndk_home", paths.android_ndk_home.as_deref());
            check_cross_path(&mut missing, "llvm_path", paths.llvm_path.as_deref());
            if !missing.is_empty() {
                return Err(BuildError::Config { missing });
            }
        }

        let config = BuildConfig {
            ndk_root: paths.android_ndk_home,
            llvm_root: paths.llvm_path,
            api_level: paths.android_api_level,
            target: paths.target,
            binary_name: paths.binary_name,
            output_dir: paths.output_dir,
        };

        Ok((config, mode))
    }
}

fn check_cross_path(missing: &mut Vec<String>, field: &str, path: Option<&Path>) {
    match path {
        None => missing.push(format!("{field} is required for cross builds but not set")),
        Some(p) if !p.exists() => {
            missing.push(format!("{field}: {} does not exist", p.display()))
        }
        Some(_) => {}
    }
}

/// Derive the build mode from the triple shape and toolchain availability.
///
/// Native iff the triple looks like a host triple AND the cross toolchain is
/// not fully specified and present. A host-like triple with a complete
/// NDK/LLVM pair still selects Cross, matching the toolchain the user went
/// to the trouble of configuring.
fn resolve_mode(target: &str, ndk_root: Option<&Path>, llvm_root: Option<&Path>) -> BuildMode {
    let looks_native = target.ends_with("windows-msvc")
        || target.ends_with("windows-gnu")
        || target.ends_with("unknown-linux-gnu");

    let toolchain_present = matches!(
        (ndk_root, llvm_root),
        (Some(ndk), Some(llvm)) if ndk.exists() && llvm.exists()
    );

    if looks_native && !toolchain_present {
        BuildMode::Native
    } else {
        BuildMode::Cross
    }
}

/// Default target triple for the build host.
pub fn host_triple() -> &'static str {
    if cfg!(all(target_os = "windows", target_env = "msvc")) {
        "x86_64-pc-windows-msvc"
    } else if cfg!(target_os = "windows") {
        "x86_64-pc-windows-gnu"
    } else if cfg!(target_os = "macos") {
        "x86_64-apple-darwin"
    } else {
        "x86_64-unknown-linux-gnu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn raw_with(paths: PathsSection) -> RawConfig {
        RawConfig { paths }
    }

    #[test]
    fn test_defaults() {
        let paths = PathsSection::default();
        assert_eq!(paths.android_api_level, 33);
        assert_eq!(paths.binary_name, "fpid");
        assert_eq!(paths.output_dir, PathBuf::from("output"));
        assert!(paths.android_ndk_home.is_none());
        assert!(paths.llvm_path.is_none());
    }

    #[test]
    fn test_host_triple_without_toolchain_is_native() {
        for triple in [
            "x86_64-pc-windows-msvc",
            "x86_64-pc-windows-gnu",
            "x86_64-unknown-linux-gnu",
        ] {
            let (_, mode) = BuildConfig::resolve(raw_with(PathsSection {
                target: triple.to_string(),
                ..Default::default()
            }))
            .unwrap();
            assert_eq!(mode, BuildMode::Native, "triple: {triple}");
        }
    }

    #[test]
    fn test_android_triple_without_paths_is_config_error() {
        let err = BuildConfig::resolve(raw_with(PathsSection {
            target: "aarch64-linux-android".to_string(),
            ..Default::default()
        }))
        .unwrap_err();

        match err {
            BuildError::Config { missing } => {
                assert_eq!(missing.len(), 2);
                assert!(missing[0].contains("android_ndk_home"));
                assert!(missing[1].contains("llvm_path"));
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_android_triple_with_nonexistent_paths_cites_both() {
        let err = BuildConfig::resolve(raw_with(PathsSection {
            target: "aarch64-linux-android".to_string(),
            android_ndk_home: Some(PathBuf::from("/no/such/ndk")),
            llvm_path: Some(PathBuf::from("/no/such/llvm")),
            ..Default::default()
        }))
        .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("/no/such/ndk"));
        assert!(msg.contains("/no/such/llvm"));
    }

    #[test]
    fn test_android_triple_with_existing_paths_is_cross() {
        let tmp = TempDir::new().unwrap();
        let ndk = tmp.path().join("ndk");
        let llvm = tmp.path().join("llvm");
        std::fs::create_dir_all(&ndk).unwrap();
        std::fs::create_dir_all(&llvm).unwrap();

        let (config, mode) = BuildConfig::resolve(raw_with(PathsSection {
            target: "aarch64-linux-android".to_string(),
            android_ndk_home: Some(ndk.clone()),
            llvm_path: Some(llvm),
            ..Default::default()
        }))
        .unwrap();

        assert_eq!(mode, BuildMode::Cross);
        assert_eq!(config.ndk_root, Some(ndk));
    }

    #[test]
    fn test_host_triple_with_full_toolchain_prefers_cross() {
        let tmp = TempDir::new().unwrap();
        let ndk = tmp.path().join("ndk");
        let llvm = tmp.path().join("llvm");
        std::fs::create_dir_all(&ndk).unwrap();
        std::fs::create_dir_all(&llvm).unwrap();

        let (_, mode) = BuildConfig::resolve(raw_with(PathsSection {
            target: "x86_64-unknown-linux-gnu".to_string(),
            android_ndk_home: Some(ndk),
            llvm_path: Some(llvm),
            ..Default::default()
        }))
        .unwrap();

        assert_eq!(mode, BuildMode::Cross);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("build_config.toml");
        std::fs::write(
            &path,
            r#"
[paths]
target = "x86_64-pc-windows-msvc"
binary_name = "fpid"
output_dir = "out"
android_api_level = 30
"#,
        )
        .unwrap();

        let raw = RawConfig::load(&path).unwrap();
        assert_eq!(raw.paths.target, "x86_64-pc-windows-msvc");
        assert_eq!(raw.paths.output_dir, PathBuf::from("out"));
        assert_eq!(raw.paths.android_api_level, 30);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let tmp = TempDir::new().unwrap();
        let raw = RawConfig::load_or_default(&tmp.path().join("nope.toml")).unwrap();
        assert_eq!(raw.paths.binary_name, "fpid");
    }

    #[test]
    fn test_load_or_default_malformed_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "[paths\ntarget = ").unwrap();
        assert!(RawConfig::load_or_default(&path).is_err());
    }
}
