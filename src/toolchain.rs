//! Cross-toolchain environment composition.
//!
//! For cross builds the downstream cargo invocation needs to know where the
//! NDK linker and the LLVM archiver live. Those settings are composed once
//! into an immutable [`ToolchainEnv`] overlay and handed to every subprocess
//! spawn; the orchestrator's own process environment is never mutated.
//!
//! Composition is a pure function of the config and the inherited search
//! path: composing twice yields byte-identical values.

use std::path::{Path, PathBuf};

use crate::config::{BuildConfig, BuildMode};

/// Candidate filename extensions for the NDK clang frontend, probed in
/// order. Some NDK releases ship `.cmd` wrappers, older ones `.bat`.
#[cfg(windows)]
const LINKER_EXTENSIONS: &[&str] = &[".cmd", ".bat"];
#[cfg(not(windows))]
const LINKER_EXTENSIONS: &[&str] = &["", ".cmd"];

#[cfg(windows)]
const EXE_SUFFIX: &str = ".exe";
#[cfg(not(windows))]
const EXE_SUFFIX: &str = "";

#[cfg(windows)]
const PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
const PATH_SEPARATOR: char = ':';

/// Environment overlay for the cross toolchain.
///
/// Empty for native builds. Created once per invocation and passed by
/// reference to every command the pipeline spawns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainEnv {
    vars: Vec<(String, String)>,
}

impl ToolchainEnv {
    /// Compose the toolchain environment for the given config and mode.
    pub fn compose(config: &BuildConfig, mode: BuildMode) -> Self {
        let inherited_path = std::env::var("PATH").unwrap_or_default();
        Self::compose_with_path(config, mode, &inherited_path)
    }

    /// Compose against an explicit inherited search path.
    pub fn compose_with_path(config: &BuildConfig, mode: BuildMode, inherited_path: &str) -> Self {
        if mode == BuildMode::Native {
            return ToolchainEnv::default();
        }

        // Mode resolution guarantees both roots are present in cross mode.
        let ndk_root = config.ndk_root.as_deref().unwrap_or_else(|| Path::new(""));
        let llvm_root = config.llvm_root.as_deref().unwrap_or_else(|| Path::new(""));

        let prebuilt_bin = ndk_prebuilt_dir(ndk_root).join("bin");
        let llvm_bin = llvm_root.join("bin");
        let linker = resolve_linker(&prebuilt_bin, &config.target, config.api_level);
        let sysroot_include = ndk_prebuilt_dir(ndk_root).join("sysroot/usr/include");

        let search_path = format!(
            "{}{sep}{}{sep}{}",
            llvm_bin.display(),
            prebuilt_bin.display(),
            inherited_path,
            sep = PATH_SEPARATOR,
        );

        let vars = vec![
            (
                "ANDROID_NDK_HOME".to_string(),
                ndk_root.display().to_string(),
            ),
            ("LLVM_PATH".to_string(), llvm_root.display().to_string()),
            (
                cargo_target_var(&config.target, "LINKER"),
                linker.display().to_string(),
            ),
            (
                cargo_target_var(&config.target, "AR"),
                llvm_bin.join(format!("llvm-ar{EXE_SUFFIX}")).display().to_string(),
            ),
            ("LIBCLANG_PATH".to_string(), llvm_bin.display().to_string()),
            (
                "BINDGEN_EXTRA_CLANG_ARGS".to_string(),
                format!(
                    "--target={} -I{}",
                    config.target,
                    sysroot_include.display()
                ),
            ),
            ("PATH".to_string(), search_path),
        ];

        ToolchainEnv { vars }
    }

    /// The composed variables, in a stable order.
    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }

    /// Look up a composed variable by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// NDK prebuilt toolchain directory for the build host.
fn ndk_prebuilt_dir(ndk_root: &Path) -> PathBuf {
    ndk_root
        .join("toolchains/llvm/prebuilt")
        .join(ndk_host_tag())
}

/// The NDK's name for the host platform directory.
fn ndk_host_tag() -> &'static str {
    if cfg!(windows) {
        "windows-x86_64"
    } else if cfg!(target_os = "macos") {
        "darwin-x86_64"
    } else {
        "linux-x86_64"
    }
}

/// Resolve the NDK clang frontend used as the cargo linker.
///
/// Probes the candidate extensions in order and takes the first one that
/// exists on disk. If none exists the primary candidate is kept anyway, so
/// the eventual link error names the path that was expected.
fn resolve_linker(prebuilt_bin: &Path, target: &str, api_level: u32) -> PathBuf {
    let stem = format!("{target}{api_level}-clang");
    let primary = prebuilt_bin.join(format!("{stem}{}", LINKER_EXTENSIONS[0]));

    for ext in LINKER_EXTENSIONS {
        let candidate = prebuilt_bin.join(format!("{stem}{ext}"));
        if candidate.exists() {
            return candidate;
        }
    }

    primary
}

/// Cargo's per-target override variable, e.g.
/// `CARGO_TARGET_AARCH64_LINUX_ANDROID_LINKER`.
fn cargo_target_var(target: &str, suffix: &str) -> String {
    format!(
        "CARGO_TARGET_{}_{suffix}",
        target.to_uppercase().replace('-', "_")
    )
}
