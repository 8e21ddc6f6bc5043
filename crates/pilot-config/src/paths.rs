//! Per-OS locations of the tier files.
//!
//! Three file-backed tiers exist:
//!
//! - **system**: machine-wide admin policy, read-only to this engine.
//!   `/etc/claude-pilot/policy.json` on Unix,
//!   `%ProgramData%\claude-pilot\policy.json` on Windows.
//! - **user**: per-user settings under the platform config directory
//!   (`~/.config/claude-pilot/settings.json` on Linux,
//!   `~/Library/Application Support/claude-pilot/settings.json` on macOS,
//!   `%APPDATA%\claude-pilot\settings.json` on Windows).
//! - **project**: `<project>/.claude/pilot.json`, only when a project path
//!   has been set on the resolver.

use std::path::{Path, PathBuf};

/// Directory name used under the platform config roots.
pub const APP_DIR: &str = "claude-pilot";

/// Locations of the file-backed tiers.
#[derive(Debug, Clone)]
pub struct TierPaths {
    /// Machine-wide admin policy file.
    pub system_file: PathBuf,
    /// Per-user settings file; `None` when no home directory can be
    /// determined, in which case the tier is treated as absent and user
    /// saves fail with a warning.
    pub user_file: Option<PathBuf>,
}

impl TierPaths {
    /// Discover the platform locations.
    #[must_use]
    pub fn discover() -> Self {
        let user_file = directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join(APP_DIR).join("settings.json"));
        Self {
            system_file: system_policy_file(),
            user_file,
        }
    }

    /// Build from explicit files, bypassing discovery (tests, embedders).
    #[must_use]
    pub fn from_files(system_file: impl Into<PathBuf>, user_file: impl Into<PathBuf>) -> Self {
        Self {
            system_file: system_file.into(),
            user_file: Some(user_file.into()),
        }
    }

    /// Project-tier settings file for a given project root.
    #[must_use]
    pub fn project_file(project_root: &Path) -> PathBuf {
        project_root.join(".claude").join("pilot.json")
    }
}

#[cfg(not(windows))]
fn system_policy_file() -> PathBuf {
    PathBuf::from("/etc").join(APP_DIR).join("policy.json")
}

#[cfg(windows)]
fn system_policy_file() -> PathBuf {
    std::env::var_os("ProgramData")
        .map_or_else(|| PathBuf::from(r"C:\ProgramData"), PathBuf::from)
        .join(APP_DIR)
        .join("policy.json")
}
