use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::catalogue::ExperienceData;
use crate::error::{LaunchError, Result};

/// GitHub REST endpoint used when no override is configured.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Name of the per-install catalogue file.
pub const CATALOGUE_FILE: &str = "settings.json";

/// Value a binding slot carries while the user has not bound it.
pub const UNBOUND_PATH: &str = "Default";

/// Largest `addonId` a template may declare; the add-on store is dense up to it.
pub const MAX_ADDON_ID: u32 = 4096;

/// Sentinel the localisation store answers with for unknown keys.
pub const STRING_NOT_FOUND: &str = "String not found";

/// Top-level configuration for the launcher services.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Directory the launcher is installed in; holds the catalogue and the id-0 marker.
    pub install_root: PathBuf,
    /// Directory (relative to `install_root`) with one numbered folder per experience.
    pub data_dir: String,
    /// Base URL of the release API.
    pub api_base: String,
    /// User agent sent with every release request.
    pub user_agent: String,
    /// How long reported errors should stay visible, in seconds.
    pub error_display_secs: u64,
    /// Copy buffer used while extracting archives.
    pub extract_buffer_bytes: usize,
    /// Release repository of the launcher itself, used for the id-0 catalogue entry.
    pub launcher_owner: String,
    pub launcher_repo: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            install_root: PathBuf::from("."),
            data_dir: "experiences".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: "xlaunch".to_string(),
            error_display_secs: 5,
            extract_buffer_bytes: 64 * 1024, // 64 KB
            launcher_owner: "MoriyarnnOrg".to_string(),
            launcher_repo: "Interaction-Launcher".to_string(),
        }
    }
}

impl LauncherConfig {
    /// Loads a JSON config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| LaunchError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| LaunchError::Config(format!("{}: {e}", path.display())))
    }

    pub fn with_root(mut self, root: PathBuf) -> Self {
        self.install_root = root;
        self
    }

    pub fn error_display(&self) -> Duration {
        Duration::from_secs(self.error_display_secs)
    }

    /// Catalogue entry written when no catalogue exists yet.
    pub fn launcher_entry(&self) -> ExperienceData {
        ExperienceData {
            name: "Launcher".to_string(),
            result_folders: None,
            github_owner: self.launcher_owner.clone(),
            github_repo: self.launcher_repo.clone(),
            github_token: None,
            executable_name: None,
            asset_name: None,
            image_urls: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xlaunch.json");
        std::fs::write(&path, r#"{"data_dir":"apps","error_display_secs":2}"#).unwrap();

        let cfg = LauncherConfig::load(&path).unwrap();
        assert_eq!(cfg.data_dir, "apps");
        assert_eq!(cfg.error_display(), Duration::from_secs(2));
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.extract_buffer_bytes, 64 * 1024);
    }

    #[test]
    fn unreadable_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LauncherConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, LaunchError::Config(_)));
    }
}
