use std::path::{Path, PathBuf};

use crate::config::{CATALOGUE_FILE, LauncherConfig};
use crate::error::{LaunchError, Result};

pub const VERSION_MARKER_FILE: &str = "version.txt";
pub const BINDINGS_FILE: &str = "input_mapping.json";
pub const ADDONS_FILE: &str = "addons.json";

/// Storage locations for every experience. Pure path arithmetic, no I/O after `new`.
///
/// ```text
/// <install_root>/settings.json
/// <install_root>/version.txt                 id 0 marker
/// <install_root>/<data_dir>/<id>/download/   staged archives
/// <install_root>/<data_dir>/<id>/build/      extracted payload + marker
/// <install_root>/<data_dir>/<id>/config/     persisted overrides
/// ```
#[derive(Clone, Debug)]
pub struct PathLayout {
    install_root: PathBuf,
    data_root: PathBuf,
}

impl PathLayout {
    pub fn new(install_root: &Path, data_dir: &str) -> Result<Self> {
        if !install_root.is_dir() {
            return Err(LaunchError::MissingRoot(install_root.to_path_buf()));
        }
        Ok(Self {
            install_root: install_root.to_path_buf(),
            data_root: install_root.join(data_dir),
        })
    }

    pub fn from_config(cfg: &LauncherConfig) -> Result<Self> {
        Self::new(&cfg.install_root, &cfg.data_dir)
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn catalogue_path(&self) -> PathBuf {
        self.install_root.join(CATALOGUE_FILE)
    }

    pub fn experience_root(&self, id: u32) -> PathBuf {
        self.data_root.join(id.to_string())
    }

    pub fn download_path(&self, id: u32) -> PathBuf {
        self.experience_root(id).join("download")
    }

    pub fn build_path(&self, id: u32) -> PathBuf {
        self.experience_root(id).join("build")
    }

    pub fn config_path(&self, id: u32) -> PathBuf {
        self.experience_root(id).join("config")
    }

    pub fn addons_path(&self, id: u32, addon_type: &str) -> PathBuf {
        self.build_path(id).join("Addons").join(addon_type)
    }

    /// The launcher (id 0) keeps its marker beside the installation itself.
    pub fn version_marker_path(&self, id: u32) -> PathBuf {
        if id == 0 {
            self.install_root.join(VERSION_MARKER_FILE)
        } else {
            self.build_path(id).join(VERSION_MARKER_FILE)
        }
    }

    pub fn staged_archive_path(&self, id: u32, tag: &str) -> PathBuf {
        self.download_path(id).join(format!("{tag}.zip"))
    }

    pub fn bindings_template_path(&self, id: u32) -> PathBuf {
        self.build_path(id).join(BINDINGS_FILE)
    }

    pub fn bindings_override_path(&self, id: u32) -> PathBuf {
        self.config_path(id).join(BINDINGS_FILE)
    }

    pub fn addons_template_path(&self, id: u32) -> PathBuf {
        self.build_path(id).join(ADDONS_FILE)
    }

    pub fn addons_override_path(&self, id: u32) -> PathBuf {
        self.config_path(id).join(ADDONS_FILE)
    }
}
