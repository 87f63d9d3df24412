//! Seams towards the presentation layer: error surface, localised strings, status keys.

use std::time::Duration;

use tracing::error;

use crate::config::STRING_NOT_FOUND;

/// Surface that shows an error to the user for roughly `duration`.
pub trait ErrorReporter: Send + Sync {
    fn report_error(&self, message: &str, duration: Duration);
}

/// Default reporter: errors go to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report_error(&self, message: &str, duration: Duration) {
        error!(display_secs = duration.as_secs(), "{}", message);
    }
}

/// Localised string lookup. Unknown keys answer [`STRING_NOT_FOUND`].
pub trait StringCatalog: Send + Sync {
    fn fetch_string(&self, group: &str, key: &str) -> String;
}

/// Built-in English strings for the `baseStrings` group.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseStrings;

impl StringCatalog for BaseStrings {
    fn fetch_string(&self, group: &str, key: &str) -> String {
        if group != "baseStrings" {
            return STRING_NOT_FOUND.to_string();
        }
        let s = match key {
            "info" => "Fetching version info...",
            "info_done" => "Version info fetched",
            "info_error" => "Could not fetch version info: ",
            "versionMissing" => "Not installed",
            "versionDownloadNeeded" => "Download required",
            "versionUpToDate" => "Up to date",
            "versionUpToDateMain" => "Launcher is up to date",
            "versionUpdateNeeded" => "Update available",
            "versionUpdateMainNeeded" => "Launcher update available",
            "download" => "Downloading...",
            "download_done" => "Download finished",
            "download_error" => "Download failed: ",
            "install" => "Installing...",
            "install_done" => "Installed",
            "install_error" => "Install failed: ",
            "launch_error" => "Launch failed: ",
            "update_done" => "Updated",
            "updatemain_done" => "Launcher update staged",
            "launchButton" => "Launch",
            "launchButton_running" => "Running",
            "settings_error" => "Settings file missing, a default one was created",
            "input_error_nomapping" => "Input mapping missing for this experience",
            "addons_error_noaddons" => "Add-on list missing for this experience",
            "addons_selector_download_error" => "Add-on download failed: ",
            "addons_selector_install_error" => "Add-on install failed: ",
            _ => STRING_NOT_FOUND,
        };
        s.to_string()
    }
}

/// Human-readable status, resolved through a [`StringCatalog`] by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKey {
    Info,
    InfoDone,
    InfoError,
    VersionMissing,
    DownloadNeeded,
    UpToDate,
    UpToDateMain,
    UpdateNeeded,
    UpdateMainNeeded,
    Download,
    DownloadDone,
    DownloadError,
    Install,
    InstallDone,
    InstallError,
    UpdateDone,
    UpdateMainDone,
    Running,
    LaunchError,
}

impl StatusKey {
    pub const GROUP: &'static str = "baseStrings";

    pub fn as_key(self) -> &'static str {
        match self {
            StatusKey::Info => "info",
            StatusKey::InfoDone => "info_done",
            StatusKey::InfoError => "info_error",
            StatusKey::VersionMissing => "versionMissing",
            StatusKey::DownloadNeeded => "versionDownloadNeeded",
            StatusKey::UpToDate => "versionUpToDate",
            StatusKey::UpToDateMain => "versionUpToDateMain",
            StatusKey::UpdateNeeded => "versionUpdateNeeded",
            StatusKey::UpdateMainNeeded => "versionUpdateMainNeeded",
            StatusKey::Download => "download",
            StatusKey::DownloadDone => "download_done",
            StatusKey::DownloadError => "download_error",
            StatusKey::Install => "install",
            StatusKey::InstallDone => "install_done",
            StatusKey::InstallError => "install_error",
            StatusKey::UpdateDone => "update_done",
            StatusKey::UpdateMainDone => "updatemain_done",
            StatusKey::Running => "launchButton_running",
            StatusKey::LaunchError => "launch_error",
        }
    }

    pub fn resolve(self, strings: &dyn StringCatalog) -> String {
        strings.fetch_string(Self::GROUP, self.as_key())
    }
}
