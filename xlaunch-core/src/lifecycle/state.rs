use std::fmt;
use std::path::PathBuf;

use crate::error::FaultKind;
use crate::release::ReleaseDescriptor;
use crate::report::StatusKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    CheckingVersion,
    UpToDate,
    UpdateAvailable,
    DownloadRequired,
    Downloading,
    Installing,
    Ready,
    Launching,
    Running,
    Faulted(FaultKind),
}

impl LifecycleState {
    /// States a phase is actively driving.
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            LifecycleState::CheckingVersion
                | LifecycleState::Downloading
                | LifecycleState::Installing
                | LifecycleState::Launching
        )
    }

    /// States that only a version check leaves.
    pub fn needs_check(self) -> bool {
        matches!(self, LifecycleState::Uninitialized | LifecycleState::Faulted(_))
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Faulted(kind) => write!(f, "faulted ({kind:?})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Outcome of comparing the local marker with the remote tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    DownloadRequired,
    UpdateAvailable,
    UpToDate,
}

impl Classification {
    pub fn classify(local: Option<&str>, remote: &str) -> Self {
        match local {
            None => Classification::DownloadRequired,
            Some(tag) if tag == remote => Classification::UpToDate,
            Some(_) => Classification::UpdateAvailable,
        }
    }

    /// Status shown for this classification; the launcher has its own wording.
    pub fn status(self, launcher: bool) -> StatusKey {
        match (self, launcher) {
            (Classification::DownloadRequired, _) => StatusKey::DownloadNeeded,
            (Classification::UpToDate, false) => StatusKey::UpToDate,
            (Classification::UpToDate, true) => StatusKey::UpToDateMain,
            (Classification::UpdateAvailable, false) => StatusKey::UpdateNeeded,
            (Classification::UpdateAvailable, true) => StatusKey::UpdateMainNeeded,
        }
    }
}

impl From<Classification> for LifecycleState {
    fn from(c: Classification) -> Self {
        match c {
            Classification::DownloadRequired => LifecycleState::DownloadRequired,
            Classification::UpdateAvailable => LifecycleState::UpdateAvailable,
            Classification::UpToDate => LifecycleState::UpToDate,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionCheck {
    /// Tag read from the version marker; `None` when not installed.
    pub local: Option<String>,
    pub remote: ReleaseDescriptor,
    pub classification: Classification,
    /// `tag (size)` of the asset that would be downloaded.
    pub summary: String,
    /// The build folder had content but no marker.
    pub interrupted: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LifecycleFlags {
    pub can_launch: bool,
    pub can_download: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Download,
    Extract,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleEvent {
    State(LifecycleState),
    Status(StatusKey),
    Progress { phase: Phase, fraction: f32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Extracted into the build folder; the marker now holds `tag`.
    Installed { tag: String, files: usize, bytes: u64 },
    /// Launcher self-update: the archive is only staged.
    Staged { tag: String, archive: PathBuf },
}

impl InstallOutcome {
    pub fn tag(&self) -> &str {
        match self {
            InstallOutcome::Installed { tag, .. } | InstallOutcome::Staged { tag, .. } => tag,
        }
    }
}
