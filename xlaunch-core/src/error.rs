use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("network failure: {0}")]
    Network(String),

    #[error("malformed release response: {0}")]
    MalformedResponse(String),

    #[error("archive corrupt: {0}")]
    ArchiveCorrupt(String),

    #[error("filesystem denied at {path}: {source}")]
    FilesystemDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing local asset: {0}")]
    MissingLocalAsset(PathBuf),

    #[error("missing root directory: {0}")]
    MissingRoot(PathBuf),

    #[error("release asset not found: {0}")]
    AssetNotFound(String),

    #[error("no override slot matches {0}")]
    UnknownOverrideKey(String),

    #[error("experience {0} is not installed")]
    NotInstalled(u32),

    #[error("experience {0} is busy")]
    Busy(u32),

    #[error("unknown experience {0}")]
    UnknownExperience(u32),

    #[error("operation cancelled")]
    Cancelled,

    #[error("process error: {0}")]
    Process(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Coarse failure classes carried by `Faulted` and shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultKind {
    Network,
    ArchiveCorrupt,
    FilesystemDenied,
    MissingLocalAsset,
    Process,
    Cancelled,
    Other,
}

impl LaunchError {
    pub fn kind(&self) -> FaultKind {
        match self {
            LaunchError::Network(_)
            | LaunchError::MalformedResponse(_)
            | LaunchError::AssetNotFound(_) => FaultKind::Network,
            LaunchError::ArchiveCorrupt(_) => FaultKind::ArchiveCorrupt,
            LaunchError::FilesystemDenied { .. } | LaunchError::Io(_) => {
                FaultKind::FilesystemDenied
            }
            LaunchError::MissingLocalAsset(_) | LaunchError::MissingRoot(_) => {
                FaultKind::MissingLocalAsset
            }
            LaunchError::Process(_) => FaultKind::Process,
            LaunchError::Cancelled => FaultKind::Cancelled,
            _ => FaultKind::Other,
        }
    }

    /// Wraps an I/O failure with the path it happened on.
    pub fn denied(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LaunchError::FilesystemDenied {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for LaunchError {
    fn from(e: reqwest::Error) -> Self {
        LaunchError::Network(e.to_string())
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, LaunchError>;
