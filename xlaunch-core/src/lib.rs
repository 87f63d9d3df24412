#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod layout;

pub mod util {
    pub mod progress;
    pub mod sanitize;
    pub mod size;
}

pub mod archive;
pub mod release;

pub mod overlay;
pub mod store;

pub mod catalogue;
pub mod lifecycle;
pub mod report;

pub mod launcher;

// Re-exports: stable API surface
pub use archive::extract::extract;
pub use catalogue::{Catalogue, Experience, ExperienceData};
pub use config::LauncherConfig;
pub use error::{FaultKind, LaunchError, Result};
pub use launcher::Launcher;
pub use layout::PathLayout;
pub use lifecycle::{ExperienceLifecycle, LifecycleEvent, LifecycleFlags, LifecycleState};
pub use util::sanitize::clean;
