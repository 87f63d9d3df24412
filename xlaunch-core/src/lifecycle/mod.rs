//! Per-experience state machine: version check, download, install, launch.

pub mod experience;
pub mod latch;
pub mod state;

pub use experience::{ExperienceLifecycle, LifecycleContext};
pub use latch::{Latch, LatchGuard};
pub use state::{
    Classification, InstallOutcome, LifecycleEvent, LifecycleFlags, LifecycleState, Phase,
    VersionCheck,
};
