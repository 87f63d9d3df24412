use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "xlaunch experience launcher", long_about = None)]
pub struct Cli {
    /// Launcher install root (holds settings.json); defaults to the config value
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// JSON config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum BindingCommands {
    /// Print the merged input bindings
    Show { id: u32 },

    /// Set one binding path
    Set {
        id: u32,
        mode: String,
        action_map: String,
        action_name: String,
        control_type: String,
        binding_name: String,
        /// new control path, "Default" to unbind
        path: String,
        #[arg(long)]
        composite: bool,
        #[arg(long)]
        part_of_composite: bool,
    },
}

#[derive(Subcommand)]
pub enum AddonCommands {
    /// List add-ons grouped by type
    List { id: u32 },
    Enable { id: u32, addon_id: u32 },
    Disable { id: u32, addon_id: u32 },
    /// Download and unpack one add-on from the latest release
    Install { id: u32, addon_id: u32 },
}

#[derive(Subcommand)]
pub enum Commands {
    /// List catalogue entries with their installed version
    List,

    /// Compare the installed version with the latest release
    Check { id: u32 },

    /// Download and install the latest release (Ctrl-C cancels)
    Update { id: u32 },

    /// Install the archive already staged in the download folder
    Install { id: u32 },

    /// Run the experience and wait for it to exit
    Launch { id: u32 },

    /// Remove the install, keeping protected result folders
    Clean { id: u32 },

    #[command(subcommand)]
    /// Inspect or edit input bindings
    Bindings(BindingCommands),

    #[command(subcommand)]
    /// Inspect, toggle or install add-ons
    Addons(AddonCommands),

    /// Print the logical name a release asset file maps to
    AssetName { raw: String },
}
