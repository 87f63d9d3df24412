pub mod handlers;

use crate::presentation::cli::{AddonCommands, BindingCommands, Cli, Commands};
use clap::Parser;
use xlaunch_core::error::Result;
use xlaunch_core::{Launcher, LauncherConfig};

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // needs no services
    if let Commands::AssetName { raw } = &cli.command {
        return handlers::handle_asset_name(raw);
    }

    let mut config = match &cli.config {
        Some(path) => LauncherConfig::load(path)?,
        None => LauncherConfig::default(),
    };
    if let Some(root) = cli.root {
        config = config.with_root(root);
    }
    let launcher = Launcher::new(config)?;

    match cli.command {
        Commands::List => handlers::handle_list(&launcher),
        Commands::Check { id } => handlers::handle_check(&launcher, id).await,
        Commands::Update { id } => handlers::handle_update(&launcher, id).await,
        Commands::Install { id } => handlers::handle_install(&launcher, id).await,
        Commands::Launch { id } => handlers::handle_launch(&launcher, id).await,
        Commands::Clean { id } => handlers::handle_clean(&launcher, id).await,
        Commands::Bindings(cmd) => match cmd {
            BindingCommands::Show { id } => handlers::handle_bindings_show(&launcher, id),
            BindingCommands::Set {
                id,
                mode,
                action_map,
                action_name,
                control_type,
                binding_name,
                path,
                composite,
                part_of_composite,
            } => handlers::handle_bindings_set(
                &launcher,
                id,
                mode,
                action_map,
                action_name,
                control_type,
                binding_name,
                path,
                composite,
                part_of_composite,
            ),
        },
        Commands::Addons(cmd) => match cmd {
            AddonCommands::List { id } => handlers::handle_addons_list(&launcher, id),
            AddonCommands::Enable { id, addon_id } => {
                handlers::handle_addons_toggle(&launcher, id, addon_id, true)
            }
            AddonCommands::Disable { id, addon_id } => {
                handlers::handle_addons_toggle(&launcher, id, addon_id, false)
            }
            AddonCommands::Install { id, addon_id } => {
                handlers::handle_addons_install(&launcher, id, addon_id).await
            }
        },
        Commands::AssetName { raw } => handlers::handle_asset_name(&raw),
    }
}
