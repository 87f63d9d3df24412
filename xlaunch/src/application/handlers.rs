use std::io::Write;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use xlaunch_core::error::{LaunchError, Result};
use xlaunch_core::lifecycle::{ExperienceLifecycle, InstallOutcome, LifecycleEvent};
use xlaunch_core::overlay::bindings::{ActionKey, BindingAddress, BindingKey};
use xlaunch_core::release::normalize_asset_name;
use xlaunch_core::util::size::format_size;
use xlaunch_core::Launcher;

fn spawn_progress(mut rx: broadcast::Receiver<LifecycleEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(LifecycleEvent::Progress { phase, fraction }) => {
                    eprint!("\r{phase:?} {:>5.1}%", fraction * 100.0);
                    let _ = std::io::stderr().flush();
                }
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Cancels the lifecycle's transfer on Ctrl-C.
fn spawn_interrupt(lc: Arc<ExperienceLifecycle>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!(id = lc.id(), "interrupted, cancelling");
            lc.cancel();
        }
    })
}

fn print_status(launcher: &Launcher, lc: &ExperienceLifecycle) {
    if let Some(key) = lc.status() {
        println!("{}", key.resolve(launcher.strings()));
    }
}

fn print_outcome(outcome: Option<InstallOutcome>) {
    match outcome {
        Some(InstallOutcome::Installed { tag, files, bytes }) => {
            println!("installed {tag}: {files} files, {}", format_size(bytes));
        }
        Some(InstallOutcome::Staged { tag, archive }) => {
            println!("staged {tag} at {}", archive.display());
        }
        None => println!("skipped: another operation is in progress"),
    }
}

pub fn handle_list(launcher: &Launcher) -> Result<()> {
    for lc in launcher.lifecycles() {
        let exp = lc.experience();
        let marker = launcher.layout().version_marker_path(exp.id);
        let local = std::fs::read_to_string(&marker)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| "None".to_string());
        println!(
            "{:>3}  {:<24} {:<12} {}/{}",
            exp.id, exp.name, local, exp.source.owner, exp.source.repo
        );
    }
    Ok(())
}

pub async fn handle_check(launcher: &Launcher, id: u32) -> Result<()> {
    let lc = launcher.lifecycle(id)?;
    let Some(check) = lc.check_version().await? else {
        println!("skipped: another operation is in progress");
        return Ok(());
    };
    println!(
        "local {}  latest {}",
        check.local.as_deref().unwrap_or("None"),
        check.summary
    );
    if check.interrupted {
        println!("previous install was interrupted");
    }
    print_status(launcher, &lc);
    let flags = lc.flags();
    println!(
        "can launch: {}  can download: {}",
        flags.can_launch, flags.can_download
    );
    Ok(())
}

pub async fn handle_update(launcher: &Launcher, id: u32) -> Result<()> {
    let lc = launcher.lifecycle(id)?;
    let progress = spawn_progress(lc.subscribe());
    let interrupt = spawn_interrupt(Arc::clone(&lc));

    let res = lc.download().await;
    progress.abort();
    interrupt.abort();
    eprintln!();

    print_outcome(res?);
    print_status(launcher, &lc);
    Ok(())
}

pub async fn handle_install(launcher: &Launcher, id: u32) -> Result<()> {
    let lc = launcher.lifecycle(id)?;
    let progress = spawn_progress(lc.subscribe());
    let res = lc.install().await;
    progress.abort();
    eprintln!();

    print_outcome(res?);
    print_status(launcher, &lc);
    Ok(())
}

pub async fn handle_launch(launcher: &Launcher, id: u32) -> Result<()> {
    let lc = launcher.lifecycle(id)?;
    let status = lc.launch().await?;
    info!(id, %status, "experience exited");
    print_status(launcher, &lc);
    Ok(())
}

pub async fn handle_clean(launcher: &Launcher, id: u32) -> Result<()> {
    let lc = launcher.lifecycle(id)?;
    match lc.clean().await? {
        Some(()) => println!("cleaned {}", launcher.layout().build_path(id).display()),
        None => println!("skipped: another operation is in progress"),
    }
    Ok(())
}

pub fn handle_bindings_show(launcher: &Launcher, id: u32) -> Result<()> {
    let doc = launcher.lifecycle(id)?.bindings()?;
    for mode in &doc.modes {
        println!("[{}]", mode.mode_name);
        for action in &mode.input_actions {
            println!(
                "  {}/{} ({})",
                action.action_map, action.action_name, action.control_type
            );
            for b in &action.input_bindings {
                if b.is_composite_parent() {
                    println!("    {} (composite)", b.binding_name);
                } else {
                    let indent = if b.is_part_of_composite { "      " } else { "    " };
                    println!("{indent}{} = {}", b.binding_name, b.path);
                }
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_bindings_set(
    launcher: &Launcher,
    id: u32,
    mode: String,
    action_map: String,
    action_name: String,
    control_type: String,
    binding_name: String,
    path: String,
    composite: bool,
    part_of_composite: bool,
) -> Result<()> {
    let addr = BindingAddress {
        mode,
        action: ActionKey {
            action_map,
            action_name,
            control_type,
        },
        binding: BindingKey {
            binding_name,
            is_composite: composite,
            is_part_of_composite: part_of_composite,
        },
    };
    launcher.lifecycle(id)?.set_binding(&addr, path.as_str())?;
    println!("binding saved");
    Ok(())
}

pub fn handle_addons_list(launcher: &Launcher, id: u32) -> Result<()> {
    let lc = launcher.lifecycle(id)?;
    let store = lc.addons()?;
    for ty in store.types() {
        println!("[{ty}]");
        for def in store.of_type(ty) {
            println!(
                "  {:>3} {:<24} {:<10} {}{}",
                def.addon_id,
                def.addon_name,
                def.size_hint,
                if def.enabled { "enabled" } else { "disabled" },
                if lc.addon_installed(def) { ", installed" } else { "" }
            );
        }
    }
    Ok(())
}

pub fn handle_addons_toggle(launcher: &Launcher, id: u32, addon_id: u32, enabled: bool) -> Result<()> {
    launcher
        .lifecycle(id)?
        .set_addon_enabled(addon_id, enabled)?;
    println!(
        "add-on {addon_id} {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

pub async fn handle_addons_install(launcher: &Launcher, id: u32, addon_id: u32) -> Result<()> {
    let lc = launcher.lifecycle(id)?;
    let progress = spawn_progress(lc.subscribe());
    let interrupt = spawn_interrupt(Arc::clone(&lc));
    let res = lc.install_addon(addon_id).await;
    progress.abort();
    interrupt.abort();
    eprintln!();

    match res? {
        Some(dir) => println!("add-on {addon_id} installed into {}", dir.display()),
        None => println!("skipped: another operation is in progress"),
    }
    Ok(())
}

pub fn handle_asset_name(raw: &str) -> Result<()> {
    if raw.is_empty() {
        return Err(LaunchError::Config("asset name is empty".into()));
    }
    println!("{}", normalize_asset_name(raw));
    Ok(())
}
