use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::broadcast;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::latch::Latch;
use super::state::{
    Classification, InstallOutcome, LifecycleEvent, LifecycleFlags, LifecycleState, Phase,
    VersionCheck,
};
use crate::archive::{ExtractOptions, ExtractReport, extract};
use crate::catalogue::Experience;
use crate::error::{LaunchError, Result};
use crate::layout::PathLayout;
use crate::overlay::addons::{AddonDefinition, AddonStore};
use crate::overlay::bindings::{BindingAddress, BindingDocument};
use crate::release::{ReleaseAsset, ReleaseResolver, asset_by_semantic_name};
use crate::report::{ErrorReporter, StatusKey, StringCatalog};
use crate::store::{AddonRegistry, BindingStore};
use crate::util::progress::ProgressGate;
use crate::util::sanitize;

const EVENT_CAPACITY: usize = 64;

/// Services every lifecycle shares. Built once by the launcher.
#[derive(Clone)]
pub struct LifecycleContext {
    pub layout: Arc<PathLayout>,
    pub resolver: ReleaseResolver,
    pub reporter: Arc<dyn ErrorReporter>,
    pub strings: Arc<dyn StringCatalog>,
    pub error_display: Duration,
    pub extract_buffer: usize,
}

#[derive(Debug)]
struct Snapshot {
    state: LifecycleState,
    status: Option<StatusKey>,
    progress: f32,
    last_check: Option<VersionCheck>,
    /// Tag of the archive sitting in the download folder.
    staged: Option<String>,
}

/// Writes observable state and mirrors every change onto the event channel.
#[derive(Clone)]
struct Publisher {
    snapshot: Arc<Mutex<Snapshot>>,
    events: broadcast::Sender<LifecycleEvent>,
}

impl Publisher {
    fn state(&self, state: LifecycleState) {
        self.snapshot.lock().state = state;
        let _ = self.events.send(LifecycleEvent::State(state));
    }

    fn status(&self, key: StatusKey) {
        self.snapshot.lock().status = Some(key);
        let _ = self.events.send(LifecycleEvent::Status(key));
    }

    fn progress(&self, phase: Phase, fraction: f32) {
        self.snapshot.lock().progress = fraction;
        let _ = self
            .events
            .send(LifecycleEvent::Progress { phase, fraction });
    }
}

/// Version check, download, install and launch of one experience.
///
/// Check, download and install share one single-flight latch; a second caller is
/// skipped (`Ok(None)`), never queued. Launch holds a separate latch for the lifetime
/// of the child process, which blocks download and re-launch of this experience only.
pub struct ExperienceLifecycle {
    experience: Experience,
    ctx: LifecycleContext,
    op_latch: Latch,
    launch_latch: Latch,
    publish: Publisher,
    cancel: Mutex<CancellationToken>,
    bindings: Mutex<BindingStore>,
    addons: Mutex<AddonRegistry>,
}

impl ExperienceLifecycle {
    pub fn new(experience: Experience, ctx: LifecycleContext) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let bindings = BindingStore::for_bindings(&ctx.layout, experience.id);
        let addons = AddonRegistry::for_addons(&ctx.layout, experience.id);
        Self {
            experience,
            ctx,
            op_latch: Latch::new(),
            launch_latch: Latch::new(),
            publish: Publisher {
                snapshot: Arc::new(Mutex::new(Snapshot {
                    state: LifecycleState::Uninitialized,
                    status: None,
                    progress: 0.0,
                    last_check: None,
                    staged: None,
                })),
                events,
            },
            cancel: Mutex::new(CancellationToken::new()),
            bindings: Mutex::new(bindings),
            addons: Mutex::new(addons),
        }
    }

    pub fn experience(&self) -> &Experience {
        &self.experience
    }

    pub fn id(&self) -> u32 {
        self.experience.id
    }

    pub fn state(&self) -> LifecycleState {
        self.publish.snapshot.lock().state
    }

    pub fn status(&self) -> Option<StatusKey> {
        self.publish.snapshot.lock().status
    }

    pub fn progress(&self) -> f32 {
        self.publish.snapshot.lock().progress
    }

    pub fn last_check(&self) -> Option<VersionCheck> {
        self.publish.snapshot.lock().last_check.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.publish.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.launch_latch.is_held()
    }

    pub fn flags(&self) -> LifecycleFlags {
        let state = self.state();
        let idle =
            !state.is_in_flight() && !self.op_latch.is_held() && !self.launch_latch.is_held();
        LifecycleFlags {
            can_launch: idle
                && !self.experience.is_launcher()
                && self.marker_path().is_file(),
            can_download: idle
                && matches!(
                    state,
                    LifecycleState::DownloadRequired | LifecycleState::UpdateAvailable
                ),
        }
    }

    /// Cancels the download or extraction in flight, if any.
    pub fn cancel(&self) {
        self.cancel.lock().cancel();
    }

    /// Reads the marker, asks the release source for the latest tag and classifies.
    ///
    /// Allowed while the experience runs; the `Running` state is kept in that case.
    pub async fn check_version(&self) -> Result<Option<VersionCheck>> {
        let Some(_op) = self.op_latch.try_acquire() else {
            debug!(id = self.id(), "check skipped, operation in flight");
            return Ok(None);
        };

        let running = self.launch_latch.is_held();
        if !running {
            self.publish.state(LifecycleState::CheckingVersion);
        }
        self.publish.status(StatusKey::Info);

        match self.probe().await {
            Ok(check) => {
                self.settle(&check, running);
                Ok(Some(check))
            }
            Err(e) if running => {
                self.report(StatusKey::InfoError.as_key(), &e);
                Err(e)
            }
            Err(e) => Err(self.fail(StatusKey::InfoError, e)),
        }
    }

    /// Stages the latest release and installs it while still holding the latch.
    pub async fn download(&self) -> Result<Option<InstallOutcome>> {
        let Some(_op) = self.op_latch.try_acquire() else {
            debug!(id = self.id(), "download skipped, operation in flight");
            return Ok(None);
        };
        self.refuse_if_running()?;
        self.recheck_if_unsettled().await?;

        let cancel = self.fresh_token();
        let (tag, previous) = match self.stage(&cancel).await {
            Ok(staged) => staged,
            Err(e) => return Err(self.fail(StatusKey::DownloadError, e)),
        };
        self.install_staged(&tag, previous, &cancel).await.map(Some)
    }

    /// Installs an archive already sitting in the download folder.
    pub async fn install(&self) -> Result<Option<InstallOutcome>> {
        let Some(_op) = self.op_latch.try_acquire() else {
            debug!(id = self.id(), "install skipped, operation in flight");
            return Ok(None);
        };
        self.refuse_if_running()?;
        self.recheck_if_unsettled().await?;

        let tag = match self.staged_tag() {
            Some(tag) => tag,
            None => {
                let missing = LaunchError::MissingLocalAsset(self.download_path());
                return Err(self.fail(StatusKey::InstallError, missing));
            }
        };
        let previous = match self.read_marker() {
            Ok(previous) => previous,
            Err(e) => return Err(self.fail(StatusKey::InstallError, e)),
        };
        // a retry after a failed extraction must not mix with its partial output
        if !self.experience.is_launcher() {
            if let Err(e) = self.clear_build().await {
                return Err(self.fail(StatusKey::InstallError, e));
            }
        }
        let cancel = self.fresh_token();
        self.install_staged(&tag, previous, &cancel).await.map(Some)
    }

    /// Runs the executable from the build folder, waits for it to exit, then re-checks.
    pub async fn launch(&self) -> Result<ExitStatus> {
        let id = self.id();
        if self.experience.is_launcher() {
            return Err(LaunchError::Process("the launcher cannot launch itself".into()));
        }
        let Some(running) = self.launch_latch.try_acquire() else {
            warn!(id, "already running");
            return Err(LaunchError::Busy(id));
        };
        if self.op_latch.is_held() {
            warn!(id, "launch refused, operation in flight");
            return Err(LaunchError::Busy(id));
        }
        if !self.marker_path().is_file() {
            return Err(LaunchError::NotInstalled(id));
        }
        let Some(exe) = self.experience.executable.as_ref() else {
            return Err(LaunchError::Config(format!(
                "experience {id} has no executable configured"
            )));
        };

        let build = self.build_path();
        let program = build.join(exe);
        self.publish.state(LifecycleState::Launching);
        let mut child = match Command::new(&program).current_dir(&build).spawn() {
            Ok(child) => child,
            Err(e) => {
                let err = LaunchError::Process(format!("{}: {e}", program.display()));
                return Err(self.fail(StatusKey::LaunchError, err));
            }
        };
        info!(id, program = %program.display(), pid = child.id(), "launched");
        self.publish.state(LifecycleState::Running);
        self.publish.status(StatusKey::Running);

        let status = match child.wait().await {
            Ok(status) => status,
            Err(e) => {
                let err = LaunchError::Process(format!("wait: {e}"));
                return Err(self.fail(StatusKey::LaunchError, err));
            }
        };
        info!(id, %status, "process exited");
        drop(running);

        self.publish.state(LifecycleState::Ready);
        if let Err(e) = self.check_version().await {
            debug!(id, error = %e, "post-run check failed");
        }
        Ok(status)
    }

    /// Empties the download folder and sanitises the build folder without downloading.
    pub async fn clean(&self) -> Result<Option<()>> {
        let Some(_op) = self.op_latch.try_acquire() else {
            return Ok(None);
        };
        self.refuse_if_running()?;
        let cleared: Result<()> = async {
            if !self.experience.is_launcher() {
                self.remove_marker()?;
            }
            self.clear_folders().await
        }
        .await;
        if let Err(e) = cleared {
            return Err(self.fail(StatusKey::InstallError, e));
        }
        self.publish.snapshot.lock().staged = None;
        if !self.state().needs_check() && !self.experience.is_launcher() {
            self.publish.state(LifecycleState::DownloadRequired);
        }
        Ok(Some(()))
    }

    pub fn bindings(&self) -> Result<BindingDocument> {
        self.with_store(&self.bindings, "input_error_nomapping", |s| {
            s.load().cloned()
        })
    }

    pub fn set_binding(&self, addr: &BindingAddress, path: impl Into<String>) -> Result<()> {
        let path = path.into();
        self.with_store(&self.bindings, "input_error_nomapping", |s| {
            s.apply_edit(addr, path).map(|_| ())
        })
    }

    pub fn addons(&self) -> Result<AddonStore> {
        self.with_store(&self.addons, "addons_error_noaddons", |s| s.load().cloned())
    }

    pub fn set_addon_enabled(&self, addon_id: u32, enabled: bool) -> Result<()> {
        self.with_store(&self.addons, "addons_error_noaddons", |s| {
            s.apply_edit(&addon_id, enabled).map(|_| ())
        })
    }

    /// True when every file the add-on declares is present in its type folder.
    pub fn addon_installed(&self, def: &AddonDefinition) -> bool {
        let dir = self.ctx.layout.addons_path(self.id(), &def.addon_type);
        def.file_names.iter().all(|f| dir.join(f).exists())
    }

    /// Downloads an add-on archive from the latest release and unpacks it into
    /// `Addons/<type>/`. Shares the operation latch with the main phases.
    pub async fn install_addon(&self, addon_id: u32) -> Result<Option<PathBuf>> {
        let Some(_op) = self.op_latch.try_acquire() else {
            debug!(id = self.id(), addon_id, "add-on install skipped, operation in flight");
            return Ok(None);
        };
        self.refuse_if_running()?;
        self.recheck_if_unsettled().await?;

        let def = self
            .addons()?
            .get(addon_id)
            .cloned()
            .ok_or_else(|| LaunchError::UnknownOverrideKey(format!("addon {addon_id}")))?;
        let cancel = self.fresh_token();
        match self.fetch_addon(&def, &cancel).await {
            Ok(dir) => Ok(Some(dir)),
            Err(e) => {
                error!(id = self.id(), addon_id, error = %e, "add-on install failed");
                self.report("addons_selector_download_error", &e);
                Err(e)
            }
        }
    }

    /// Publishes a finished version check. `Running` is kept while the child lives.
    fn settle(&self, check: &VersionCheck, running: bool) {
        info!(
            id = self.id(),
            local = check.local.as_deref().unwrap_or("None"),
            remote = %check.remote.tag,
            classification = ?check.classification,
            "version checked"
        );
        self.publish.status(StatusKey::InfoDone);
        self.publish.status(if check.interrupted {
            StatusKey::VersionMissing
        } else {
            check.classification.status(self.experience.is_launcher())
        });
        if !running {
            self.publish.state(check.classification.into());
        }
        self.publish.snapshot.lock().last_check = Some(check.clone());
    }

    /// `Faulted` and `Uninitialized` are only left through a version check, so a phase
    /// started from either runs one first. Called with the operation latch held.
    async fn recheck_if_unsettled(&self) -> Result<()> {
        let state = self.state();
        if !state.needs_check() {
            return Ok(());
        }
        debug!(id = self.id(), %state, "re-checking version before the phase");
        self.publish.state(LifecycleState::CheckingVersion);
        self.publish.status(StatusKey::Info);
        match self.probe().await {
            Ok(check) => {
                self.settle(&check, false);
                Ok(())
            }
            Err(e) => Err(self.fail(StatusKey::InfoError, e)),
        }
    }

    async fn probe(&self) -> Result<VersionCheck> {
        let local = self.read_marker()?;
        let interrupted =
            local.is_none() && !self.experience.is_launcher() && has_entries(&self.build_path());
        if interrupted {
            warn!(id = self.id(), "build folder has content but no version marker, install was interrupted");
        }

        let remote = self
            .ctx
            .resolver
            .latest_release(&self.experience.source)
            .await?;
        let classification = Classification::classify(local.as_deref(), &remote.tag);
        let summary = ReleaseResolver::summary(&remote, self.experience.asset_name.as_deref());
        Ok(VersionCheck {
            local,
            remote,
            classification,
            summary,
            interrupted,
        })
    }

    /// Returns the staged tag and the tag that was installed before.
    async fn stage(&self, cancel: &CancellationToken) -> Result<(String, Option<String>)> {
        let id = self.id();
        self.publish.state(LifecycleState::Downloading);
        self.publish.status(StatusKey::Download);
        self.publish.progress(Phase::Download, 0.0);

        let release = self
            .ctx
            .resolver
            .latest_release(&self.experience.source)
            .await?;
        let asset =
            ReleaseResolver::primary_asset(&release, self.experience.asset_name.as_deref())?
                .clone();

        let previous = self.read_marker()?;
        // the launcher's own marker describes the running binary
        if !self.experience.is_launcher() {
            self.remove_marker()?;
        }
        self.clear_folders().await?;

        let staged = self.ctx.layout.staged_archive_path(id, &release.tag);
        let bytes = self.fetch_to(&asset, &staged, cancel).await?;
        info!(id, tag = %release.tag, bytes, path = %staged.display(), "release staged");

        self.publish.snapshot.lock().staged = Some(release.tag.clone());
        self.publish.status(StatusKey::DownloadDone);
        Ok((release.tag, previous))
    }

    async fn install_staged(
        &self,
        tag: &str,
        previous: Option<String>,
        cancel: &CancellationToken,
    ) -> Result<InstallOutcome> {
        let id = self.id();
        let archive = self.ctx.layout.staged_archive_path(id, tag);

        if self.experience.is_launcher() {
            if !archive.is_file() {
                return Err(self.fail(
                    StatusKey::InstallError,
                    LaunchError::MissingLocalAsset(archive),
                ));
            }
            info!(id, tag, "launcher update staged, not installed over the running binary");
            self.publish.status(StatusKey::UpdateMainDone);
            self.publish.state(LifecycleState::Ready);
            return Ok(InstallOutcome::Staged {
                tag: tag.to_string(),
                archive,
            });
        }

        let report = match self.apply_archive(&archive, tag, cancel).await {
            Ok(report) => report,
            Err(e) => return Err(self.fail(StatusKey::InstallError, e)),
        };
        self.publish.snapshot.lock().staged = None;
        self.refresh_overlays();

        self.publish.status(if previous.is_some() {
            StatusKey::UpdateDone
        } else {
            StatusKey::InstallDone
        });
        self.publish.state(LifecycleState::Ready);
        Ok(InstallOutcome::Installed {
            tag: tag.to_string(),
            files: report.files,
            bytes: report.bytes,
        })
    }

    /// Extracts into the build folder; the marker is written only once extraction succeeded.
    async fn apply_archive(
        &self,
        archive: &Path,
        tag: &str,
        cancel: &CancellationToken,
    ) -> Result<ExtractReport> {
        self.publish.state(LifecycleState::Installing);
        self.publish.status(StatusKey::Install);
        self.publish.progress(Phase::Extract, 0.0);

        self.remove_marker()?;
        let report = self.extract_to(archive, &self.build_path(), cancel).await?;

        let marker = self.marker_path();
        tokio::fs::write(&marker, tag)
            .await
            .map_err(|e| LaunchError::denied(&marker, e))?;
        if let Err(e) = tokio::fs::remove_file(archive).await {
            warn!(path = %archive.display(), error = %e, "staged archive not removed");
        }
        info!(id = self.id(), tag, files = report.files, "installed");
        Ok(report)
    }

    async fn fetch_addon(&self, def: &AddonDefinition, cancel: &CancellationToken) -> Result<PathBuf> {
        let release = self
            .ctx
            .resolver
            .latest_release(&self.experience.source)
            .await?;
        let asset = asset_by_semantic_name(&release.assets, &def.addon_name)
            .ok_or_else(|| LaunchError::AssetNotFound(def.addon_name.clone()))?
            .clone();

        let dir = self.ctx.layout.addons_path(self.id(), &def.addon_type);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| LaunchError::denied(&dir, e))?;
        for name in &def.file_names {
            remove_path(&dir.join(name)).await?;
        }

        let zip = dir.join(format!("{}.zip", def.addon_name));
        self.fetch_to(&asset, &zip, cancel).await?;
        self.extract_to(&zip, &dir, cancel).await?;
        tokio::fs::remove_file(&zip)
            .await
            .map_err(|e| LaunchError::denied(&zip, e))?;
        info!(id = self.id(), addon = %def.addon_name, dir = %dir.display(), "add-on installed");
        Ok(dir)
    }

    /// Streams an asset to `dest`. A failed or cancelled transfer removes the partial file.
    async fn fetch_to(
        &self,
        asset: &ReleaseAsset,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        let mut stream = self
            .ctx
            .resolver
            .source()
            .fetch_asset(&self.experience.source, asset)
            .await?;
        let total = stream.content_length().unwrap_or(asset.size_bytes);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LaunchError::denied(parent, e))?;
        }
        let mut file = File::create(dest)
            .await
            .map_err(|e| LaunchError::denied(dest, e))?;
        let mut gate = ProgressGate::new(total);

        let copied: Result<u64> = async {
            loop {
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(LaunchError::Cancelled),
                    next = stream.next_chunk() => next?,
                };
                let Some(chunk) = next else { break };
                file.write_all(&chunk)
                    .await
                    .map_err(|e| LaunchError::denied(dest, e))?;
                if let Some(frac) = gate.advance(chunk.len() as u64) {
                    self.publish.progress(Phase::Download, frac);
                }
            }
            file.flush().await.map_err(|e| LaunchError::denied(dest, e))?;
            Ok(gate.done())
        }
        .await;
        drop(file);

        match copied {
            Ok(bytes) => {
                if let Some(frac) = gate.finish() {
                    self.publish.progress(Phase::Download, frac);
                }
                Ok(bytes)
            }
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(dest).await {
                    debug!(path = %dest.display(), error = %rm, "partial download not removed");
                }
                Err(e)
            }
        }
    }

    async fn extract_to(
        &self,
        archive: &Path,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> Result<ExtractReport> {
        let publish = self.publish.clone();
        let opts = ExtractOptions {
            buffer_bytes: self.ctx.extract_buffer,
            cancel: Some(cancel.clone()),
        };
        let (archive, dest) = (archive.to_path_buf(), dest.to_path_buf());
        tokio::task::spawn_blocking(move || {
            extract(&archive, &dest, &opts, |frac| {
                publish.progress(Phase::Extract, frac)
            })
        })
        .await
        .map_err(join_error)?
    }

    async fn clear_folders(&self) -> Result<()> {
        let download = self.download_path();
        let build = self.build_path();
        let protected = self.experience.result_folders.clone();
        tokio::task::spawn_blocking(move || {
            sanitize::empty_dir(&download)?;
            sanitize::clean(&build, &protected[..]).map(|_| ())
        })
        .await
        .map_err(join_error)?
    }

    /// Sanitises the build folder and keeps the staged archive.
    async fn clear_build(&self) -> Result<()> {
        let build = self.build_path();
        let protected = self.experience.result_folders.clone();
        tokio::task::spawn_blocking(move || sanitize::clean(&build, &protected[..]).map(|_| ()))
            .await
            .map_err(join_error)?
    }

    fn refresh_overlays(&self) {
        if let Err(e) = self.bindings.lock().refresh() {
            self.soft_failure("input_error_nomapping", &e);
        }
        if let Err(e) = self.addons.lock().refresh() {
            self.soft_failure("addons_error_noaddons", &e);
        }
    }

    fn with_store<S, T>(
        &self,
        store: &Mutex<S>,
        missing_key: &str,
        f: impl FnOnce(&mut S) -> Result<T>,
    ) -> Result<T> {
        let res = {
            let mut guard = store.lock();
            f(&mut *guard)
        };
        if let Err(e @ LaunchError::MissingLocalAsset(_)) = &res {
            self.soft_failure(missing_key, e);
        }
        res
    }

    fn staged_tag(&self) -> Option<String> {
        if let Some(tag) = self.publish.snapshot.lock().staged.clone() {
            return Some(tag);
        }
        let entries = std::fs::read_dir(self.download_path()).ok()?;
        entries
            .flatten()
            .map(|e| e.path())
            .find(|p| p.extension().and_then(|x| x.to_str()) == Some("zip"))
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
    }

    fn read_marker(&self) -> Result<Option<String>> {
        let path = self.marker_path();
        match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let tag = raw.trim();
                Ok((!tag.is_empty()).then(|| tag.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LaunchError::denied(path, e)),
        }
    }

    fn remove_marker(&self) -> Result<()> {
        let path = self.marker_path();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LaunchError::denied(path, e)),
        }
    }

    fn refuse_if_running(&self) -> Result<()> {
        if self.launch_latch.is_held() {
            warn!(id = self.id(), "refused while running");
            return Err(LaunchError::Busy(self.id()));
        }
        Ok(())
    }

    fn fresh_token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.cancel.lock() = token.clone();
        token
    }

    /// Moves to `Faulted`, reports once and hands the error back.
    fn fail(&self, status: StatusKey, e: LaunchError) -> LaunchError {
        error!(id = self.id(), kind = ?e.kind(), error = %e, "phase failed");
        self.publish.state(LifecycleState::Faulted(e.kind()));
        self.publish.status(status);
        self.report(status.as_key(), &e);
        e
    }

    fn report(&self, key: &str, e: &LaunchError) {
        let prefix = self.ctx.strings.fetch_string(StatusKey::GROUP, key);
        self.ctx
            .reporter
            .report_error(&format!("{prefix}{e}"), self.ctx.error_display);
    }

    fn soft_failure(&self, key: &str, e: &LaunchError) {
        warn!(id = self.id(), error = %e, "feature disabled");
        let message = self.ctx.strings.fetch_string(StatusKey::GROUP, key);
        self.ctx
            .reporter
            .report_error(&message, self.ctx.error_display);
    }

    fn marker_path(&self) -> PathBuf {
        self.ctx.layout.version_marker_path(self.id())
    }

    fn build_path(&self) -> PathBuf {
        self.ctx.layout.build_path(self.id())
    }

    fn download_path(&self) -> PathBuf {
        self.ctx.layout.download_path(self.id())
    }
}

fn has_entries(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

async fn remove_path(path: &Path) -> Result<()> {
    let meta = match tokio::fs::symlink_metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(LaunchError::denied(path, e)),
    };
    let res = if meta.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    };
    res.map_err(|e| LaunchError::denied(path, e))
}

fn join_error(e: JoinError) -> LaunchError {
    LaunchError::Io(std::io::Error::other(e))
}
