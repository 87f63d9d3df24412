use std::sync::Arc;

use tracing::{info, warn};

use crate::catalogue::{Catalogue, ExperienceData};
use crate::config::LauncherConfig;
use crate::error::{LaunchError, Result};
use crate::layout::PathLayout;
use crate::lifecycle::{ExperienceLifecycle, LifecycleContext};
use crate::release::{GithubReleaseSource, ReleaseResolver, ReleaseSource};
use crate::report::{BaseStrings, ErrorReporter, StatusKey, StringCatalog, TracingReporter};

/// Every service the launcher needs, constructed once at startup and handed out by reference.
pub struct Launcher {
    config: LauncherConfig,
    ctx: LifecycleContext,
    catalogue: Catalogue,
    lifecycles: Vec<Arc<ExperienceLifecycle>>,
}

impl Launcher {
    /// GitHub-backed launcher that logs reported errors.
    pub fn new(config: LauncherConfig) -> Result<Self> {
        let source = Arc::new(GithubReleaseSource::from_config(&config)?);
        Self::with_services(
            config,
            source,
            Arc::new(TracingReporter),
            Arc::new(BaseStrings),
        )
    }

    pub fn with_services(
        config: LauncherConfig,
        source: Arc<dyn ReleaseSource>,
        reporter: Arc<dyn ErrorReporter>,
        strings: Arc<dyn StringCatalog>,
    ) -> Result<Self> {
        let layout = Arc::new(PathLayout::from_config(&config)?);
        write_launcher_version(&layout)?;

        let (catalogue, created) =
            Catalogue::load_or_create(&layout.catalogue_path(), config.launcher_entry())?;
        if created {
            warn!(path = %layout.catalogue_path().display(), "catalogue missing, default written");
            reporter.report_error(
                &strings.fetch_string(StatusKey::GROUP, "settings_error"),
                config.error_display(),
            );
        }

        let ctx = LifecycleContext {
            layout,
            resolver: ReleaseResolver::new(source),
            reporter,
            strings,
            error_display: config.error_display(),
            extract_buffer: config.extract_buffer_bytes,
        };
        let lifecycles = catalogue
            .experiences()
            .into_iter()
            .map(|exp| Arc::new(ExperienceLifecycle::new(exp, ctx.clone())))
            .collect();
        info!(experiences = catalogue.len(), "launcher ready");

        Ok(Self {
            config,
            ctx,
            catalogue,
            lifecycles,
        })
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn layout(&self) -> &PathLayout {
        &self.ctx.layout
    }

    pub fn strings(&self) -> &dyn StringCatalog {
        self.ctx.strings.as_ref()
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn lifecycles(&self) -> &[Arc<ExperienceLifecycle>] {
        &self.lifecycles
    }

    pub fn lifecycle(&self, id: u32) -> Result<Arc<ExperienceLifecycle>> {
        self.lifecycles
            .get(id as usize)
            .cloned()
            .ok_or(LaunchError::UnknownExperience(id))
    }

    /// Appends an experience to the catalogue and starts managing it.
    pub fn add_experience(&mut self, data: ExperienceData) -> Result<Arc<ExperienceLifecycle>> {
        let id = self.catalogue.push(data)?;
        let exp = self
            .catalogue
            .get(id)
            .ok_or(LaunchError::UnknownExperience(id))?;
        let lifecycle = Arc::new(ExperienceLifecycle::new(exp, self.ctx.clone()));
        self.lifecycles.push(Arc::clone(&lifecycle));
        Ok(lifecycle)
    }
}

/// Records the running launcher's version as the id-0 marker.
pub fn write_launcher_version(layout: &PathLayout) -> Result<()> {
    let path = layout.version_marker_path(0);
    let tag = format!("v{}", env!("CARGO_PKG_VERSION"));
    std::fs::write(&path, &tag).map_err(|e| LaunchError::denied(&path, e))?;
    info!(%tag, "launcher version recorded");
    Ok(())
}
