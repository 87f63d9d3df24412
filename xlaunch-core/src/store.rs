use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{LaunchError, Result};
use crate::layout::PathLayout;
use crate::overlay::addons::AddonStore;
use crate::overlay::bindings::BindingDocument;
use crate::overlay::{self, Overlay};

/// Persistence for one overlay document of one experience.
///
/// The template lives inside the build folder and is replaced by every install. The
/// override lives outside it so it survives cleanup. Each write stores the whole merged
/// document in both places; the experience reads the template path.
#[derive(Debug)]
pub struct OverlayStore<D> {
    template_path: PathBuf,
    override_path: PathBuf,
    current: Option<D>,
}

pub type BindingStore = OverlayStore<BindingDocument>;
pub type AddonRegistry = OverlayStore<AddonStore>;

impl BindingStore {
    pub fn for_bindings(layout: &PathLayout, id: u32) -> Self {
        Self::new(
            layout.bindings_template_path(id),
            layout.bindings_override_path(id),
        )
    }
}

impl AddonRegistry {
    pub fn for_addons(layout: &PathLayout, id: u32) -> Self {
        Self::new(
            layout.addons_template_path(id),
            layout.addons_override_path(id),
        )
    }
}

impl<D> OverlayStore<D>
where
    D: Overlay + Default + Serialize + DeserializeOwned,
{
    pub fn new(template_path: PathBuf, override_path: PathBuf) -> Self {
        Self {
            template_path,
            override_path,
            current: None,
        }
    }

    /// Re-merges the on-disk template with the persisted override and writes the result.
    pub fn refresh(&mut self) -> Result<&D> {
        let template: D = read_json(&self.template_path)?
            .ok_or_else(|| LaunchError::MissingLocalAsset(self.template_path.clone()))?;
        let previous: D = read_json(&self.override_path)?.unwrap_or_default();

        let merged = overlay::merge(&template, &previous);
        self.persist(&merged)?;
        info!(template = %self.template_path.display(), "overlay refreshed");
        let doc: &D = self.current.insert(merged);
        Ok(doc)
    }

    /// Applies one edit to the merged document and persists the whole document.
    pub fn apply_edit(&mut self, key: &D::Key, value: D::Value) -> Result<&D> {
        let doc = match self.current.take() {
            Some(doc) => doc,
            None => self.refresh()?.clone(),
        };
        // keep the old document if the key is unknown
        let edited = match overlay::apply_edit(doc.clone(), key, value) {
            Ok(edited) => edited,
            Err(e) => {
                self.current = Some(doc);
                return Err(e);
            }
        };
        self.persist(&edited)?;
        debug!(?key, "overlay edit persisted");
        let doc: &D = self.current.insert(edited);
        Ok(doc)
    }

    /// Loads the merged document lazily.
    pub fn load(&mut self) -> Result<&D> {
        if self.current.is_none() {
            self.refresh()?;
        }
        self.current
            .as_ref()
            .ok_or_else(|| LaunchError::MissingLocalAsset(self.template_path.clone()))
    }

    fn persist(&self, doc: &D) -> Result<()> {
        write_json(&self.override_path, doc)?;
        write_json(&self.template_path, doc)
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LaunchError::denied(path, e)),
    }
}

/// Whole-file write through a sibling temp file and a rename.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| LaunchError::denied(parent, e))?;
    }
    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).map_err(|e| LaunchError::denied(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| LaunchError::denied(path, e))
}
