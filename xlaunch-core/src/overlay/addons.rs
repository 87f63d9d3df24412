use serde::{Deserialize, Serialize};

use super::Overlay;
use crate::config::MAX_ADDON_ID;
use crate::error::{LaunchError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonDefinition {
    pub addon_id: u32,
    pub addon_name: String,
    #[serde(default)]
    pub addon_type: String,
    #[serde(rename = "addonSize", default)]
    pub size_hint: String,
    /// Owned by the user, never by the template.
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "addonFileNames", default)]
    pub file_names: Vec<String>,
}

/// Dense add-on array indexed by `addon_id`. Slots never seen stay empty, so an id
/// is always a valid index regardless of the order add-ons were discovered in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AddonsFile", into = "AddonsFile")]
pub struct AddonStore {
    slots: Vec<Option<AddonDefinition>>,
}

impl AddonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `def` at index `addon_id`, growing the store with empty slots as needed.
    /// Returns the definition it replaced. Ids above [`MAX_ADDON_ID`] are rejected.
    pub fn insert(&mut self, def: AddonDefinition) -> Result<Option<AddonDefinition>> {
        if def.addon_id > MAX_ADDON_ID {
            return Err(LaunchError::MalformedResponse(format!(
                "addon id {} exceeds {MAX_ADDON_ID}",
                def.addon_id
            )));
        }
        let idx = def.addon_id as usize;
        if self.slots.len() <= idx {
            self.slots.resize(idx + 1, None);
        }
        Ok(self.slots[idx].replace(def))
    }

    pub fn get(&self, addon_id: u32) -> Option<&AddonDefinition> {
        self.slots.get(addon_id as usize).and_then(Option::as_ref)
    }

    /// Length of the dense array, gaps included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AddonDefinition> {
        self.slots.iter().flatten()
    }

    /// Distinct non-empty add-on types, first seen first.
    pub fn types(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for def in self.iter() {
            if !def.addon_type.is_empty() && !out.contains(&def.addon_type.as_str()) {
                out.push(&def.addon_type);
            }
        }
        out
    }

    pub fn of_type<'a>(&'a self, addon_type: &'a str) -> impl Iterator<Item = &'a AddonDefinition> {
        self.iter().filter(move |d| d.addon_type == addon_type)
    }
}

impl Overlay for AddonStore {
    type Key = u32;
    type Value = bool;

    fn slots(&self) -> Vec<(u32, bool)> {
        self.iter().map(|d| (d.addon_id, d.enabled)).collect()
    }

    fn for_each_slot_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&u32, &mut bool),
    {
        for def in self.slots.iter_mut().flatten() {
            let id = def.addon_id;
            f(&id, &mut def.enabled);
        }
    }
}

// On-disk shape: {"addonsData": {"addons": [ ... ]}} with `null` in the gaps.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddonsFile {
    #[serde(default)]
    addons_data: AddonList,
}

#[derive(Default, Serialize, Deserialize)]
struct AddonList {
    #[serde(default)]
    addons: Vec<Option<AddonDefinition>>,
}

impl TryFrom<AddonsFile> for AddonStore {
    type Error = LaunchError;

    fn try_from(file: AddonsFile) -> Result<Self> {
        let mut store = AddonStore::new();
        for def in file.addons_data.addons.into_iter().flatten() {
            store.insert(def)?;
        }
        Ok(store)
    }
}

impl From<AddonStore> for AddonsFile {
    fn from(store: AddonStore) -> Self {
        AddonsFile {
            addons_data: AddonList {
                addons: store.slots,
            },
        }
    }
}
