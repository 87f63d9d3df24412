//! Keyed merge of a remote template with the locally persisted override document.
//!
//! The template decides the shape; the override only contributes values for slots
//! whose structural key still exists. Slots are never matched by position.

pub mod addons;
pub mod bindings;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{LaunchError, Result};

/// A document with user-editable slots addressed by a structural key.
pub trait Overlay: Clone {
    type Key: Eq + Hash + Clone + Debug;
    type Value: Clone;

    /// Every editable slot, in document order.
    fn slots(&self) -> Vec<(Self::Key, Self::Value)>;

    /// Visits every editable slot mutably, in document order.
    fn for_each_slot_mut<F>(&mut self, f: F)
    where
        F: FnMut(&Self::Key, &mut Self::Value);
}

/// Template shape, override values. Override slots whose key vanished are dropped;
/// template slots without an override keep their default.
///
/// A key that occurs several times is matched occurrence by occurrence.
pub fn merge<D: Overlay>(template: &D, previous: &D) -> D {
    let mut saved: HashMap<(D::Key, usize), D::Value> = HashMap::new();
    let mut seen: HashMap<D::Key, usize> = HashMap::new();
    for (key, value) in previous.slots() {
        let n = seen.entry(key.clone()).or_insert(0);
        saved.insert((key, *n), value);
        *n += 1;
    }

    let mut merged = template.clone();
    let mut seen: HashMap<D::Key, usize> = HashMap::new();
    merged.for_each_slot_mut(|key, value| {
        let n = seen.entry(key.clone()).or_insert(0);
        if let Some(v) = saved.get(&(key.clone(), *n)) {
            *value = v.clone();
        }
        *n += 1;
    });
    merged
}

/// Sets the first slot addressed by `key`; everything else is left as it was.
pub fn apply_edit<D: Overlay>(mut doc: D, key: &D::Key, value: D::Value) -> Result<D> {
    let mut hit = false;
    doc.for_each_slot_mut(|k, v| {
        if !hit && k == key {
            *v = value.clone();
            hit = true;
        }
    });
    if hit {
        Ok(doc)
    } else {
        Err(LaunchError::UnknownOverrideKey(format!("{key:?}")))
    }
}

/// Value of the first slot addressed by `key`.
pub fn lookup<D: Overlay>(doc: &D, key: &D::Key) -> Option<D::Value> {
    doc.slots()
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}
