use serde::{Deserialize, Serialize};

use super::Overlay;
use crate::config::UNBOUND_PATH;

/// Input binding document shipped in a build as `input_mapping.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingDocument {
    #[serde(rename = "allInputActionsModeData", default)]
    pub modes: Vec<BindingMode>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingMode {
    pub mode_name: String,
    #[serde(default)]
    pub input_actions: Vec<InputAction>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputAction {
    pub action_name: String,
    pub action_map: String,
    pub control_type: String,
    #[serde(default)]
    pub input_bindings: Vec<InputBinding>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputBinding {
    pub binding_name: String,
    #[serde(default)]
    pub is_composite: bool,
    #[serde(default)]
    pub is_part_of_composite: bool,
    #[serde(default = "unbound")]
    pub path: String,
}

fn unbound() -> String {
    UNBOUND_PATH.to_string()
}

impl InputBinding {
    /// Composite parents group their parts and carry no path of their own.
    pub fn is_composite_parent(&self) -> bool {
        self.is_composite && !self.is_part_of_composite
    }

    pub fn is_bound(&self) -> bool {
        self.path != UNBOUND_PATH
    }

    pub fn key(&self) -> BindingKey {
        BindingKey {
            binding_name: self.binding_name.clone(),
            is_composite: self.is_composite,
            is_part_of_composite: self.is_part_of_composite,
        }
    }
}

impl InputAction {
    pub fn key(&self) -> ActionKey {
        ActionKey {
            action_map: self.action_map.clone(),
            action_name: self.action_name.clone(),
            control_type: self.control_type.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub action_map: String,
    pub action_name: String,
    pub control_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub binding_name: String,
    pub is_composite: bool,
    pub is_part_of_composite: bool,
}

/// Full structural address of one binding slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BindingAddress {
    pub mode: String,
    pub action: ActionKey,
    pub binding: BindingKey,
}

impl Overlay for BindingDocument {
    type Key = BindingAddress;
    type Value = String;

    fn slots(&self) -> Vec<(BindingAddress, String)> {
        let mut out = Vec::new();
        for mode in &self.modes {
            for action in &mode.input_actions {
                for binding in &action.input_bindings {
                    if binding.is_composite_parent() {
                        continue;
                    }
                    out.push((
                        BindingAddress {
                            mode: mode.mode_name.clone(),
                            action: action.key(),
                            binding: binding.key(),
                        },
                        binding.path.clone(),
                    ));
                }
            }
        }
        out
    }

    fn for_each_slot_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&BindingAddress, &mut String),
    {
        for mode in &mut self.modes {
            for action in &mut mode.input_actions {
                let action_key = action.key();
                for binding in &mut action.input_bindings {
                    if binding.is_composite_parent() {
                        continue;
                    }
                    let addr = BindingAddress {
                        mode: mode.mode_name.clone(),
                        action: action_key.clone(),
                        binding: binding.key(),
                    };
                    f(&addr, &mut binding.path);
                }
            }
        }
    }
}

impl BindingDocument {
    pub fn mode_names(&self) -> Vec<&str> {
        self.modes.iter().map(|m| m.mode_name.as_str()).collect()
    }
}
