pub mod keyboard;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use shared::boat::BoatAction;
use std::collections::BTreeMap;

#[derive(Resource, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct KeyMap {
    #[serde(default = "keyboard::default_key_map")]
    pub map: BTreeMap<BoatAction, Vec<KeyCode>>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            map: keyboard::default_key_map(),
        }
    }
}
