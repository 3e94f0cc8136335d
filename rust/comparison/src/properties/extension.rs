// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opaque references carried alongside a room's comparison baseline.
//!
//! These are stored, serialized and compared for equality only.

use serde::{Deserialize, Serialize};

/// Identifier of the modifier set used when comparing a room visually.
pub const GENERIC_MODIFIER_SET: &str = "Generic_Interior_Visible_Modifier_Set";

/// Reference to a named modifier set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct ModifierSet {
    pub identifier: String,
}

impl ModifierSet {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }

    /// The set reported by rooms that have none assigned.
    pub fn generic() -> Self {
        Self::new(GENERIC_MODIFIER_SET)
    }
}

fn default_offset() -> f64 {
    1.0
}

fn default_include_mesh() -> bool {
    true
}

/// Parameters for a sensor grid generated over a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GridParameter {
    RoomGridParameter {
        dimension: f64,
        #[serde(default = "default_offset")]
        offset: f64,
        #[serde(default)]
        wall_offset: f64,
        #[serde(default = "default_include_mesh")]
        include_mesh: bool,
    },
}

impl GridParameter {
    /// Creates a floor grid with the default 1.0 offset.
    pub fn room(dimension: f64) -> Self {
        GridParameter::RoomGridParameter {
            dimension,
            offset: default_offset(),
            wall_offset: 0.0,
            include_mesh: default_include_mesh(),
        }
    }
}
