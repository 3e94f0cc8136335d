// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed extension records attached to rooms and models.
//!
//! Each host carries a fixed properties struct with one field per extension.
//! Serialization assembles them under the host's `"properties"` key.

pub mod extension;
pub mod model;
pub mod room2d;

use serde_json::{json, Value};

use crate::error::Result;

pub use extension::{GridParameter, ModifierSet, GENERIC_MODIFIER_SET};
pub use model::{room_comparison_dicts, ModelComparisonRecord, MODEL_COMPARISON_TYPE};
pub use room2d::{percent_change, RoomComparison, RoomComparisonRecord, ROOM_COMPARISON_TYPE};

/// Extension properties of a room.
#[derive(Debug, Clone, PartialEq)]
pub struct Room2DProperties {
    comparison: RoomComparisonRecord,
}

impl Room2DProperties {
    pub fn new(host: &str) -> Self {
        Self {
            comparison: RoomComparisonRecord::new(host),
        }
    }

    pub fn comparison(&self) -> &RoomComparisonRecord {
        &self.comparison
    }

    pub fn comparison_mut(&mut self) -> &mut RoomComparisonRecord {
        &mut self.comparison
    }

    pub fn to_dict(&self) -> Result<Value> {
        Ok(json!({
            "type": "Room2DProperties",
            "comparison": self.comparison.to_dict()?,
        }))
    }

    pub(crate) fn rebind(&mut self, host: &str) {
        self.comparison.rebind(host);
    }
}

/// Extension properties of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelProperties {
    comparison: ModelComparisonRecord,
}

impl ModelProperties {
    pub fn new(host: &str) -> Self {
        Self {
            comparison: ModelComparisonRecord::new(host),
        }
    }

    pub fn comparison(&self) -> &ModelComparisonRecord {
        &self.comparison
    }

    pub fn to_dict(&self) -> Value {
        json!({
            "type": "ModelProperties",
            "comparison": self.comparison.to_dict(),
        })
    }

    pub(crate) fn rebind(&mut self, host: &str) {
        self.comparison.rebind(host);
    }
}
