// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary conditions of room walls.

use serde::{Deserialize, Serialize};

/// What lies on the other side of a wall segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoundaryCondition {
    /// Exposed to the outdoors; the only condition that can host windows.
    #[default]
    Outdoors,
    /// In contact with the ground.
    Ground,
    /// No heat flow across the wall (e.g. a shared interior wall).
    Adiabatic,
}

impl BoundaryCondition {
    /// Returns the condition name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryCondition::Outdoors => "Outdoors",
            BoundaryCondition::Ground => "Ground",
            BoundaryCondition::Adiabatic => "Adiabatic",
        }
    }

    /// Returns `true` if windows may be placed on this wall.
    pub fn can_host_windows(&self) -> bool {
        matches!(self, BoundaryCondition::Outdoors)
    }
}

impl std::fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
