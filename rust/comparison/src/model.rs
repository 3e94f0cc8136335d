// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Top-level model: buildings, stories and rooms.

use floorplan_geometry::{Point2, DEFAULT_TOLERANCE};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::building::Building;
use crate::dictionary::{check_type, from_tagged, non_null, to_value};
use crate::error::{Error, Result};
use crate::properties::{ModelComparisonRecord, ModelProperties};
use crate::room2d::Room2D;

#[derive(Debug, Serialize, Deserialize)]
struct ModelDict {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(default)]
    buildings: Vec<Value>,
    #[serde(default = "default_tolerance")]
    tolerance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<Value>,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

/// A floor-plan model.
///
/// Room identifiers are unique across the whole model.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    identifier: String,
    display_name: Option<String>,
    buildings: Vec<Building>,
    tolerance: f64,
    properties: ModelProperties,
}

impl Model {
    /// Creates a model with the default tolerance.
    ///
    /// Returns [`Error::DuplicateIdentifier`] if two rooms share an identifier.
    pub fn new(identifier: impl Into<String>, buildings: Vec<Building>) -> Result<Self> {
        check_unique_rooms(buildings.iter().flat_map(Building::room_2ds))?;
        let identifier = identifier.into();
        Ok(Self {
            properties: ModelProperties::new(&identifier),
            identifier,
            display_name: None,
            buildings,
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = identifier.into();
        self.properties.rebind(&self.identifier);
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.identifier)
    }

    pub fn set_display_name(&mut self, display_name: Option<String>) {
        self.display_name = display_name;
    }

    /// Distance under which vertices are considered coincident.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<()> {
        if tolerance <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "model tolerance must be positive, got {tolerance}"
            )));
        }
        self.tolerance = tolerance;
        Ok(())
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    /// Adds a building, rejecting room identifiers already in the model.
    pub fn add_building(&mut self, building: Building) -> Result<()> {
        check_unique_rooms(self.room_2ds().chain(building.room_2ds()))?;
        self.buildings.push(building);
        Ok(())
    }

    pub fn properties(&self) -> &ModelProperties {
        &self.properties
    }

    /// All rooms in serialization order (buildings, then stories, then rooms).
    pub fn room_2ds(&self) -> impl Iterator<Item = &Room2D> {
        self.buildings.iter().flat_map(Building::room_2ds)
    }

    /// Mutable rooms in serialization order.
    ///
    /// Rooms can be edited in place. Renaming goes through
    /// [`rename_room`](Self::rename_room) so identifiers stay unique.
    pub fn room_2ds_mut(&mut self) -> impl Iterator<Item = &mut Room2D> {
        self.buildings.iter_mut().flat_map(Building::room_2ds_mut)
    }

    pub fn room_by_identifier(&self, identifier: &str) -> Option<&Room2D> {
        self.room_2ds().find(|r| r.identifier() == identifier)
    }

    pub fn room_by_identifier_mut(&mut self, identifier: &str) -> Option<&mut Room2D> {
        self.room_2ds_mut().find(|r| r.identifier() == identifier)
    }

    /// Renames the room `identifier` to `new_identifier`.
    ///
    /// Fails if no room has `identifier` or another room already uses
    /// `new_identifier`. The room's comparison record follows the new name.
    pub fn rename_room(&mut self, identifier: &str, new_identifier: &str) -> Result<()> {
        if identifier != new_identifier && self.room_by_identifier(new_identifier).is_some() {
            return Err(Error::DuplicateIdentifier(new_identifier.to_string()));
        }
        let room = self
            .room_by_identifier_mut(identifier)
            .ok_or_else(|| Error::RoomNotFound(identifier.to_string()))?;
        room.set_identifier(new_identifier);
        Ok(())
    }

    pub fn floor_area(&self) -> f64 {
        self.buildings.iter().map(Building::floor_area).sum()
    }

    /// Captures a comparison baseline on every room.
    pub fn reset_comparison(&mut self) {
        let mut rooms = 0usize;
        for room in self.room_2ds_mut() {
            room.reset_comparison();
            rooms += 1;
        }
        tracing::debug!(model = %self.identifier, rooms, "reset comparison baselines");
    }

    /// Applies the room comparison blocks of a serialized model to this
    /// model's rooms, matched by position. Returns the number of rooms updated.
    pub fn apply_comparison_properties_from_dict(&mut self, data: &Value) -> Result<usize> {
        ModelComparisonRecord::apply_properties_from_dict(self.room_2ds_mut(), data)
    }

    /// Snaps every room's floor onto `points` using the model tolerance.
    ///
    /// No room is changed if any room's snapped floor is degenerate.
    pub fn snap_to_points(&mut self, points: &[Point2<f64>], distance: f64) -> Result<()> {
        let snapped = self
            .room_2ds()
            .map(|room| {
                let mut room = room.clone();
                room.snap_to_points_with_tolerance(points, distance, self.tolerance)?;
                Ok(room)
            })
            .collect::<Result<Vec<_>>>()?;
        for (room, snapped) in self.room_2ds_mut().zip(snapped) {
            *room = snapped;
        }
        Ok(())
    }

    /// Deep copy with the same identifier.
    pub fn duplicate(&self) -> Model {
        self.clone()
    }

    /// Deep copy under a new identifier.
    pub fn duplicate_as(&self, identifier: impl Into<String>) -> Model {
        let mut copy = self.clone();
        copy.set_identifier(identifier);
        copy
    }

    pub fn to_dict(&self) -> Result<Value> {
        to_value(&ModelDict {
            kind: "Model".to_string(),
            identifier: self.identifier.clone(),
            display_name: self.display_name.clone(),
            buildings: self
                .buildings
                .iter()
                .map(Building::to_dict)
                .collect::<Result<_>>()?,
            tolerance: self.tolerance,
            properties: Some(self.properties.to_dict()),
        })
    }

    /// Deserializes a model. Room comparison blocks are restored with their rooms.
    pub fn from_dict(data: &Value) -> Result<Model> {
        let dict: ModelDict = from_tagged(data, "Model")?;
        if let Some(properties) = &dict.properties {
            check_type(properties, "ModelProperties")?;
            if let Some(comparison) = non_null(properties, "comparison") {
                ModelComparisonRecord::from_dict(comparison, dict.identifier.as_str())?;
            }
        }

        let buildings = dict
            .buildings
            .iter()
            .map(Building::from_dict)
            .collect::<Result<_>>()?;
        let mut model = Model::new(dict.identifier, buildings)?;
        model.display_name = dict.display_name;
        model.set_tolerance(dict.tolerance)?;
        Ok(model)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Model: {}", self.display_name())
    }
}

fn check_unique_rooms<'a>(rooms: impl Iterator<Item = &'a Room2D>) -> Result<()> {
    let mut seen = FxHashSet::default();
    for room in rooms {
        if !seen.insert(room.identifier()) {
            return Err(Error::DuplicateIdentifier(room.identifier().to_string()));
        }
    }
    Ok(())
}
