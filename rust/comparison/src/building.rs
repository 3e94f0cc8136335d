// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stories and buildings: ordered containers of rooms.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dictionary::{from_tagged, to_value};
use crate::error::{Error, Result};
use crate::room2d::Room2D;

#[derive(Debug, Serialize, Deserialize)]
struct StoryDict {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
    #[serde(default)]
    room_2ds: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    floor_to_floor_height: Option<f64>,
    #[serde(default = "default_multiplier")]
    multiplier: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct BuildingDict {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
    #[serde(default)]
    stories: Vec<Value>,
}

fn default_multiplier() -> u32 {
    1
}

/// A level of a building.
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    identifier: String,
    room_2ds: Vec<Room2D>,
    floor_to_floor_height: Option<f64>,
    multiplier: u32,
}

impl Story {
    pub fn new(identifier: impl Into<String>, room_2ds: Vec<Room2D>) -> Self {
        Self {
            identifier: identifier.into(),
            room_2ds,
            floor_to_floor_height: None,
            multiplier: 1,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn room_2ds(&self) -> &[Room2D] {
        &self.room_2ds
    }

    pub fn room_2ds_mut(&mut self) -> &mut [Room2D] {
        &mut self.room_2ds
    }

    pub fn add_room_2d(&mut self, room: Room2D) {
        self.room_2ds.push(room);
    }

    pub fn floor_to_floor_height(&self) -> Option<f64> {
        self.floor_to_floor_height
    }

    pub fn set_floor_to_floor_height(&mut self, height: Option<f64>) -> Result<()> {
        if let Some(h) = height {
            if h <= 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "floor_to_floor_height must be positive, got {h}"
                )));
            }
        }
        self.floor_to_floor_height = height;
        Ok(())
    }

    /// Number of identical stories this one stands for.
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn set_multiplier(&mut self, multiplier: u32) -> Result<()> {
        if multiplier == 0 {
            return Err(Error::InvalidParameter("story multiplier must be at least 1".into()));
        }
        self.multiplier = multiplier;
        Ok(())
    }

    /// Elevation of the lowest room floor, `None` for an empty story.
    pub fn floor_height(&self) -> Option<f64> {
        self.room_2ds
            .iter()
            .map(Room2D::floor_height)
            .reduce(f64::min)
    }

    /// Floor area of all rooms, without the multiplier.
    pub fn floor_area(&self) -> f64 {
        self.room_2ds.iter().map(Room2D::floor_area).sum()
    }

    pub fn to_dict(&self) -> Result<Value> {
        to_value(&StoryDict {
            kind: "Story".to_string(),
            identifier: self.identifier.clone(),
            room_2ds: self
                .room_2ds
                .iter()
                .map(Room2D::to_dict)
                .collect::<Result<_>>()?,
            floor_to_floor_height: self.floor_to_floor_height,
            multiplier: self.multiplier,
        })
    }

    pub fn from_dict(data: &Value) -> Result<Story> {
        let dict: StoryDict = from_tagged(data, "Story")?;
        let rooms = dict
            .room_2ds
            .iter()
            .map(Room2D::from_dict)
            .collect::<Result<_>>()?;
        let mut story = Story::new(dict.identifier, rooms);
        story.set_floor_to_floor_height(dict.floor_to_floor_height)?;
        story.set_multiplier(dict.multiplier)?;
        Ok(story)
    }
}

/// A building made of stories.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    identifier: String,
    stories: Vec<Story>,
}

impl Building {
    pub fn new(identifier: impl Into<String>, stories: Vec<Story>) -> Self {
        Self {
            identifier: identifier.into(),
            stories,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn stories_mut(&mut self) -> &mut [Story] {
        &mut self.stories
    }

    /// Rooms of every story, in story order.
    pub fn room_2ds(&self) -> impl Iterator<Item = &Room2D> {
        self.stories.iter().flat_map(|s| s.room_2ds.iter())
    }

    pub fn room_2ds_mut(&mut self) -> impl Iterator<Item = &mut Room2D> {
        self.stories.iter_mut().flat_map(|s| s.room_2ds.iter_mut())
    }

    /// Floor area of all stories, counting story multipliers.
    pub fn floor_area(&self) -> f64 {
        self.stories
            .iter()
            .map(|s| s.floor_area() * f64::from(s.multiplier))
            .sum()
    }

    pub fn to_dict(&self) -> Result<Value> {
        to_value(&BuildingDict {
            kind: "Building".to_string(),
            identifier: self.identifier.clone(),
            stories: self
                .stories
                .iter()
                .map(Story::to_dict)
                .collect::<Result<_>>()?,
        })
    }

    pub fn from_dict(data: &Value) -> Result<Building> {
        let dict: BuildingDict = from_tagged(data, "Building")?;
        let stories = dict
            .stories
            .iter()
            .map(Story::from_dict)
            .collect::<Result<_>>()?;
        Ok(Building::new(dict.identifier, stories))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use floorplan_geometry::Face3D;

    fn room(id: &str, x: f64) -> Room2D {
        Room2D::new(id, Face3D::rectangle([x, 0.0], 5.0, 4.0, 0.0), 3.0).unwrap()
    }

    fn building() -> Building {
        let mut ground = Story::new("Ground", vec![room("a", 0.0), room("b", 5.0)]);
        ground.set_multiplier(2).unwrap();
        let roof = Story::new("Roof", vec![room("c", 0.0)]);
        Building::new("Office", vec![ground, roof])
    }

    #[test]
    fn rooms_in_story_order() {
        let building = building();
        let ids: Vec<_> = building.room_2ds().map(Room2D::identifier).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_relative_eq!(building.stories()[0].floor_area(), 40.0, epsilon = 1e-9);
        assert_eq!(building.stories()[0].floor_height(), Some(0.0));
        assert_eq!(Story::new("Empty", Vec::new()).floor_height(), None);
        assert_relative_eq!(building.floor_area(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn invalid_story_values() {
        let mut story = Story::new("s", Vec::new());
        assert!(story.set_multiplier(0).is_err());
        assert!(story.set_floor_to_floor_height(Some(-1.0)).is_err());
        story.set_floor_to_floor_height(Some(3.5)).unwrap();
        assert_eq!(story.floor_to_floor_height(), Some(3.5));
    }

    #[test]
    fn dict_round_trip() {
        let building = building();
        let dict = building.to_dict().unwrap();
        assert_eq!(dict["type"], "Building");
        assert_eq!(dict["stories"][0]["type"], "Story");
        assert_eq!(dict["stories"][0]["multiplier"], 2);
        assert_eq!(dict["stories"][0]["room_2ds"][1]["identifier"], "b");

        assert_eq!(Building::from_dict(&dict).unwrap(), building);
    }

    #[test]
    fn story_defaults_from_dict() {
        let dict = serde_json::json!({"type": "Story", "identifier": "Empty"});
        let story = Story::from_dict(&dict).unwrap();
        assert_eq!(story.multiplier(), 1);
        assert!(story.room_2ds().is_empty());
    }
}
