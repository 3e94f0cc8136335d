// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Comparison properties of a whole [`Model`](crate::model::Model).
//!
//! The model-level record holds no metrics. It routes the per-room
//! comparison dictionaries of a serialized model to the matching rooms.

use serde_json::{json, Value};

use crate::dictionary::{check_type, non_null};
use crate::error::{Error, Result};
use crate::room2d::Room2D;

/// Dictionary `"type"` of a serialized [`ModelComparisonRecord`].
pub const MODEL_COMPARISON_TYPE: &str = "ModelComparisonRecord";

/// Comparison properties attached to a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelComparisonRecord {
    host: String,
}

impl ModelComparisonRecord {
    /// Creates the record for the model identified by `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// Identifier of the model this record belongs to.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub(crate) fn rebind(&mut self, host: &str) {
        self.host = host.to_string();
    }

    pub fn to_dict(&self) -> Value {
        json!({ "type": MODEL_COMPARISON_TYPE })
    }

    /// Validates the `"type"` tag and creates a record for `host`.
    pub fn from_dict(data: &Value, host: impl Into<String>) -> Result<Self> {
        check_type(data, MODEL_COMPARISON_TYPE)?;
        Ok(Self::new(host))
    }

    /// Copies the record, binding the copy to `new_host` (or the same host).
    pub fn duplicate(&self, new_host: Option<&str>) -> Self {
        Self::new(new_host.unwrap_or(&self.host))
    }

    /// Applies the room comparison dictionaries found in a serialized model
    /// to `rooms`, matched by position.
    ///
    /// `data` is a full model dictionary and must carry a comparison block
    /// under `properties`. `rooms` must be in the model's serialization order
    /// (buildings, then stories, then rooms). Rooms whose entry is null or
    /// missing are left untouched, as are rooms beyond the end of the
    /// dictionary list. Every entry is validated before any room is written,
    /// so an invalid entry leaves all rooms unchanged.
    ///
    /// Returns the number of rooms that were updated.
    pub fn apply_properties_from_dict<'a, I>(rooms: I, data: &Value) -> Result<usize>
    where
        I: IntoIterator<Item = &'a mut Room2D>,
    {
        let block = non_null(data, "properties")
            .and_then(|p| non_null(p, "comparison"))
            .ok_or(Error::MissingComparisonBlock)?;
        check_type(block, MODEL_COMPARISON_TYPE)?;

        let room_dicts = room_comparison_dicts(data);
        let mut rooms: Vec<&'a mut Room2D> = rooms.into_iter().collect();

        let mut updates = Vec::new();
        for (i, (room_dict, room)) in room_dicts.iter().zip(&rooms).enumerate() {
            if let Some(room_dict) = room_dict {
                let mut record = room.properties().comparison().clone();
                record.apply_properties_from_dict(room_dict)?;
                updates.push((i, record));
            }
        }

        let applied = updates.len();
        for (i, record) in updates {
            *rooms[i].properties_mut().comparison_mut() = record;
        }

        let unmatched = rooms.len().saturating_sub(room_dicts.len());
        if unmatched > 0 {
            tracing::warn!(
                unmatched,
                entries = room_dicts.len(),
                "fewer room comparison entries than rooms; remaining rooms left untouched"
            );
        }
        tracing::debug!(applied, "applied model comparison properties");
        Ok(applied)
    }
}

impl std::fmt::Display for ModelComparisonRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Model Comparison Record: {}", self.host)
    }
}

/// Collects the comparison dictionary of every room in a serialized model,
/// in serialization order. Rooms without one yield `None`.
pub fn room_comparison_dicts(data: &Value) -> Vec<Option<&Value>> {
    let mut dicts = Vec::new();
    for building in array(data, "buildings") {
        for story in array(building, "stories") {
            for room in array(story, "room_2ds") {
                dicts.push(
                    non_null(room, "properties").and_then(|p| non_null(p, "comparison")),
                );
            }
        }
    }
    dicts
}

fn array<'a>(data: &'a Value, key: &str) -> &'a [Value] {
    data.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::WindowParameter;
    use floorplan_geometry::Face3D;

    fn room(id: &str) -> Room2D {
        let mut room = Room2D::new(id, Face3D::rectangle([0.0, 0.0], 4.0, 4.0, 0.0), 3.0).unwrap();
        room.set_outdoor_window_parameters(WindowParameter::simple_ratio(0.3))
            .unwrap();
        room
    }

    fn baseline_dict(room: &mut Room2D) -> Value {
        room.reset_comparison();
        room.properties().comparison().to_dict().unwrap()
    }

    fn model_dict(room_dicts: Vec<Value>) -> Value {
        let rooms: Vec<Value> = room_dicts
            .into_iter()
            .map(|c| json!({"type": "Room2D", "properties": {"type": "Room2DProperties", "comparison": c}}))
            .collect();
        json!({
            "type": "Model",
            "buildings": [{"type": "Building", "stories": [{"type": "Story", "room_2ds": rooms}]}],
            "properties": {"type": "ModelProperties", "comparison": {"type": "ModelComparisonRecord"}}
        })
    }

    #[test]
    fn dict_and_duplicate() {
        let record = ModelComparisonRecord::new("Model");
        assert_eq!(record.to_dict(), json!({"type": "ModelComparisonRecord"}));
        assert_eq!(
            ModelComparisonRecord::from_dict(&record.to_dict(), "Model").unwrap(),
            record
        );
        assert_eq!(record.duplicate(None).host(), "Model");
        assert_eq!(record.duplicate(Some("Other")).host(), "Other");
        assert_eq!(record.to_string(), "Model Comparison Record: Model");
    }

    #[test]
    fn from_dict_checks_type() {
        assert!(matches!(
            ModelComparisonRecord::from_dict(&json!({"type": "RoomComparisonRecord"}), "m"),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn apply_requires_comparison_block() {
        let mut rooms = vec![room("a")];
        let data = json!({"type": "Model", "buildings": [], "properties": {"type": "ModelProperties"}});
        assert_eq!(
            ModelComparisonRecord::apply_properties_from_dict(&mut rooms, &data),
            Err(Error::MissingComparisonBlock)
        );
    }

    #[test]
    fn apply_matches_rooms_by_position() {
        let mut source = room("a");
        let dict = baseline_dict(&mut source);

        let mut rooms = vec![room("a"), room("b")];
        let data = model_dict(vec![Value::Null, dict]);
        let applied = ModelComparisonRecord::apply_properties_from_dict(&mut rooms, &data).unwrap();

        assert_eq!(applied, 1);
        assert!(!rooms[0].comparison().has_baseline());
        assert!(rooms[1].comparison().has_baseline());
        // The host binding is kept.
        assert_eq!(rooms[1].properties().comparison().host(), "b");
    }

    #[test]
    fn shorter_entry_list_applies_prefix() {
        let mut source = room("a");
        let dict = baseline_dict(&mut source);

        let mut rooms = vec![room("a"), room("b"), room("c")];
        rooms[2].properties_mut().comparison_mut().capture(
            Face3D::rectangle([0.0, 0.0], 1.0, 1.0, 0.0),
            vec![None; 4],
            None,
        );
        let untouched = rooms[2].properties().comparison().clone();

        let data = model_dict(vec![dict]);
        let applied = ModelComparisonRecord::apply_properties_from_dict(&mut rooms, &data).unwrap();

        assert_eq!(applied, 1);
        assert!(rooms[0].comparison().has_baseline());
        assert!(!rooms[1].comparison().has_baseline());
        assert_eq!(rooms[2].properties().comparison(), &untouched);
    }

    #[test]
    fn invalid_entry_leaves_every_room_unchanged() {
        let mut source = room("a");
        let dict = baseline_dict(&mut source);

        let mut rooms = vec![room("a"), room("b")];
        let before = rooms.clone();
        let data = model_dict(vec![dict, json!({"type": "Bogus"})]);

        assert!(matches!(
            ModelComparisonRecord::apply_properties_from_dict(&mut rooms, &data),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(!rooms[0].comparison().has_baseline());
        assert_eq!(rooms, before);
    }

    #[test]
    fn collects_dicts_across_buildings_and_stories() {
        let data = json!({
            "buildings": [
                {"stories": [
                    {"room_2ds": [{"properties": {"comparison": {"type": "RoomComparisonRecord"}}}]},
                    {"room_2ds": [{"properties": {}}, {}]}
                ]},
                {"stories": [{"room_2ds": [{"properties": {"comparison": null}}]}]}
            ]
        });
        let dicts = room_comparison_dicts(&data);
        assert_eq!(dicts.len(), 4);
        assert!(dicts[0].is_some());
        assert!(dicts[1..].iter().all(Option::is_none));
    }
}
