// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Comparison baseline attached to a [`Room2D`].
//!
//! A [`RoomComparisonRecord`] stores a snapshot of a room's floor boundary,
//! per-edge windows and skylights taken at the last reset. The snapshot is
//! plain data: moving, scaling or snapping the room afterwards changes only
//! the room's current state. Differences are computed live by
//! [`RoomComparison`], which pairs a record with the room that owns it.
//!
//! Windows are matched by edge index. An edge present on only one side
//! contributes its full opening area to the difference.

use std::borrow::Cow;

use floorplan_geometry::Face3D;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dictionary::{check_type, to_value};
use crate::error::{Error, Result};
use crate::parameters::{edge_sub_face_areas, SkylightParameter, WindowParameter};
use crate::properties::extension::{GridParameter, ModifierSet};
use crate::room2d::Room2D;

/// Dictionary `"type"` of a serialized [`RoomComparisonRecord`].
pub const ROOM_COMPARISON_TYPE: &str = "RoomComparisonRecord";

/// Serialized shape of a room comparison record. Absent fields are omitted.
#[derive(Debug, Serialize, Deserialize)]
struct RoomComparisonDict {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    floor_boundary: Option<Face3D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    window_parameters: Option<Vec<Option<WindowParameter>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    skylight_parameters: Option<SkylightParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    modifier_set: Option<ModifierSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid_parameters: Option<Vec<GridParameter>>,
}

/// Baseline snapshot of a room, plus opaque comparison references.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomComparisonRecord {
    host: String,
    comparison_floor_geometry: Option<Face3D>,
    comparison_windows: Option<Vec<Option<WindowParameter>>>,
    comparison_skylight: Option<SkylightParameter>,
    modifier_set: Option<ModifierSet>,
    grid_parameters: Option<Vec<GridParameter>>,
}

impl RoomComparisonRecord {
    /// Creates a record with no baseline for the room identified by `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            comparison_floor_geometry: None,
            comparison_windows: None,
            comparison_skylight: None,
            modifier_set: None,
            grid_parameters: None,
        }
    }

    /// Identifier of the room this record belongs to.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub(crate) fn rebind(&mut self, host: &str) {
        self.host = host.to_string();
    }

    pub fn comparison_floor_geometry(&self) -> Option<&Face3D> {
        self.comparison_floor_geometry.as_ref()
    }

    pub fn comparison_windows(&self) -> Option<&[Option<WindowParameter>]> {
        self.comparison_windows.as_deref()
    }

    pub fn comparison_skylight(&self) -> Option<&SkylightParameter> {
        self.comparison_skylight.as_ref()
    }

    /// Returns `true` once a baseline floor has been captured or assigned.
    pub fn has_baseline(&self) -> bool {
        self.comparison_floor_geometry.is_some()
    }

    /// Sets the baseline floor boundary.
    ///
    /// Fails if baseline windows are set and do not match the new segment count.
    pub fn set_comparison_floor_geometry(&mut self, floor: Option<Face3D>) -> Result<()> {
        check_window_count(floor.as_ref(), self.comparison_windows.as_deref())?;
        self.comparison_floor_geometry = floor;
        Ok(())
    }

    /// Sets the baseline per-edge windows.
    ///
    /// Fails if a baseline floor is set and has a different segment count.
    pub fn set_comparison_windows(
        &mut self,
        windows: Option<Vec<Option<WindowParameter>>>,
    ) -> Result<()> {
        check_window_count(self.comparison_floor_geometry.as_ref(), windows.as_deref())?;
        self.comparison_windows = windows;
        Ok(())
    }

    pub fn set_comparison_skylight(&mut self, skylight: Option<SkylightParameter>) {
        self.comparison_skylight = skylight;
    }

    /// Replaces the baseline with a snapshot of `host`'s current state.
    pub fn reset(&mut self, host: &Room2D) {
        self.capture(
            host.floor_geometry().clone(),
            host.window_parameters().to_vec(),
            host.effective_skylight_parameters().cloned(),
        );
    }

    pub(crate) fn capture(
        &mut self,
        floor: Face3D,
        windows: Vec<Option<WindowParameter>>,
        skylight: Option<SkylightParameter>,
    ) {
        tracing::debug!(
            room = %self.host,
            segments = floor.vertex_count(),
            skylight = skylight.is_some(),
            "captured comparison baseline"
        );
        self.comparison_floor_geometry = Some(floor);
        self.comparison_windows = Some(windows);
        self.comparison_skylight = skylight;
    }

    /// Removes the baseline. Modifier set and grid parameters are kept.
    pub fn clear_baseline(&mut self) {
        self.comparison_floor_geometry = None;
        self.comparison_windows = None;
        self.comparison_skylight = None;
    }

    /// Assigned modifier set, or the generic set when none is assigned.
    pub fn modifier_set(&self) -> Cow<'_, ModifierSet> {
        match &self.modifier_set {
            Some(set) => Cow::Borrowed(set),
            None => Cow::Owned(ModifierSet::generic()),
        }
    }

    /// Modifier set explicitly assigned to this room, if any.
    pub fn assigned_modifier_set(&self) -> Option<&ModifierSet> {
        self.modifier_set.as_ref()
    }

    pub fn set_modifier_set(&mut self, modifier_set: Option<ModifierSet>) {
        self.modifier_set = modifier_set;
    }

    pub fn grid_parameters(&self) -> Option<&[GridParameter]> {
        self.grid_parameters.as_deref()
    }

    pub fn set_grid_parameters(&mut self, grid_parameters: Option<Vec<GridParameter>>) {
        self.grid_parameters = grid_parameters;
    }

    /// Serializes the record. Fields that are not set are omitted.
    pub fn to_dict(&self) -> Result<Value> {
        to_value(&RoomComparisonDict {
            kind: ROOM_COMPARISON_TYPE.to_string(),
            floor_boundary: self.comparison_floor_geometry.clone(),
            window_parameters: self.comparison_windows.clone(),
            skylight_parameters: self.comparison_skylight.clone(),
            modifier_set: self.modifier_set.clone(),
            grid_parameters: self.grid_parameters.clone(),
        })
    }

    /// Deserializes a record for the room identified by `host`.
    pub fn from_dict(data: &Value, host: impl Into<String>) -> Result<Self> {
        let mut record = Self::new(host);
        record.apply_properties_from_dict(data)?;
        Ok(record)
    }

    /// Applies the fields present in `data` to this record, leaving the
    /// others untouched.
    ///
    /// The record is left unchanged if `data` fails validation.
    pub fn apply_properties_from_dict(&mut self, data: &Value) -> Result<()> {
        check_type(data, ROOM_COMPARISON_TYPE)?;
        let dict = RoomComparisonDict::deserialize(data)?;

        let floor = dict
            .floor_boundary
            .or_else(|| self.comparison_floor_geometry.clone());
        let windows = dict
            .window_parameters
            .or_else(|| self.comparison_windows.clone());
        check_window_count(floor.as_ref(), windows.as_deref())?;
        if let Some(windows) = &windows {
            for window in windows.iter().flatten() {
                window.validate()?;
            }
        }
        if let Some(skylight) = &dict.skylight_parameters {
            skylight.validate()?;
        }

        self.comparison_floor_geometry = floor;
        self.comparison_windows = windows;
        if dict.skylight_parameters.is_some() {
            self.comparison_skylight = dict.skylight_parameters;
        }
        if dict.modifier_set.is_some() {
            self.modifier_set = dict.modifier_set;
        }
        if dict.grid_parameters.is_some() {
            self.grid_parameters = dict.grid_parameters;
        }
        tracing::debug!(room = %self.host, "applied comparison properties");
        Ok(())
    }

    /// Copies the record, binding the copy to `new_host` (or the same host).
    pub fn duplicate(&self, new_host: Option<&str>) -> Self {
        let mut copy = self.clone();
        if let Some(host) = new_host {
            copy.rebind(host);
        }
        copy
    }

    /// Baseline wall opening area of each baseline floor segment.
    fn baseline_edge_areas(&self, floor_to_ceiling_height: f64) -> Option<Vec<f64>> {
        let floor = self.comparison_floor_geometry.as_ref()?;
        let windows = self.comparison_windows.as_ref()?;
        Some(edge_sub_face_areas(floor, windows, floor_to_ceiling_height))
    }
}

impl std::fmt::Display for RoomComparisonRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Room Comparison Record: {}", self.host)
    }
}

fn check_window_count(
    floor: Option<&Face3D>,
    windows: Option<&[Option<WindowParameter>]>,
) -> Result<()> {
    match (floor, windows) {
        (Some(floor), Some(windows)) if floor.vertex_count() != windows.len() => {
            Err(Error::EdgeCountMismatch {
                field: "comparison windows",
                expected: floor.vertex_count(),
                found: windows.len(),
            })
        }
        _ => Ok(()),
    }
}

/// `100 * difference / baseline`.
///
/// A zero difference is a 0 % change even when the baseline is zero. A
/// non-zero difference against a zero baseline is undefined and yields `None`.
pub fn percent_change(difference: f64, baseline: f64) -> Option<f64> {
    if difference == 0.0 {
        Some(0.0)
    } else if baseline == 0.0 {
        None
    } else {
        Some(100.0 * difference / baseline)
    }
}

/// Live comparison between a room's baseline and its current state.
///
/// Obtained from [`Room2D::comparison`]. Nothing is cached; every call reads
/// the room as it is now.
#[derive(Debug, Clone, Copy)]
pub struct RoomComparison<'a> {
    record: &'a RoomComparisonRecord,
    room: &'a Room2D,
}

impl<'a> RoomComparison<'a> {
    pub(crate) fn new(record: &'a RoomComparisonRecord, room: &'a Room2D) -> Self {
        Self { record, room }
    }

    pub fn record(&self) -> &'a RoomComparisonRecord {
        self.record
    }

    pub fn has_baseline(&self) -> bool {
        self.record.has_baseline()
    }

    /// Baseline floor area, or 0 without a baseline.
    pub fn floor_area(&self) -> f64 {
        self.record
            .comparison_floor_geometry
            .as_ref()
            .map_or(0.0, Face3D::area)
    }

    /// Absolute difference between the baseline and current floor areas.
    pub fn floor_area_difference(&self) -> f64 {
        match &self.record.comparison_floor_geometry {
            Some(floor) => (floor.area() - self.room.floor_area()).abs(),
            None => 0.0,
        }
    }

    pub fn floor_area_percent_change(&self) -> Option<f64> {
        percent_change(self.floor_area_difference(), self.floor_area())
    }

    /// Total baseline window area, or 0 without baseline windows.
    pub fn wall_sub_face_area(&self) -> f64 {
        self.record
            .baseline_edge_areas(self.room.floor_to_ceiling_height())
            .map_or(0.0, |areas| areas.iter().sum())
    }

    /// Sum over edges of the absolute window area change.
    pub fn wall_sub_face_area_difference(&self) -> f64 {
        let Some(baseline) = self
            .record
            .baseline_edge_areas(self.room.floor_to_ceiling_height())
        else {
            return 0.0;
        };
        let current = self.room.wall_sub_face_areas();

        let edges = baseline.len().max(current.len());
        (0..edges)
            .map(|i| {
                let before = baseline.get(i).copied().unwrap_or(0.0);
                let after = current.get(i).copied().unwrap_or(0.0);
                (before - after).abs()
            })
            .sum()
    }

    pub fn wall_sub_face_area_percent_change(&self) -> Option<f64> {
        percent_change(
            self.wall_sub_face_area_difference(),
            self.wall_sub_face_area(),
        )
    }

    /// Baseline skylight area, or 0 without a baseline.
    pub fn roof_sub_face_area(&self) -> f64 {
        match (
            &self.record.comparison_floor_geometry,
            &self.record.comparison_skylight,
        ) {
            (Some(floor), Some(skylight)) => skylight.area(floor.area()),
            _ => 0.0,
        }
    }

    /// Absolute difference between baseline and current skylight areas.
    pub fn roof_sub_face_area_difference(&self) -> f64 {
        if !self.record.has_baseline() {
            return 0.0;
        }
        (self.roof_sub_face_area() - self.room.skylight_area()).abs()
    }

    pub fn roof_sub_face_area_percent_change(&self) -> Option<f64> {
        percent_change(
            self.roof_sub_face_area_difference(),
            self.roof_sub_face_area(),
        )
    }

    /// Total baseline opening area (walls and roof).
    pub fn sub_face_area(&self) -> f64 {
        self.wall_sub_face_area() + self.roof_sub_face_area()
    }

    pub fn sub_face_area_difference(&self) -> f64 {
        self.wall_sub_face_area_difference() + self.roof_sub_face_area_difference()
    }

    pub fn sub_face_area_percent_change(&self) -> Option<f64> {
        percent_change(self.sub_face_area_difference(), self.sub_face_area())
    }
}
