// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rooms described by a horizontal floor polygon and a height.
//!
//! Walls are the vertical extrusions of the floor segments. Everything that
//! is stored per wall (boundary conditions, window parameters) is indexed by
//! floor segment, so edits that change the floor's vertices also realign that
//! data.

use floorplan_geometry::{Face3D, Point2, Point3, Vector3, DEFAULT_TOLERANCE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::boundary::BoundaryCondition;
use crate::dictionary::{check_type, from_tagged, non_null, to_value};
use crate::error::{Error, Result};
use crate::parameters::{edge_sub_face_areas, SkylightParameter, WindowParameter};
use crate::properties::{Room2DProperties, RoomComparison};

/// Serialized shape of a [`Room2D`].
#[derive(Debug, Serialize, Deserialize)]
struct Room2DDict {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    floor_boundary: Face3D,
    floor_to_ceiling_height: f64,
    #[serde(default)]
    boundary_conditions: Vec<BoundaryCondition>,
    #[serde(default)]
    window_parameters: Vec<Option<WindowParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    skylight_parameters: Option<SkylightParameter>,
    #[serde(default)]
    is_top_exposed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<Value>,
}

/// A single-story room.
#[derive(Debug, Clone, PartialEq)]
pub struct Room2D {
    identifier: String,
    display_name: Option<String>,
    floor_geometry: Face3D,
    floor_to_ceiling_height: f64,
    boundary_conditions: Vec<BoundaryCondition>,
    window_parameters: Vec<Option<WindowParameter>>,
    skylight_parameters: Option<SkylightParameter>,
    is_top_exposed: bool,
    properties: Room2DProperties,
}

impl Room2D {
    /// Creates a room with outdoor walls and no openings.
    ///
    /// The floor is re-oriented to face upward. Returns an error if the floor
    /// is vertical or degenerate, or if the height is not positive.
    pub fn new(
        identifier: impl Into<String>,
        floor_geometry: Face3D,
        floor_to_ceiling_height: f64,
    ) -> Result<Self> {
        let identifier = identifier.into();
        let (floor_geometry, _) = upward_floor(&identifier, floor_geometry)?;
        check_height(floor_to_ceiling_height)?;

        let segments = floor_geometry.vertex_count();
        Ok(Self {
            properties: Room2DProperties::new(&identifier),
            identifier,
            display_name: None,
            floor_geometry,
            floor_to_ceiling_height,
            boundary_conditions: vec![BoundaryCondition::Outdoors; segments],
            window_parameters: vec![None; segments],
            skylight_parameters: None,
            is_top_exposed: false,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Renames the room. Extension records follow the new identifier.
    ///
    /// Rooms inside a model are renamed with
    /// [`Model::rename_room`](crate::model::Model::rename_room).
    pub(crate) fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = identifier.into();
        self.properties.rebind(&self.identifier);
    }

    /// Display name, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.identifier)
    }

    pub fn set_display_name(&mut self, display_name: Option<String>) {
        self.display_name = display_name;
    }

    pub fn floor_geometry(&self) -> &Face3D {
        &self.floor_geometry
    }

    /// Replaces the floor polygon.
    ///
    /// Per-wall data is kept when the segment count is unchanged. Otherwise
    /// all walls revert to outdoors without windows.
    pub fn set_floor_geometry(&mut self, floor_geometry: Face3D) -> Result<()> {
        let (floor_geometry, _) = upward_floor(&self.identifier, floor_geometry)?;
        let segments = floor_geometry.vertex_count();
        if segments != self.segment_count() {
            self.boundary_conditions = vec![BoundaryCondition::Outdoors; segments];
            self.window_parameters = vec![None; segments];
        }
        self.floor_geometry = floor_geometry;
        Ok(())
    }

    pub fn floor_to_ceiling_height(&self) -> f64 {
        self.floor_to_ceiling_height
    }

    pub fn set_floor_to_ceiling_height(&mut self, height: f64) -> Result<()> {
        check_height(height)?;
        self.floor_to_ceiling_height = height;
        Ok(())
    }

    /// Number of floor segments (and walls).
    pub fn segment_count(&self) -> usize {
        self.floor_geometry.vertex_count()
    }

    pub fn boundary_conditions(&self) -> &[BoundaryCondition] {
        &self.boundary_conditions
    }

    /// Sets one boundary condition per wall.
    ///
    /// Fails if the count is wrong or a wall that has windows stops being
    /// outdoors.
    pub fn set_boundary_conditions(&mut self, conditions: Vec<BoundaryCondition>) -> Result<()> {
        self.check_edge_count("boundary conditions", conditions.len())?;
        self.check_windows_hosted(&conditions, &self.window_parameters)?;
        self.boundary_conditions = conditions;
        Ok(())
    }

    pub fn window_parameters(&self) -> &[Option<WindowParameter>] {
        &self.window_parameters
    }

    /// Sets the windows of every wall.
    ///
    /// Fails if the count is wrong, a parameter is invalid, or windows are
    /// placed on a wall that is not outdoors.
    pub fn set_window_parameters(&mut self, windows: Vec<Option<WindowParameter>>) -> Result<()> {
        self.check_edge_count("window parameters", windows.len())?;
        for window in windows.iter().flatten() {
            window.validate()?;
        }
        self.check_windows_hosted(&self.boundary_conditions, &windows)?;
        self.window_parameters = windows;
        Ok(())
    }

    /// Assigns `window` to every outdoor wall and clears the others.
    pub fn set_outdoor_window_parameters(&mut self, window: WindowParameter) -> Result<()> {
        window.validate()?;
        self.window_parameters = self
            .boundary_conditions
            .iter()
            .map(|bc| bc.can_host_windows().then(|| window.clone()))
            .collect();
        Ok(())
    }

    pub fn skylight_parameters(&self) -> Option<&SkylightParameter> {
        self.skylight_parameters.as_ref()
    }

    pub fn set_skylight_parameters(&mut self, skylight: Option<SkylightParameter>) -> Result<()> {
        if let Some(skylight) = &skylight {
            skylight.validate()?;
        }
        self.skylight_parameters = skylight;
        Ok(())
    }

    pub fn is_top_exposed(&self) -> bool {
        self.is_top_exposed
    }

    pub fn set_top_exposed(&mut self, is_top_exposed: bool) {
        self.is_top_exposed = is_top_exposed;
    }

    /// Skylight parameters that actually produce openings: `None` unless the
    /// roof is exposed.
    pub fn effective_skylight_parameters(&self) -> Option<&SkylightParameter> {
        self.skylight_parameters
            .as_ref()
            .filter(|_| self.is_top_exposed)
    }

    pub fn floor_area(&self) -> f64 {
        self.floor_geometry.area()
    }

    /// Elevation of the floor (its lowest vertex).
    pub fn floor_height(&self) -> f64 {
        self.floor_geometry.min_z()
    }

    /// Vertex average of the floor boundary.
    pub fn center(&self) -> Point3<f64> {
        self.floor_geometry.centroid()
    }

    /// Area of all outdoor walls.
    pub fn exterior_wall_area(&self) -> f64 {
        self.floor_geometry
            .segment_lengths()
            .iter()
            .zip(&self.boundary_conditions)
            .filter(|(_, bc)| **bc == BoundaryCondition::Outdoors)
            .map(|(len, _)| len * self.floor_to_ceiling_height)
            .sum()
    }

    /// Window area on each wall, in floor segment order.
    pub fn wall_sub_face_areas(&self) -> Vec<f64> {
        edge_sub_face_areas(
            &self.floor_geometry,
            &self.window_parameters,
            self.floor_to_ceiling_height,
        )
    }

    /// Total window area on all walls.
    pub fn exterior_aperture_area(&self) -> f64 {
        self.wall_sub_face_areas().iter().sum()
    }

    /// Total skylight area, 0 if the roof is not exposed.
    pub fn skylight_area(&self) -> f64 {
        self.effective_skylight_parameters()
            .map_or(0.0, |s| s.area(self.floor_area()))
    }

    pub fn properties(&self) -> &Room2DProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Room2DProperties {
        &mut self.properties
    }

    /// Baseline-vs-current comparison of this room.
    pub fn comparison(&self) -> RoomComparison<'_> {
        RoomComparison::new(self.properties.comparison(), self)
    }

    /// Captures the current floor, windows and skylights as the comparison
    /// baseline.
    pub fn reset_comparison(&mut self) {
        let floor = self.floor_geometry.clone();
        let windows = self.window_parameters.clone();
        let skylight = self.effective_skylight_parameters().cloned();
        self.properties
            .comparison_mut()
            .capture(floor, windows, skylight);
    }

    // --- Transforms ---
    //
    // Transforms edit the current state only; the comparison baseline is
    // stored data and stays where it was captured.

    /// Translates the room.
    pub fn move_by(&mut self, vector: &Vector3<f64>) {
        self.floor_geometry = self.floor_geometry.moved(vector);
    }

    /// Rotates the room counterclockwise in plan around `origin` (radians).
    pub fn rotate_xy(&mut self, angle: f64, origin: &Point3<f64>) {
        self.floor_geometry = self.floor_geometry.rotated_xy(angle, origin);
    }

    /// Scales the room, its height and its openings by `factor` around
    /// `origin` (the world origin if `None`).
    pub fn scale(&mut self, factor: f64, origin: Option<&Point3<f64>>) {
        let origin = origin.copied().unwrap_or_else(Point3::origin);
        self.floor_geometry = self.floor_geometry.scaled(factor, &origin);
        self.floor_to_ceiling_height *= factor;
        self.window_parameters = self
            .window_parameters
            .iter()
            .map(|w| w.as_ref().map(|w| w.scale(factor)))
            .collect();
        self.skylight_parameters = self.skylight_parameters.as_ref().map(|s| s.scale(factor));
    }

    /// Mirrors the room across a vertical plane through `origin`.
    ///
    /// Returns an error if `normal` is not horizontal.
    pub fn reflect(&mut self, normal: &Vector3<f64>, origin: &Point3<f64>) -> Result<()> {
        if normal.z.abs() > 1e-9 {
            return Err(Error::InvalidParameter(
                "reflection plane of a room must be vertical".into(),
            ));
        }
        let reflected = self.floor_geometry.reflected(normal, origin)?;

        let order = reversed_segments(self.segment_count());
        self.boundary_conditions = realign(&self.boundary_conditions, &order);
        self.window_parameters = realign(&self.window_parameters, &order);
        self.floor_geometry = reflected;
        Ok(())
    }

    /// Snaps floor vertices within `distance` (in plan) onto `points`.
    ///
    /// Vertices that collapse together are merged and the walls between them
    /// dropped, with per-wall data realigned to the surviving segments. A
    /// snapped floor whose winding turned over is flipped back to face up.
    /// The room is unchanged if the snapped floor is degenerate.
    pub fn snap_to_points(&mut self, points: &[Point2<f64>], distance: f64) -> Result<()> {
        self.snap_to_points_with_tolerance(points, distance, DEFAULT_TOLERANCE)
    }

    /// [`snap_to_points`](Self::snap_to_points) with an explicit tolerance
    /// for merging vertices.
    pub fn snap_to_points_with_tolerance(
        &mut self,
        points: &[Point2<f64>],
        distance: f64,
        tolerance: f64,
    ) -> Result<()> {
        let snapped = self
            .floor_geometry
            .snapped_to_points(points, distance, tolerance)?;
        let (floor, flipped) = upward_floor(&self.identifier, snapped.face)?;
        let mut order = snapped.kept_vertices;
        if flipped {
            order = realign(&order, &reversed_segments(order.len()));
            tracing::debug!(room = %self.identifier, "snapped floor flipped to face up");
        }
        let removed = self.segment_count() - order.len();
        if removed > 0 {
            tracing::debug!(room = %self.identifier, removed, "snapping merged floor vertices");
        }

        self.boundary_conditions = realign(&self.boundary_conditions, &order);
        self.window_parameters = realign(&self.window_parameters, &order);
        self.floor_geometry = floor;
        Ok(())
    }

    /// Deep copy with the same identifier.
    pub fn duplicate(&self) -> Room2D {
        self.clone()
    }

    /// Deep copy under a new identifier. The copy's extension records are
    /// bound to the copy.
    pub fn duplicate_as(&self, identifier: impl Into<String>) -> Room2D {
        let mut copy = self.clone();
        copy.set_identifier(identifier);
        copy
    }

    pub fn to_dict(&self) -> Result<Value> {
        to_value(&Room2DDict {
            kind: "Room2D".to_string(),
            identifier: self.identifier.clone(),
            display_name: self.display_name.clone(),
            floor_boundary: self.floor_geometry.clone(),
            floor_to_ceiling_height: self.floor_to_ceiling_height,
            boundary_conditions: self.boundary_conditions.clone(),
            window_parameters: self.window_parameters.clone(),
            skylight_parameters: self.skylight_parameters.clone(),
            is_top_exposed: self.is_top_exposed,
            properties: Some(self.properties.to_dict()?),
        })
    }

    /// Deserializes a room, including its comparison record when present.
    pub fn from_dict(data: &Value) -> Result<Room2D> {
        let dict: Room2DDict = from_tagged(data, "Room2D")?;

        let mut room = Room2D::new(
            dict.identifier,
            dict.floor_boundary,
            dict.floor_to_ceiling_height,
        )?;
        room.display_name = dict.display_name;
        if !dict.boundary_conditions.is_empty() {
            room.set_boundary_conditions(dict.boundary_conditions)?;
        }
        if !dict.window_parameters.is_empty() {
            room.set_window_parameters(dict.window_parameters)?;
        }
        room.set_skylight_parameters(dict.skylight_parameters)?;
        room.is_top_exposed = dict.is_top_exposed;

        if let Some(properties) = &dict.properties {
            check_type(properties, "Room2DProperties")?;
            if let Some(comparison) = non_null(properties, "comparison") {
                room.properties
                    .comparison_mut()
                    .apply_properties_from_dict(comparison)?;
            }
        }
        Ok(room)
    }

    fn check_edge_count(&self, field: &'static str, found: usize) -> Result<()> {
        if found != self.segment_count() {
            return Err(Error::EdgeCountMismatch {
                field,
                expected: self.segment_count(),
                found,
            });
        }
        Ok(())
    }

    fn check_windows_hosted(
        &self,
        conditions: &[BoundaryCondition],
        windows: &[Option<WindowParameter>],
    ) -> Result<()> {
        match conditions
            .iter()
            .zip(windows)
            .position(|(bc, w)| w.is_some() && !bc.can_host_windows())
        {
            Some(edge) => Err(Error::WindowOnNonOutdoorWall {
                room: self.identifier.clone(),
                edge,
            }),
            None => Ok(()),
        }
    }
}

impl std::fmt::Display for Room2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Room2D: {}", self.display_name())
    }
}

/// Orients `floor` to face up. The flag is set when the boundary was reversed.
fn upward_floor(room: &str, floor: Face3D) -> Result<(Face3D, bool)> {
    let invalid = |reason: &str| Error::InvalidFloor {
        room: room.to_string(),
        reason: reason.to_string(),
    };
    let normal = floor
        .normal()
        .ok_or_else(|| invalid("floor boundary is degenerate"))?;
    if normal.z.abs() < 1e-6 {
        return Err(invalid("floor boundary is vertical"));
    }
    if !floor.is_planar(DEFAULT_TOLERANCE) {
        return Err(invalid("floor boundary is not planar"));
    }
    Ok(if normal.z < 0.0 {
        (floor.flipped(), true)
    } else {
        (floor, false)
    })
}

fn check_height(height: f64) -> Result<()> {
    if height > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "floor_to_ceiling_height must be positive, got {height}"
        )))
    }
}

/// Reversing an n-gon's boundary maps new segment k onto old segment
/// (2n - 2 - k) mod n.
fn reversed_segments(n: usize) -> Vec<usize> {
    (0..n).map(|k| (2 * n - 2 - k) % n).collect()
}

fn realign<T: Clone>(items: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| items[i].clone()).collect()
}
