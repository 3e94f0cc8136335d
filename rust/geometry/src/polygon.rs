// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar polygons with lengths, areas, normals and centroids.
//!
//! A [`Face3D`] is a closed boundary of 3D points. The closing segment from
//! the last vertex back to the first is implicit, so a face with `n` vertices
//! always has `n` segments. Floor plans index per-edge data (boundary
//! conditions, windows) by these segment indices.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Serialized shape of a single point: `{"x": .., "y": .., "z": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointDict {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Point3<f64>> for PointDict {
    fn from(p: Point3<f64>) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<PointDict> for Point3<f64> {
    fn from(p: PointDict) -> Self {
        Point3::new(p.x, p.y, p.z)
    }
}

/// A planar polygon defined by an ordered boundary of at least 3 points.
///
/// # Example
///
/// ```
/// use floorplan_geometry::{Face3D, Point3};
///
/// let face = Face3D::new(vec![
///     Point3::new(0.0, 0.0, 3.0),
///     Point3::new(10.0, 0.0, 3.0),
///     Point3::new(10.0, 10.0, 3.0),
///     Point3::new(0.0, 10.0, 3.0),
/// ])
/// .unwrap();
///
/// assert_eq!(face.area(), 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<PointDict>", try_from = "Vec<PointDict>")]
pub struct Face3D {
    boundary: Vec<Point3<f64>>,
}

impl Face3D {
    /// Creates a face from its boundary vertices.
    ///
    /// Returns an error if fewer than 3 vertices are given.
    pub fn new(boundary: Vec<Point3<f64>>) -> Result<Self> {
        if boundary.len() < 3 {
            return Err(Error::DegenerateFace(boundary.len()));
        }
        Ok(Self { boundary })
    }

    /// Creates an axis-aligned rectangle at elevation `z`.
    pub fn rectangle(origin: [f64; 2], width: f64, depth: f64, z: f64) -> Self {
        let [x, y] = origin;
        Self {
            boundary: vec![
                Point3::new(x, y, z),
                Point3::new(x + width, y, z),
                Point3::new(x + width, y + depth, z),
                Point3::new(x, y + depth, z),
            ],
        }
    }

    /// Returns the boundary vertices in order.
    pub fn boundary(&self) -> &[Point3<f64>] {
        &self.boundary
    }

    /// Returns the number of boundary vertices (equal to the segment count).
    pub fn vertex_count(&self) -> usize {
        self.boundary.len()
    }

    /// Returns the boundary segments as `(start, end)` pairs, including the
    /// closing segment.
    pub fn segments(&self) -> impl Iterator<Item = (Point3<f64>, Point3<f64>)> + '_ {
        let n = self.boundary.len();
        (0..n).map(move |i| (self.boundary[i], self.boundary[(i + 1) % n]))
    }

    /// Returns the length of every boundary segment.
    pub fn segment_lengths(&self) -> Vec<f64> {
        self.segments().map(|(a, b)| (b - a).norm()).collect()
    }

    /// Returns the total boundary length.
    pub fn perimeter(&self) -> f64 {
        self.segment_lengths().iter().sum()
    }

    /// Computes the polygon normal using Newell's method.
    ///
    /// Returns `None` when the boundary is degenerate (collinear points).
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let mut normal = Vector3::new(0.0, 0.0, 0.0);
        for (curr, next) in self.segments() {
            normal.x += (curr.y - next.y) * (curr.z + next.z);
            normal.y += (curr.z - next.z) * (curr.x + next.x);
            normal.z += (curr.x - next.x) * (curr.y + next.y);
        }

        let len = normal.norm();
        if len < 1e-15 {
            return None;
        }
        Some(normal / len)
    }

    /// Computes the enclosed area using the cross-product triangle fan method.
    pub fn area(&self) -> f64 {
        let p0 = self.boundary[0];
        let mut total = Vector3::new(0.0, 0.0, 0.0);

        for i in 1..self.boundary.len() - 1 {
            let v1 = self.boundary[i] - p0;
            let v2 = self.boundary[i + 1] - p0;
            total += v1.cross(&v2);
        }

        total.norm() / 2.0
    }

    /// Returns the vertex average of the boundary.
    pub fn centroid(&self) -> Point3<f64> {
        let sum = self
            .boundary
            .iter()
            .fold(Vector3::new(0.0, 0.0, 0.0), |acc, p| acc + p.coords);
        Point3::from(sum / self.boundary.len() as f64)
    }

    /// Returns the lowest Z coordinate on the boundary.
    pub fn min_z(&self) -> f64 {
        self.boundary
            .iter()
            .map(|p| p.z)
            .fold(f64::INFINITY, f64::min)
    }

    /// Returns `true` if every vertex lies within `tolerance` of the plane
    /// through the first vertex.
    pub fn is_planar(&self, tolerance: f64) -> bool {
        let Some(n) = self.normal() else {
            return false;
        };
        let origin = self.boundary[0];
        self.boundary
            .iter()
            .all(|p| (p - origin).dot(&n).abs() <= tolerance)
    }

    /// Returns a copy with the vertex order reversed (normal flipped).
    pub fn flipped(&self) -> Face3D {
        let mut boundary = self.boundary.clone();
        boundary.reverse();
        Self { boundary }
    }

    pub(crate) fn from_points_unchecked(boundary: Vec<Point3<f64>>) -> Self {
        Self { boundary }
    }
}

impl From<Face3D> for Vec<PointDict> {
    fn from(face: Face3D) -> Self {
        face.boundary.into_iter().map(PointDict::from).collect()
    }
}

impl TryFrom<Vec<PointDict>> for Face3D {
    type Error = Error;

    fn try_from(points: Vec<PointDict>) -> Result<Self> {
        Face3D::new(points.into_iter().map(Point3::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Face3D {
        Face3D::rectangle([0.0, 0.0], 10.0, 10.0, 3.0)
    }

    #[test]
    fn rejects_degenerate_boundary() {
        let err = Face3D::new(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]).unwrap_err();
        assert_eq!(err, Error::DegenerateFace(2));
    }

    #[test]
    fn square_area_and_perimeter() {
        let face = square();
        assert_relative_eq!(face.area(), 100.0);
        assert_relative_eq!(face.perimeter(), 40.0);
        assert_eq!(face.segment_lengths().len(), 4);
    }

    #[test]
    fn concave_area() {
        // L-shape: 10x10 minus a 5x5 corner
        let face = Face3D::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 5.0, 0.0),
            Point3::new(5.0, 5.0, 0.0),
            Point3::new(5.0, 10.0, 0.0),
            Point3::new(0.0, 10.0, 0.0),
        ])
        .unwrap();
        assert_relative_eq!(face.area(), 75.0, epsilon = 1e-10);
    }

    #[test]
    fn trapezoid_area() {
        let face = Face3D::new(vec![
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(10.5, 0.0, 3.0),
            Point3::new(10.5, 10.5, 3.0),
            Point3::new(0.0, 10.0, 3.0),
        ])
        .unwrap();
        assert_relative_eq!(face.area(), 107.625, epsilon = 1e-10);
    }

    #[test]
    fn counter_clockwise_normal_points_up() {
        let n = square().normal().unwrap();
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn flipped_reverses_normal() {
        let n = square().flipped().normal().unwrap();
        assert_relative_eq!(n.z, -1.0, epsilon = 1e-12);
        assert_relative_eq!(square().flipped().area(), 100.0);
    }

    #[test]
    fn collinear_boundary_has_no_normal() {
        let face = Face3D::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ])
        .unwrap();
        assert!(face.normal().is_none());
        assert!(!face.is_planar(1e-6));
    }

    #[test]
    fn centroid_and_min_z() {
        let face = square();
        let c = face.centroid();
        assert_relative_eq!(c.x, 5.0);
        assert_relative_eq!(c.y, 5.0);
        assert_relative_eq!(face.min_z(), 3.0);
        assert!(face.is_planar(1e-9));
    }

    #[test]
    fn serializes_as_point_dicts() {
        let face = square();
        let value = serde_json::to_value(&face).unwrap();
        assert_eq!(value[1]["x"], 10.0);
        assert_eq!(value[1]["z"], 3.0);

        let restored: Face3D = serde_json::from_value(value).unwrap();
        assert_eq!(restored, face);
    }

    #[test]
    fn deserialize_rejects_short_boundary() {
        let value = serde_json::json!([{"x": 0.0, "y": 0.0, "z": 0.0}]);
        assert!(serde_json::from_value::<Face3D>(value).is_err());
    }
}
