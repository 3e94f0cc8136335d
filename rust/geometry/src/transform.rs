// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Affine transformations on faces.
//!
//! Every transform returns a new [`Face3D`]; the receiver is left untouched so
//! callers can keep a stored copy of the original boundary.

use nalgebra::{Point3, Rotation3, Unit, Vector3};

use crate::error::{Error, Result};
use crate::polygon::Face3D;

impl Face3D {
    /// Translates every vertex by `vector`.
    pub fn moved(&self, vector: &Vector3<f64>) -> Face3D {
        self.map_points(|p| p + vector)
    }

    /// Rotates every vertex around `axis` through `origin`. `angle` is in radians.
    ///
    /// Returns an error for a zero-length axis.
    pub fn rotated(&self, axis: &Vector3<f64>, angle: f64, origin: &Point3<f64>) -> Result<Face3D> {
        let unit_axis = Unit::try_new(*axis, 1e-15)
            .ok_or_else(|| Error::InvalidTransform("rotation axis has zero length".into()))?;
        Ok(self.rotated_about(&unit_axis, angle, origin))
    }

    /// Rotates every vertex counterclockwise in the XY plane around `origin`.
    pub fn rotated_xy(&self, angle: f64, origin: &Point3<f64>) -> Face3D {
        self.rotated_about(&Vector3::z_axis(), angle, origin)
    }

    fn rotated_about(&self, axis: &Unit<Vector3<f64>>, angle: f64, origin: &Point3<f64>) -> Face3D {
        let rotation = Rotation3::from_axis_angle(axis, angle);
        self.map_points(|p| origin + rotation * (p - origin))
    }

    /// Scales every vertex uniformly relative to `origin`.
    pub fn scaled(&self, factor: f64, origin: &Point3<f64>) -> Face3D {
        self.map_points(|p| origin + (p - origin) * factor)
    }

    /// Mirrors every vertex across the plane through `origin` with `normal`.
    ///
    /// The vertex order is reversed so the face keeps its winding relative to
    /// the mirrored normal.
    pub fn reflected(&self, normal: &Vector3<f64>, origin: &Point3<f64>) -> Result<Face3D> {
        let n = Unit::try_new(*normal, 1e-15)
            .ok_or_else(|| Error::InvalidTransform("reflection normal has zero length".into()))?;
        let mut points: Vec<Point3<f64>> = self
            .boundary()
            .iter()
            .map(|p| {
                let d = (p - origin).dot(&n);
                p - n.into_inner() * (2.0 * d)
            })
            .collect();
        points.reverse();
        Ok(Face3D::from_points_unchecked(points))
    }

    fn map_points(&self, f: impl Fn(&Point3<f64>) -> Point3<f64>) -> Face3D {
        Face3D::from_points_unchecked(self.boundary().iter().map(f).collect())
    }
}
