// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tolerance-based vertex snapping in plan (XY).
//!
//! Snapping can collapse neighbouring vertices onto the same point. Those
//! duplicates are removed, and the indices of the surviving original vertices
//! are reported so that per-segment data can be realigned by the caller.

use nalgebra::{Point2, Point3};

use crate::error::{Error, Result};
use crate::polygon::Face3D;

/// Default distance below which two vertices are treated as the same point.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Result of snapping a face to a set of plan points.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// The snapped face.
    pub face: Face3D,
    /// For each vertex of `face`, the index of the original vertex (and so the
    /// original outgoing segment) it came from.
    pub kept_vertices: Vec<usize>,
}

impl Face3D {
    /// Moves each vertex onto the nearest of `points` when it lies within
    /// `distance` in plan. Z coordinates are kept.
    ///
    /// Consecutive vertices that end up within `tolerance` of each other are
    /// merged. Returns an error if fewer than 3 vertices survive.
    pub fn snapped_to_points(
        &self,
        points: &[Point2<f64>],
        distance: f64,
        tolerance: f64,
    ) -> Result<SnapResult> {
        let dist_sq = distance * distance;

        let moved: Vec<Point3<f64>> = self
            .boundary()
            .iter()
            .map(|p| match nearest_within(points, p, dist_sq) {
                Some(target) => Point3::new(target.x, target.y, p.z),
                None => *p,
            })
            .collect();

        let tol_sq = tolerance * tolerance;
        let mut kept_vertices: Vec<usize> = Vec::with_capacity(moved.len());
        for (i, p) in moved.iter().enumerate() {
            if let Some(last) = kept_vertices.last_mut() {
                // Keep the later vertex: its outgoing segment is the one that survives.
                if (moved[*last] - p).norm_squared() <= tol_sq {
                    *last = i;
                    continue;
                }
            }
            kept_vertices.push(i);
        }

        // The closing segment can also collapse.
        while kept_vertices.len() > 1 {
            let first = moved[kept_vertices[0]];
            let last = moved[kept_vertices[kept_vertices.len() - 1]];
            if (first - last).norm_squared() <= tol_sq {
                kept_vertices.pop();
            } else {
                break;
            }
        }

        if kept_vertices.len() < 3 {
            return Err(Error::DegenerateFace(kept_vertices.len()));
        }

        let face = Face3D::new(kept_vertices.iter().map(|&i| moved[i]).collect())?;
        Ok(SnapResult {
            face,
            kept_vertices,
        })
    }
}

fn nearest_within<'a>(
    points: &'a [Point2<f64>],
    p: &Point3<f64>,
    dist_sq: f64,
) -> Option<&'a Point2<f64>> {
    points
        .iter()
        .map(|s| (s, (s.x - p.x).powi(2) + (s.y - p.y).powi(2)))
        .filter(|(_, d)| *d <= dist_sq)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(s, _)| s)
}
