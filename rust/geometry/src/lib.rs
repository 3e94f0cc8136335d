// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor-plan geometry
//!
//! Planar polygons built on nalgebra points: areas, perimeters, normals,
//! affine transforms and tolerance-based snapping.

pub mod error;
pub mod polygon;
pub mod snap;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

pub use error::{Error, Result};
pub use polygon::{Face3D, PointDict};
pub use snap::{SnapResult, DEFAULT_TOLERANCE};
