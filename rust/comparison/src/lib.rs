// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floor-Plan Comparison
//!
//! Tracks how rooms of a floor-plan model change against a saved baseline.
//!
//! Every [`Room2D`] carries a [`RoomComparisonRecord`] in its typed
//! properties. Resetting the record snapshots the room's floor boundary,
//! per-wall windows and skylights. [`Room2D::comparison`] then reports the
//! baseline areas and how far the current room has moved away from them:
//! floor area, wall window area and skylight area, each as an absolute
//! difference and as a percent change.
//!
//! ## Serialization
//!
//! Rooms, stories, buildings and models serialize to `"type"`-tagged
//! [`serde_json::Value`] dictionaries. Comparison records live under each
//! host's `"properties"` key and travel with it through a round trip.
//! [`Model::apply_comparison_properties_from_dict`] copies the room records of
//! one serialized model onto another model's rooms by position.
//!
//! ```
//! use floorplan_comparison::{Face3D, Room2D, WindowParameter};
//!
//! let floor = Face3D::rectangle([0.0, 0.0], 10.0, 10.0, 0.0);
//! let mut room = Room2D::new("Office", floor, 3.0).unwrap();
//! room.set_outdoor_window_parameters(WindowParameter::simple_ratio(0.4)).unwrap();
//! room.reset_comparison();
//!
//! room.scale(1.1, None);
//! assert!(room.comparison().floor_area_difference() > 20.0);
//! ```

pub mod boundary;
pub mod building;
pub mod dictionary;
pub mod error;
pub mod model;
pub mod parameters;
pub mod properties;
pub mod room2d;

pub use boundary::BoundaryCondition;
pub use building::{Building, Story};
pub use error::{Error, Result};
pub use model::Model;
pub use parameters::{SkylightParameter, WindowParameter};
pub use properties::{
    percent_change, GridParameter, ModelComparisonRecord, ModelProperties, ModifierSet,
    Room2DProperties, RoomComparison, RoomComparisonRecord,
};
pub use room2d::Room2D;

// Geometry types used throughout the public API
pub use floorplan_geometry::{Face3D, Point2, Point3, Vector3, DEFAULT_TOLERANCE};
