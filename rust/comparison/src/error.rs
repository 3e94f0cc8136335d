// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for floor-plan models and comparison records.

/// Result type alias for model and comparison operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, editing or (de)serializing models.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Invalid floor polygon or transform.
    #[error("geometry error: {0}")]
    Geometry(#[from] floorplan_geometry::Error),

    /// A dictionary carries no `"type"` discriminator.
    #[error("dictionary has no \"type\" key (expected {expected})")]
    MissingType { expected: &'static str },

    /// A dictionary's `"type"` discriminator names another record.
    #[error("expected dictionary of type {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// A serialized model has no comparison block under `properties`.
    #[error("dictionary possesses no ModelComparisonRecord")]
    MissingComparisonBlock,

    /// A per-edge list does not match the number of floor segments.
    #[error("{field} has {found} entries but the floor has {expected} segments")]
    EdgeCountMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    /// Windows were assigned to an edge whose boundary condition is not outdoors.
    #[error("room {room}: edge {edge} has windows but is not an outdoor wall")]
    WindowOnNonOutdoorWall { room: String, edge: usize },

    /// A window, skylight or room dimension is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The floor polygon cannot host a room (e.g. it is vertical).
    #[error("invalid floor geometry for room {room}: {reason}")]
    InvalidFloor { room: String, reason: String },

    /// No room in the model has the given identifier.
    #[error("no room with identifier {0}")]
    RoomNotFound(String),

    /// Two rooms in one model share an identifier.
    #[error("duplicate room identifier: {0}")]
    DuplicateIdentifier(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
