// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Helpers for `"type"`-tagged JSON dictionaries.
//!
//! Every serialized object carries a `"type"` key naming its record so that a
//! generic reader can route payloads. These helpers check that tag and move
//! between typed dict structs and [`serde_json::Value`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Checks that `data["type"] == expected`.
pub fn check_type(data: &Value, expected: &'static str) -> Result<()> {
    match data.get("type").and_then(Value::as_str) {
        None => Err(Error::MissingType { expected }),
        Some(found) if found != expected => Err(Error::TypeMismatch {
            expected,
            found: found.to_string(),
        }),
        Some(_) => Ok(()),
    }
}

/// Validates the tag, then deserializes `data` into `T`.
pub(crate) fn from_tagged<T: DeserializeOwned>(data: &Value, expected: &'static str) -> Result<T> {
    check_type(data, expected)?;
    Ok(T::deserialize(data)?)
}

/// Serializes a dict struct into a [`Value`].
pub(crate) fn to_value<T: Serialize>(dict: &T) -> Result<Value> {
    Ok(serde_json::to_value(dict)?)
}

/// Returns `data[key]` unless it is missing or `null`.
pub(crate) fn non_null<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    data.get(key).filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_matching_type() {
        assert!(check_type(&json!({"type": "Room2D"}), "Room2D").is_ok());
    }

    #[test]
    fn missing_type() {
        assert_eq!(
            check_type(&json!({"identifier": "a"}), "Room2D"),
            Err(Error::MissingType { expected: "Room2D" })
        );
        // A non-string tag is treated as missing.
        assert!(matches!(
            check_type(&json!({"type": 3}), "Room2D"),
            Err(Error::MissingType { .. })
        ));
    }

    #[test]
    fn mismatched_type() {
        assert_eq!(
            check_type(&json!({"type": "Story"}), "Room2D"),
            Err(Error::TypeMismatch {
                expected: "Room2D",
                found: "Story".to_string()
            })
        );
    }

    #[test]
    fn non_null_skips_null_and_missing() {
        let data = json!({"a": null, "b": 1});
        assert!(non_null(&data, "a").is_none());
        assert!(non_null(&data, "c").is_none());
        assert_eq!(non_null(&data, "b"), Some(&json!(1)));
    }
}
