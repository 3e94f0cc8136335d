// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Window and skylight parameters.
//!
//! Parameters describe openings without carrying their geometry. Ratio-based
//! parameters resolve to an area proportional to the hosting surface;
//! explicit parameters carry literal dimensions that are clamped to the host.

use floorplan_geometry::Face3D;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn default_sill_height() -> f64 {
    1.0
}

/// Windows assigned to one wall segment of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WindowParameter {
    /// A single window covering a fraction of the wall area.
    SimpleWindowRatio { window_ratio: f64 },

    /// Repeating windows of fixed height and spacing covering a fraction of
    /// the wall area.
    RepeatingWindowRatio {
        window_ratio: f64,
        window_height: f64,
        sill_height: f64,
        horizontal_separation: f64,
        #[serde(default)]
        vertical_separation: f64,
    },

    /// One window with explicit dimensions, centered on the wall.
    SingleWindow {
        width: f64,
        height: f64,
        #[serde(default = "default_sill_height")]
        sill_height: f64,
    },
}

impl WindowParameter {
    /// Creates a [`WindowParameter::SimpleWindowRatio`].
    pub fn simple_ratio(window_ratio: f64) -> Self {
        WindowParameter::SimpleWindowRatio { window_ratio }
    }

    /// Creates a [`WindowParameter::SingleWindow`].
    pub fn single(width: f64, height: f64, sill_height: f64) -> Self {
        WindowParameter::SingleWindow {
            width,
            height,
            sill_height,
        }
    }

    /// Creates a [`WindowParameter::RepeatingWindowRatio`] with no vertical separation.
    pub fn repeating_ratio(
        window_ratio: f64,
        window_height: f64,
        sill_height: f64,
        horizontal_separation: f64,
    ) -> Self {
        WindowParameter::RepeatingWindowRatio {
            window_ratio,
            window_height,
            sill_height,
            horizontal_separation,
            vertical_separation: 0.0,
        }
    }

    /// Checks ratios and dimensions.
    pub fn validate(&self) -> Result<()> {
        match *self {
            WindowParameter::SimpleWindowRatio { window_ratio } => check_ratio(window_ratio),
            WindowParameter::RepeatingWindowRatio {
                window_ratio,
                window_height,
                sill_height,
                horizontal_separation,
                vertical_separation,
            } => {
                check_ratio(window_ratio)?;
                check_positive("window_height", window_height)?;
                check_non_negative("sill_height", sill_height)?;
                check_non_negative("horizontal_separation", horizontal_separation)?;
                check_non_negative("vertical_separation", vertical_separation)
            }
            WindowParameter::SingleWindow {
                width,
                height,
                sill_height,
            } => {
                check_positive("width", width)?;
                check_positive("height", height)?;
                check_non_negative("sill_height", sill_height)
            }
        }
    }

    /// Area of the windows these parameters produce on a wall of the given
    /// segment length and floor-to-ceiling height.
    pub fn area(&self, segment_length: f64, floor_to_ceiling_height: f64) -> f64 {
        match *self {
            WindowParameter::SimpleWindowRatio { window_ratio }
            | WindowParameter::RepeatingWindowRatio { window_ratio, .. } => {
                window_ratio * segment_length * floor_to_ceiling_height
            }
            WindowParameter::SingleWindow {
                width,
                height,
                sill_height,
            } => {
                let max_height = (floor_to_ceiling_height - sill_height).max(0.0);
                width.min(segment_length) * height.min(max_height)
            }
        }
    }

    /// Returns a copy scaled by `factor`. Ratios are unchanged.
    pub fn scale(&self, factor: f64) -> Self {
        match *self {
            WindowParameter::SimpleWindowRatio { window_ratio } => {
                WindowParameter::SimpleWindowRatio { window_ratio }
            }
            WindowParameter::RepeatingWindowRatio {
                window_ratio,
                window_height,
                sill_height,
                horizontal_separation,
                vertical_separation,
            } => WindowParameter::RepeatingWindowRatio {
                window_ratio,
                window_height: window_height * factor,
                sill_height: sill_height * factor,
                horizontal_separation: horizontal_separation * factor,
                vertical_separation: vertical_separation * factor,
            },
            WindowParameter::SingleWindow {
                width,
                height,
                sill_height,
            } => WindowParameter::SingleWindow {
                width: width * factor,
                height: height * factor,
                sill_height: sill_height * factor,
            },
        }
    }
}

/// Skylights on the roof above a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SkylightParameter {
    /// A grid of skylights covering a fraction of the roof.
    GriddedSkylightRatio {
        skylight_ratio: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        spacing: Option<f64>,
    },

    /// A grid of skylights with a fixed total area.
    GriddedSkylightArea {
        skylight_area: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        spacing: Option<f64>,
    },
}

impl SkylightParameter {
    /// Creates a [`SkylightParameter::GriddedSkylightRatio`] with automatic spacing.
    pub fn gridded_ratio(skylight_ratio: f64) -> Self {
        SkylightParameter::GriddedSkylightRatio {
            skylight_ratio,
            spacing: None,
        }
    }

    /// Creates a [`SkylightParameter::GriddedSkylightArea`] with automatic spacing.
    pub fn gridded_area(skylight_area: f64) -> Self {
        SkylightParameter::GriddedSkylightArea {
            skylight_area,
            spacing: None,
        }
    }

    /// Checks the ratio or area and spacing.
    pub fn validate(&self) -> Result<()> {
        let spacing = match *self {
            SkylightParameter::GriddedSkylightRatio {
                skylight_ratio,
                spacing,
            } => {
                check_ratio(skylight_ratio)?;
                spacing
            }
            SkylightParameter::GriddedSkylightArea {
                skylight_area,
                spacing,
            } => {
                check_non_negative("skylight_area", skylight_area)?;
                spacing
            }
        };
        match spacing {
            Some(s) => check_positive("spacing", s),
            None => Ok(()),
        }
    }

    /// Area of the skylights these parameters produce on a roof of `floor_area`.
    pub fn area(&self, floor_area: f64) -> f64 {
        match *self {
            SkylightParameter::GriddedSkylightRatio { skylight_ratio, .. } => {
                skylight_ratio * floor_area
            }
            SkylightParameter::GriddedSkylightArea { skylight_area, .. } => {
                skylight_area.min(floor_area)
            }
        }
    }

    /// Returns a copy scaled by `factor`. Areas scale by `factor²`.
    pub fn scale(&self, factor: f64) -> Self {
        match *self {
            SkylightParameter::GriddedSkylightRatio {
                skylight_ratio,
                spacing,
            } => SkylightParameter::GriddedSkylightRatio {
                skylight_ratio,
                spacing: spacing.map(|s| s * factor),
            },
            SkylightParameter::GriddedSkylightArea {
                skylight_area,
                spacing,
            } => SkylightParameter::GriddedSkylightArea {
                skylight_area: skylight_area * factor * factor,
                spacing: spacing.map(|s| s * factor),
            },
        }
    }
}

/// Resolves per-edge window parameters against a floor boundary.
///
/// Returns one area per floor segment; segments without windows yield `0.0`.
/// `windows` must be aligned with the floor segments.
pub fn edge_sub_face_areas(
    floor: &Face3D,
    windows: &[Option<WindowParameter>],
    floor_to_ceiling_height: f64,
) -> Vec<f64> {
    floor
        .segment_lengths()
        .into_iter()
        .zip(windows)
        .map(|(length, window)| {
            window
                .as_ref()
                .map_or(0.0, |w| w.area(length, floor_to_ceiling_height))
        })
        .collect()
}

fn check_ratio(ratio: f64) -> Result<()> {
    if (0.0..1.0).contains(&ratio) {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "ratio must be in [0, 1), got {ratio}"
        )))
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "{name} must not be negative, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn ratio_window_area_scales_with_wall() {
        let w = WindowParameter::simple_ratio(0.4);
        assert_relative_eq!(w.area(10.0, 3.0), 12.0, epsilon = 1e-12);
        assert_relative_eq!(w.area(10.5, 3.0), 12.6, epsilon = 1e-12);
    }

    #[test]
    fn single_window_is_clamped_to_wall() {
        let w = WindowParameter::single(2.0, 1.5, 0.8);
        assert_relative_eq!(w.area(10.0, 3.0), 3.0);
        // Narrow wall clamps the width.
        assert_relative_eq!(w.area(1.0, 3.0), 1.5);
        // Low ceiling clamps the height.
        assert_relative_eq!(w.area(10.0, 1.8), 2.0, epsilon = 1e-12);
        // Sill above the ceiling leaves nothing.
        assert_relative_eq!(w.area(10.0, 0.5), 0.0);
    }

    #[test]
    fn scaling_keeps_ratios() {
        let w = WindowParameter::simple_ratio(0.4);
        assert_eq!(w.scale(2.0), w);

        let s = WindowParameter::single(2.0, 1.5, 0.8).scale(2.0);
        assert_eq!(s, WindowParameter::single(4.0, 3.0, 1.6));
        assert_relative_eq!(s.area(20.0, 6.0), 12.0);
    }

    #[test]
    fn window_validation() {
        assert!(WindowParameter::simple_ratio(0.4).validate().is_ok());
        assert!(WindowParameter::simple_ratio(1.0).validate().is_err());
        assert!(WindowParameter::single(0.0, 1.0, 1.0).validate().is_err());
        assert!(WindowParameter::repeating_ratio(0.4, 2.0, 0.8, 3.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn window_dict_shape() {
        let value = serde_json::to_value(WindowParameter::simple_ratio(0.4)).unwrap();
        assert_eq!(value, json!({"type": "SimpleWindowRatio", "window_ratio": 0.4}));

        let single: WindowParameter =
            serde_json::from_value(json!({"type": "SingleWindow", "width": 2.0, "height": 1.5}))
                .unwrap();
        assert_eq!(single, WindowParameter::single(2.0, 1.5, 1.0));
    }

    #[test]
    fn skylight_area_and_scale() {
        let ratio = SkylightParameter::gridded_ratio(0.05);
        assert_relative_eq!(ratio.area(100.0), 5.0, epsilon = 1e-12);
        assert_eq!(ratio.scale(3.0), ratio);

        let area = SkylightParameter::gridded_area(4.0);
        assert_relative_eq!(area.area(100.0), 4.0);
        assert_relative_eq!(area.area(2.0), 2.0);
        assert_eq!(area.scale(2.0), SkylightParameter::gridded_area(16.0));
    }

    #[test]
    fn skylight_validation_and_dict() {
        assert!(SkylightParameter::gridded_ratio(0.05).validate().is_ok());
        assert!(SkylightParameter::gridded_area(-1.0).validate().is_err());
        let with_spacing = SkylightParameter::GriddedSkylightRatio {
            skylight_ratio: 0.05,
            spacing: Some(0.0),
        };
        assert!(with_spacing.validate().is_err());

        let value = serde_json::to_value(SkylightParameter::gridded_ratio(0.05)).unwrap();
        assert_eq!(value, json!({"type": "GriddedSkylightRatio", "skylight_ratio": 0.05}));
    }

    #[test]
    fn edge_areas_follow_segments() {
        let floor = Face3D::rectangle([0.0, 0.0], 10.0, 5.0, 0.0);
        let w = Some(WindowParameter::simple_ratio(0.5));
        let areas = edge_sub_face_areas(&floor, &[w.clone(), None, w, None], 2.0);
        assert_eq!(areas.len(), 4);
        assert_relative_eq!(areas[0], 10.0);
        assert_relative_eq!(areas[1], 0.0);
        assert_relative_eq!(areas[2], 10.0);
    }
}
