// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end comparison of a snapped shoebox room through model
//! serialization.

use approx::assert_relative_eq;
use floorplan_comparison::{
    Building, Face3D, GridParameter, Model, ModifierSet, Point2, Room2D, SkylightParameter,
    Story, WindowParameter,
};

const FLOOR_DIFF: f64 = 7.625;
const WALL_DIFF: f64 = 1.8142776;
const ROOF_DIFF: f64 = 0.38125;
const TOTAL_DIFF: f64 = 2.1955276;

fn shoebox_room(identifier: &str) -> Room2D {
    let floor = Face3D::rectangle([0.0, 0.0], 10.0, 10.0, 3.0);
    let mut room = Room2D::new(identifier, floor, 3.0).unwrap();
    room.set_outdoor_window_parameters(WindowParameter::simple_ratio(0.4))
        .unwrap();
    room.set_skylight_parameters(Some(SkylightParameter::gridded_ratio(0.05)))
        .unwrap();
    room.set_top_exposed(true);
    room
}

fn shoebox_model() -> Model {
    let story = Story::new("Level_1", vec![shoebox_room("SquareShoebox")]);
    Model::new("ShoeBox", vec![Building::new("Building_1", vec![story])]).unwrap()
}

fn snap_points() -> [Point2<f64>; 2] {
    [Point2::new(10.5, 0.0), Point2::new(10.5, 10.5)]
}

fn assert_snapped_differences(room: &Room2D) {
    let cmp = room.comparison();
    assert_relative_eq!(cmp.floor_area_difference(), FLOOR_DIFF, epsilon = 1e-3);
    assert_relative_eq!(cmp.wall_sub_face_area_difference(), WALL_DIFF, epsilon = 1e-3);
    assert_relative_eq!(cmp.roof_sub_face_area_difference(), ROOF_DIFF, epsilon = 1e-3);
    assert_relative_eq!(cmp.sub_face_area_difference(), TOTAL_DIFF, epsilon = 1e-3);
}

#[test]
fn snapped_room_survives_model_round_trip() {
    let mut model = shoebox_model();
    model.reset_comparison();
    model.snap_to_points(&snap_points(), 1.0).unwrap();
    assert_snapped_differences(model.room_2ds().next().unwrap());

    let dict = model.to_dict().unwrap();
    let restored = Model::from_dict(&dict).unwrap();

    assert_eq!(restored, model);
    assert_eq!(restored.to_dict().unwrap(), dict);
    assert_snapped_differences(restored.room_by_identifier("SquareShoebox").unwrap());
}

#[test]
fn comparison_properties_apply_across_models() {
    // The baseline is captured on one model and carried onto an edited copy.
    let mut baseline = shoebox_model();
    baseline.reset_comparison();
    let baseline_dict = baseline.to_dict().unwrap();

    let mut edited = shoebox_model();
    edited.snap_to_points(&snap_points(), 1.0).unwrap();
    assert!(!edited.room_2ds().next().unwrap().comparison().has_baseline());

    let applied = edited
        .apply_comparison_properties_from_dict(&baseline_dict)
        .unwrap();

    assert_eq!(applied, 1);
    let room = edited.room_2ds().next().unwrap();
    assert_eq!(room.properties().comparison().host(), "SquareShoebox");
    assert_snapped_differences(room);
}

#[test]
fn reset_after_edit_clears_differences() {
    let mut model = shoebox_model();
    model.reset_comparison();
    model.snap_to_points(&snap_points(), 1.0).unwrap();
    model.reset_comparison();

    let cmp = model.room_2ds().next().unwrap().comparison();
    assert_eq!(cmp.floor_area_difference(), 0.0);
    assert_eq!(cmp.sub_face_area_difference(), 0.0);
    assert_eq!(cmp.sub_face_area_percent_change(), Some(0.0));
    assert_relative_eq!(cmp.floor_area(), 107.625, epsilon = 1e-9);
}

#[test]
fn duplicate_is_independent() {
    let mut original = shoebox_room("SquareShoebox");
    original.reset_comparison();
    let mut copy = original.duplicate();

    copy.properties_mut()
        .comparison_mut()
        .set_modifier_set(Some(ModifierSet::new("Tinted_Window_Set")));
    copy.snap_to_points(&snap_points(), 1.0).unwrap();

    assert_eq!(
        original.properties().comparison().modifier_set().identifier,
        "Generic_Interior_Visible_Modifier_Set"
    );
    assert_eq!(original.comparison().floor_area_difference(), 0.0);
    assert_snapped_differences(&copy);
}

#[test]
fn room_round_trip_keeps_extension_references() {
    let mut room = shoebox_room("SquareShoebox");
    room.reset_comparison();
    let record = room.properties_mut().comparison_mut();
    record.set_modifier_set(Some(ModifierSet::new("Tinted_Window_Set")));
    record.set_grid_parameters(Some(vec![GridParameter::room(0.5)]));

    let dict = room.to_dict().unwrap();
    let comparison = &dict["properties"]["comparison"];
    assert_eq!(comparison["modifier_set"]["type"], "ModifierSet");
    assert_eq!(comparison["grid_parameters"][0]["type"], "RoomGridParameter");

    let restored = Room2D::from_dict(&dict).unwrap();
    assert_eq!(restored, room);
    assert_eq!(
        restored.properties().comparison().grid_parameters(),
        Some(&[GridParameter::room(0.5)][..])
    );
}

#[test]
fn scaled_model_leaves_baseline_untouched() {
    let mut model = shoebox_model();
    model.reset_comparison();
    let before = model.room_2ds().next().unwrap().properties().clone();

    for room in model.room_2ds_mut() {
        room.scale(2.0, None);
    }

    let room = model.room_2ds().next().unwrap();
    assert_eq!(room.properties(), &before);
    assert_relative_eq!(room.floor_area(), 400.0, epsilon = 1e-9);
    assert_relative_eq!(room.comparison().floor_area(), 100.0, epsilon = 1e-9);
    assert_relative_eq!(
        room.comparison().floor_area_percent_change().unwrap(),
        300.0,
        epsilon = 1e-9
    );
}
