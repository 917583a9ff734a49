use super::*;
use crate::test_fixtures::{rig, rig_json};

#[test]
fn fixture_parses_and_validates() {
    let def = rig("loop");
    def.validate().unwrap();
    assert_eq!(def.animation_count(), 2);
    assert_eq!(def.animations[0].loop_mode, "loop");
}

#[test]
fn loop_mode_defaults_to_once() {
    let mut v = rig_json("loop");
    v["animations"][0]
        .as_object_mut()
        .unwrap()
        .remove("loop");
    let def: EntityDef = serde_json::from_value(v).unwrap();
    assert_eq!(def.animations[0].loop_mode, "once");
}

#[test]
fn unsupported_channels_deserialize() {
    let key: KeyframeDef = serde_json::from_value(serde_json::json!({
        "channel": "scale", "time": 0.0, "data_points": [[1.0, 1.0, 1.0]]
    }))
    .unwrap();
    assert_eq!(key.channel, Channel::Unsupported);
    assert_eq!(key.interpolation, Interpolation::Linear);
}

#[test]
fn validate_rejects_unknown_face_texture() {
    let mut v = rig_json("loop");
    v["outliner"][0]["bone"]["children"][0]["part"]["faces"]["north"]["texture"] =
        serde_json::json!("missing");
    let def: EntityDef = serde_json::from_value(v).unwrap();
    let err = def.validate().unwrap_err().to_string();
    assert!(err.contains("part 'torso'"));
    assert!(err.contains("face 'north'"));
}

#[test]
fn validate_rejects_duplicate_explicit_custom_ids() {
    let mut v = rig_json("loop");
    v["outliner"][0]["bone"]["children"][0]["part"]["custom_model_data"] = serde_json::json!(7);
    v["outliner"][0]["bone"]["children"][1]["bone"]["children"][0]["part"]["custom_model_data"] =
        serde_json::json!(7);
    let def: EntityDef = serde_json::from_value(v).unwrap();
    let err = def.validate().unwrap_err().to_string();
    assert!(err.contains("duplicate custom id 7"));
}

#[test]
fn validate_rejects_duplicate_part_and_animation_names() {
    let mut v = rig_json("loop");
    v["outliner"][0]["bone"]["children"][1]["bone"]["children"][0]["part"]["name"] =
        serde_json::json!("torso");
    let def: EntityDef = serde_json::from_value(v).unwrap();
    assert!(def.validate().is_err());

    let mut v = rig_json("loop");
    v["animations"][1]["name"] = serde_json::json!("walk");
    let def: EntityDef = serde_json::from_value(v).unwrap();
    assert!(def.validate().is_err());
}

#[test]
fn validate_rejects_bad_names_and_keyframes() {
    let mut def = rig("loop");
    def.name = "Golem".to_string();
    assert!(def.validate().is_err());

    let mut def = rig("loop");
    def.animations[0].length = -1.0;
    assert!(def.validate().is_err());

    let mut def = rig("loop");
    def.animations[0]
        .animators
        .get_mut("b-arm")
        .unwrap()[0]
        .data_points
        .clear();
    assert!(def.validate().is_err());
}
