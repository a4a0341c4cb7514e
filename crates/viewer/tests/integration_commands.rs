//! Integration tests for the AgentCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use anatomy_viewer_lib::command::{execute_json, execute_json_batch};
use anatomy_viewer_lib::harness::TestHarness;

#[test]
fn test_command_place_and_confirm() {
    let mut h = TestHarness::with_demo_specimen();

    let resp = execute_json(&mut h, r#"{"command": "double_click", "x": 400, "y": 300}"#).unwrap();
    assert!(resp.success);
    let data = resp.data.unwrap();
    assert_eq!(data["placed"], true);
    assert_eq!(data["id"], 1);
    assert!(data["edit_anchor"].is_array());

    let resp = execute_json(&mut h, r#"{"command": "confirm", "text": "Femur"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["text"], "Femur");
    assert_eq!(h.annotation_count(), 1);
}

#[test]
fn test_command_list() {
    let mut h = TestHarness::with_demo_specimen();
    h.double_click_center();
    h.confirm("Os femoris");

    let resp = execute_json(&mut h, r#"{"command": "list"}"#).unwrap();
    assert!(resp.success);
    let data = resp.data.unwrap();
    assert_eq!(data["count"], 1);
    assert!(data["editing"].is_null());

    let annotations = data["annotations"].as_array().unwrap();
    assert_eq!(annotations[0]["text"], "Os femoris");
    assert_eq!(annotations[0]["leader_end"].as_array().unwrap().len(), 3);
}

#[test]
fn test_command_full_workflow_via_json_batch() {
    let mut h = TestHarness::with_demo_specimen();

    let json = r#"[
        {"command": "double_click", "x": 400, "y": 300},
        {"command": "double_click", "x": 410, "y": 310},
        {"command": "confirm", "text": "Tibia"},
        {"command": "double_click", "x": 400, "y": 300},
        {"command": "cancel"},
        {"command": "list"}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    assert_eq!(responses.len(), 6);
    for resp in &responses {
        assert!(resp.success, "Failed: {:?}", resp.error);
    }

    // The second click lands while the first annotation is being edited
    let second = responses[1].data.as_ref().unwrap();
    assert_eq!(second["placed"], false);
    assert_eq!(second["reason"], "concurrent_edit");

    let list = responses[5].data.as_ref().unwrap();
    assert_eq!(list["count"], 1);
    assert_eq!(list["annotations"][0]["text"], "Tibia");
}

#[test]
fn test_command_empty_confirm_deletes() {
    let mut h = TestHarness::with_demo_specimen();
    h.double_click_center();

    let resp = execute_json(&mut h, r#"{"command": "confirm", "text": ""}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["deleted"], true);
    assert_eq!(h.annotation_count(), 0);
    assert_eq!(h.live_visual_groups(), 0);
}

#[test]
fn test_command_delete_is_idempotent() {
    let mut h = TestHarness::with_demo_specimen();
    h.double_click_center();
    h.confirm("Patella");

    let first = execute_json(&mut h, r#"{"command": "delete", "id": 1}"#).unwrap();
    assert_eq!(first.data.unwrap()["removed"], true);
    let second = execute_json(&mut h, r#"{"command": "delete", "id": 1}"#).unwrap();
    assert!(second.success);
    assert_eq!(second.data.unwrap()["removed"], false);
}

#[test]
fn test_command_miss_and_teardown() {
    let mut h = TestHarness::with_demo_specimen();

    let resp = execute_json(&mut h, r#"{"command": "double_click", "x": 2, "y": 2}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["reason"], "pick_miss");

    h.double_click_center();
    let resp = execute_json(&mut h, r#"{"command": "teardown"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["disposed"], 1);

    // Model released: clicks are no-ops until the next mount
    let resp = execute_json(&mut h, r#"{"command": "double_click", "x": 400, "y": 300}"#).unwrap();
    assert_eq!(resp.data.unwrap()["reason"], "model_not_ready");
}

#[test]
fn test_command_cancel_without_edit_fails() {
    let mut h = TestHarness::with_demo_specimen();
    let resp = execute_json(&mut h, r#"{"command": "cancel"}"#).unwrap();
    assert!(!resp.success);
    assert!(resp.error.is_some());
}

#[test]
fn test_command_invalid_batch() {
    let mut h = TestHarness::new();
    assert!(execute_json_batch(&mut h, r#"{"command": "list"}"#).is_err());
    assert!(execute_json_batch(&mut h, r#"[{"command": "zoom"}]"#).is_err());
}
