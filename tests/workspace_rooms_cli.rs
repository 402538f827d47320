mod support;

use serde_json::Value;
use support::{SnapshotFile, assert_next_actions_shape, run_tally};

#[test]
fn demo_rooms_index_pairs_policies_with_their_rooms() {
    let value = run_tally(&["workspaces", "rooms", "--demo"]);

    assert_eq!(value["ok"], Value::from(true));
    assert_eq!(value["command"], Value::from("tally workspaces rooms"));
    let rooms = value["result"]["rooms"]
        .as_array()
        .expect("rooms should be an array");

    let design = rooms
        .iter()
        .find(|entry| entry["policy_id"] == Value::from("P-design"))
        .expect("design entry should exist");
    assert_eq!(design["admin_room_id"], Value::from("R-100"));
    assert_eq!(design["announce_room_id"], Value::from("R-101"));

    let finance = rooms
        .iter()
        .find(|entry| entry["policy_id"] == Value::from("P-finance"))
        .expect("finance entry should exist");
    assert_eq!(finance["admin_room_id"], Value::Null);
    assert_eq!(finance["announce_room_id"], Value::from("R-200"));

    let metro = rooms
        .iter()
        .find(|entry| entry["policy_id"] == Value::from("P-metro"))
        .expect("metro entry should exist");
    assert_eq!(metro["admin_room_id"], Value::from("R-300"));
    assert_next_actions_shape(&value);
}

#[test]
fn threads_and_unscoped_reports_are_left_out_of_the_index() {
    let snapshot = SnapshotFile::write(
        "rooms.json",
        r#"{
            "policies": [
                {
                    "id": "P-main",
                    "name": "Main",
                    "owner_account_id": 7,
                    "role": "admin",
                    "policy_type": "team"
                }
            ],
            "reports": [
                {"report_id": "R-1", "policy_id": "P-main", "chat_kind": "policy_admins"},
                {"report_id": "R-2", "policy_id": "P-main", "chat_kind": "policy_announce", "parent_report_id": "R-1"},
                {"report_id": "R-3", "chat_kind": "policy_announce"},
                {"report_id": "R-4", "policy_id": "P-main"}
            ],
            "session": {"account_id": 7, "email": "me@tally.test"}
        }"#,
    );

    let value = run_tally(&["workspaces", "rooms", "--snapshot", &snapshot.path_str()]);

    let rooms = value["result"]["rooms"]
        .as_array()
        .expect("rooms should be an array");
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["policy_id"], Value::from("P-main"));
    assert_eq!(rooms[0]["admin_room_id"], Value::from("R-1"));
    assert_eq!(rooms[0]["announce_room_id"], Value::Null);
}

#[test]
fn duplicate_room_claims_resolve_to_the_highest_report_id() {
    let snapshot = SnapshotFile::write(
        "duplicate-rooms.json",
        r#"{
            "policies": [
                {
                    "id": "P-main",
                    "name": "Main",
                    "owner_account_id": 7,
                    "role": "admin",
                    "policy_type": "team"
                }
            ],
            "reports": [
                {"report_id": "R-9", "policy_id": "P-main", "chat_kind": "policy_admins"},
                {"report_id": "R-1", "policy_id": "P-main", "chat_kind": "policy_admins"}
            ],
            "session": {"account_id": 7, "email": "me@tally.test"}
        }"#,
    );

    let value = run_tally(&["workspaces", "rooms", "--snapshot", &snapshot.path_str()]);

    let rooms = value["result"]["rooms"]
        .as_array()
        .expect("rooms should be an array");
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["admin_room_id"], Value::from("R-9"));
}
