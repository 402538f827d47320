use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use super::{StoreSnapshot, demo_snapshot, load_from_path, store_from_snapshot};
use crate::domain::{AccountId, PolicyId, PolicyRole, PolicyType, Session};

fn unique_temp_path(label: &str) -> PathBuf {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("tally-snapshot-{label}-{pid}-{timestamp}.json"))
}

fn policy(id: &str, name: &str) -> crate::domain::Policy {
    crate::domain::Policy::new(
        id,
        name,
        AccountId(1),
        Some(PolicyRole::Admin),
        PolicyType::Team,
    )
}

#[test]
fn missing_snapshot_reports_a_read_error() {
    let path = unique_temp_path("missing");
    let error = load_from_path(&path).expect_err("missing snapshot should fail");
    assert!(error.contains("snapshot read failed"));
}

#[test]
fn malformed_snapshot_reports_a_parse_error() {
    let path = unique_temp_path("malformed");
    fs::write(&path, "{ not json").expect("fixture should write");

    let error = load_from_path(&path).expect_err("malformed snapshot should fail");
    assert!(error.contains("snapshot parse failed"));

    let _ = fs::remove_file(path);
}

#[test]
fn snapshot_round_trips_through_a_file_into_the_store() {
    let path = unique_temp_path("roundtrip");
    let snapshot = StoreSnapshot {
        policies: vec![policy("P1", "Acme"), policy("P2", "Bolt")],
        session: Some(Session::new(AccountId(1), "me@acme.test")),
        offline: true,
        ..StoreSnapshot::default()
    };
    let encoded = serde_json::to_string_pretty(&snapshot).expect("snapshot should encode");
    fs::write(&path, encoded).expect("fixture should write");

    let loaded = load_from_path(&path).expect("snapshot should load");
    assert_eq!(loaded, snapshot);

    let store = store_from_snapshot(loaded);
    assert_eq!(store.policies().len(), 2);
    assert!(store.is_offline());
    let session = store.session().expect("session should load");
    assert_eq!(session.email, "me@acme.test");

    let _ = fs::remove_file(path);
}

#[test]
fn an_omitted_field_defaults_cleanly() {
    let path = unique_temp_path("sparse");
    fs::write(&path, "{\"policies\": []}").expect("fixture should write");

    let loaded = load_from_path(&path).expect("sparse snapshot should load");
    assert_eq!(loaded, StoreSnapshot::default());

    let _ = fs::remove_file(path);
}

#[test]
fn duplicate_ids_keep_the_last_record() {
    let snapshot = StoreSnapshot {
        policies: vec![policy("P1", "First"), policy("P1", "Second")],
        ..StoreSnapshot::default()
    };

    let store = store_from_snapshot(snapshot);
    assert_eq!(store.policies().len(), 1);
    let kept = store
        .policy(&PolicyId::from("P1"))
        .expect("policy should exist");
    assert_eq!(kept.name, "Second");
}

#[test]
fn demo_snapshot_covers_the_hub_surfaces() {
    let store = store_from_snapshot(demo_snapshot());

    assert_eq!(store.policies().len(), 5);
    assert!(store.session().is_some());
    assert_eq!(store.reports().len(), 4);
    assert_eq!(store.default_policy_id(), Some(&PolicyId::from("P-design")));

    let orbit = store
        .policy(&PolicyId::from("P-orbit"))
        .expect("join-request policy should exist");
    assert!(orbit.is_join_request_pending());

    let metro = PolicyId::from("P-metro");
    assert!(store.card_feeds_for(&metro).is_some());
    assert!(store.sync_progress().contains_key(&metro));
}
