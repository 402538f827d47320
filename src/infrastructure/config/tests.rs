use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use super::{TallyConfig, load_from_path, save_to_path};

fn unique_temp_path(label: &str) -> PathBuf {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("tally-config-{label}-{pid}-{timestamp}.toml"))
}

#[test]
fn missing_config_uses_defaults() {
    let path = unique_temp_path("missing");
    let config = load_from_path(&path).expect("missing path should default");
    assert_eq!(config, TallyConfig {
        snapshot_path: None,
        force_narrow_layout: false,
        event_log_path: None,
    });
}

#[test]
fn save_and_load_round_trip() {
    let path = unique_temp_path("roundtrip");
    let config = TallyConfig {
        snapshot_path: Some(PathBuf::from("/data/hub-snapshot.json")),
        force_narrow_layout: true,
        event_log_path: Some(PathBuf::from("/tmp/tally-events.jsonl")),
    };
    save_to_path(&path, &config).expect("config should save");

    let loaded = load_from_path(&path).expect("config should load");
    assert_eq!(loaded, config);

    let _ = fs::remove_file(path);
}

#[test]
fn unknown_keys_are_tolerated_and_known_fields_default() {
    let path = unique_temp_path("legacy");
    fs::write(&path, "theme = \"dark\"\n").expect("fixture should write");

    let loaded = load_from_path(&path).expect("legacy config should load");
    assert_eq!(loaded, TallyConfig::default());

    let _ = fs::remove_file(path);
}

#[test]
fn malformed_config_reports_a_parse_error() {
    let path = unique_temp_path("malformed");
    fs::write(&path, "snapshot_path = [not toml").expect("fixture should write");

    let error = load_from_path(&path).expect_err("malformed config should fail");
    assert!(error.contains("config parse failed"));

    let _ = fs::remove_file(path);
}
