use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};

static FIXTURE_SEQ: AtomicU64 = AtomicU64::new(0);

#[allow(dead_code)]
pub fn run_tally(args: &[&str]) -> serde_json::Value {
    run_tally_in(args, None)
}

#[allow(dead_code)]
pub fn run_tally_in(args: &[&str], cwd: Option<&Path>) -> serde_json::Value {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tally"));
    if let Some(directory) = cwd {
        command.current_dir(directory);
    }
    let output = command
        .args(args)
        .output()
        .expect("tally binary should run");
    assert!(output.status.success(), "binary exited non-zero");

    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    serde_json::from_str(&stdout).expect("stdout should be JSON")
}

/// Snapshot fixture written to a throwaway directory; the directory is
/// removed when the fixture drops.
#[allow(dead_code)]
pub struct SnapshotFile {
    root: PathBuf,
    pub path: PathBuf,
}

#[allow(dead_code)]
impl SnapshotFile {
    pub fn write(name: &str, contents: &str) -> Self {
        let seq = FIXTURE_SEQ.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!("tally-tests-{}-{seq}", std::process::id()));
        std::fs::create_dir_all(&root).expect("fixture directory should be created");
        let path = root.join(name);
        std::fs::write(&path, contents).expect("fixture file should be written");
        Self { root, path }
    }

    pub fn path_str(&self) -> String {
        self.path.display().to_string()
    }
}

impl Drop for SnapshotFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

#[allow(dead_code)]
pub fn assert_next_actions_shape(value: &serde_json::Value) {
    let actions = value["next_actions"]
        .as_array()
        .expect("next_actions should be an array");
    assert!(!actions.is_empty(), "next_actions should not be empty");
    for action in actions {
        assert!(action["command"].is_string());
        assert!(action["description"].is_string());
    }
}
