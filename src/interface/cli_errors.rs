use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CliErrorCode {
    InvalidArgument,
    SnapshotNotFound,
    SnapshotMalformed,
    PolicyNotFound,
    ConfigError,
    IoError,
    Internal,
}

impl CliErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::SnapshotNotFound => "SNAPSHOT_NOT_FOUND",
            Self::SnapshotMalformed => "SNAPSHOT_MALFORMED",
            Self::PolicyNotFound => "POLICY_NOT_FOUND",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for CliErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps the string errors bubbling up from the infrastructure layer to a
/// stable wire code. Messages are matched on the prefixes those layers emit.
pub fn classify_error_message(message: &str) -> CliErrorCode {
    let normalized = message.to_ascii_lowercase();

    if normalized.contains("snapshot read failed") {
        if contains_any(&normalized, &["no such file", "not found", "os error 2"]) {
            return CliErrorCode::SnapshotNotFound;
        }
        return CliErrorCode::IoError;
    }

    if normalized.contains("snapshot parse failed") {
        return CliErrorCode::SnapshotMalformed;
    }

    if normalized.contains("policy not found") {
        return CliErrorCode::PolicyNotFound;
    }

    if contains_any(
        &normalized,
        &[
            "config read failed",
            "config parse failed",
            "config encode failed",
            "config write failed",
            "config directory create failed",
            "cannot resolve config path",
        ],
    ) {
        return CliErrorCode::ConfigError;
    }

    if contains_any(&normalized, &["io error:", "is a directory"]) {
        return CliErrorCode::IoError;
    }

    CliErrorCode::Internal
}

fn contains_any(message: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|pattern| message.contains(pattern))
}
