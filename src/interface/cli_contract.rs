use serde::Serialize;

use crate::interface::cli_errors::CliErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextAction {
    pub command: String,
    pub description: String,
}

impl NextAction {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorDetail {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn from_code(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessEnvelope<T: Serialize> {
    pub ok: bool,
    pub command: String,
    pub result: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub next_actions: Vec<NextAction>,
}

impl<T: Serialize> SuccessEnvelope<T> {
    pub fn new(
        command: impl Into<String>,
        result: T,
        warnings: Vec<String>,
        next_actions: Vec<NextAction>,
    ) -> Self {
        Self {
            ok: true,
            command: command.into(),
            result,
            warnings,
            next_actions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub command: String,
    pub error: ErrorDetail,
    pub fix: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub next_actions: Vec<NextAction>,
}

impl ErrorEnvelope {
    pub fn new(
        command: impl Into<String>,
        error: ErrorDetail,
        fix: impl Into<String>,
        warnings: Vec<String>,
        next_actions: Vec<NextAction>,
    ) -> Self {
        Self {
            ok: false,
            command: command.into(),
            error,
            fix: fix.into(),
            warnings,
            next_actions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommandEnvelope<T: Serialize> {
    Success(SuccessEnvelope<T>),
    Error(ErrorEnvelope),
}

impl<T: Serialize> CommandEnvelope<T> {
    pub fn success(
        command: impl Into<String>,
        result: T,
        warnings: Vec<String>,
        next_actions: Vec<NextAction>,
    ) -> Self {
        Self::Success(SuccessEnvelope::new(
            command,
            result,
            warnings,
            next_actions,
        ))
    }

    pub fn error(
        command: impl Into<String>,
        error: ErrorDetail,
        fix: impl Into<String>,
        warnings: Vec<String>,
        next_actions: Vec<NextAction>,
    ) -> Self {
        Self::Error(ErrorEnvelope::new(
            command,
            error,
            fix,
            warnings,
            next_actions,
        ))
    }
}
