//! Invocation request/result types
//!
//! [`InvocationResult`] is the only thing a registry hands back to callers:
//! handler failures are folded into `Failure` values, never propagated raw.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::traits::{ErrorCode, ToolError};

/// A single call to a registered tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRequest {
    #[serde(alias = "tool")]
    pub tool_id: String,
    #[serde(default = "empty_arguments")]
    pub arguments: Value,
}

/// Arguments used when a caller sends none
pub fn empty_arguments() -> Value {
    Value::Object(Default::default())
}

impl InvocationRequest {
    pub fn new(tool_id: impl Into<String>, arguments: Value) -> Self {
        Self {
            tool_id: tool_id.into(),
            arguments,
        }
    }
}

/// Why an invocation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No tool registered under the requested id
    UnknownTool,
    /// Arguments violate the tool's input schema
    InvalidInput,
    /// The handler ran and reported an error (or timed out)
    ExecutionError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::UnknownTool => "unknown_tool",
            FailureKind::InvalidInput => "invalid_input",
            FailureKind::ExecutionError => "execution_error",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationResult {
    Success { output: Value },
    Failure {
        kind: FailureKind,
        /// Handler error code; present only for `ExecutionError`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<ErrorCode>,
        message: String,
    },
}

impl InvocationResult {
    pub fn success(output: Value) -> Self {
        Self::Success { output }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            code: None,
            message: message.into(),
        }
    }

    /// Execution failure carrying the handler's error code
    pub fn execution_error(error: ToolError) -> Self {
        Self::Failure {
            kind: FailureKind::ExecutionError,
            code: Some(error.code),
            message: error.message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn output(&self) -> Option<&Value> {
        match self {
            Self::Success { output } => Some(output),
            Self::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn failure_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { code, .. } => *code,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message, .. } => Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_wire_shape() {
        let ok = InvocationResult::success(json!({ "result": 14 }));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "status": "success", "output": { "result": 14 } })
        );

        let err = InvocationResult::failure(FailureKind::InvalidInput, "expression is required");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "status": "failure",
                "kind": "invalid_input",
                "message": "expression is required"
            })
        );
        assert_eq!(err.failure_kind(), Some(FailureKind::InvalidInput));
        assert!(err.failure_code().is_none());
        assert!(err.output().is_none());
    }

    #[test]
    fn test_execution_error_keeps_handler_code() {
        let err = InvocationResult::execution_error(ToolError::missing_field("date"));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "status": "failure",
                "kind": "execution_error",
                "code": "missing_field",
                "message": "missing field: date"
            })
        );
        assert_eq!(err.failure_code(), Some(ErrorCode::MissingField));

        let parsed: InvocationResult = serde_json::from_value(json!({
            "status": "failure",
            "kind": "execution_error",
            "code": "timeout",
            "message": "tool 'slow' timed out after 1s"
        }))
        .unwrap();
        assert_eq!(parsed.failure_code(), Some(ErrorCode::Timeout));
    }

    #[test]
    fn test_request_defaults_arguments() {
        let request: InvocationRequest =
            serde_json::from_value(json!({ "tool": "calculator" })).unwrap();
        assert_eq!(request.tool_id, "calculator");
        assert_eq!(request.arguments, json!({}));
    }
}
