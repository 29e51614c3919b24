use crate::mcp::errors;
use serde_json::{Map, Value, json};
use thiserror::Error;

/// Failures surfaced by the gateway. Every variant maps onto a failure
/// envelope; none of them is fatal to the server.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid argument `{field}`: {message}")]
    InvalidArgument { field: String, message: String },

    #[error("tool already registered: {0}")]
    DuplicateTool(String),

    /// No response was received from the backend.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("backend rejected request with status {status}: {body}")]
    BackendRejected { status: u16, body: String },
}

impl GatewayError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        GatewayError::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::UnknownTool(_) => errors::UNKNOWN_TOOL,
            GatewayError::InvalidArgument { .. } => errors::INVALID_ARGUMENT,
            GatewayError::DuplicateTool(_) => errors::DUPLICATE_TOOL,
            GatewayError::BackendUnavailable(_) => errors::BACKEND_UNAVAILABLE,
            GatewayError::BackendRejected { .. } => errors::BACKEND_REJECTED,
        }
    }

    /// Kind-specific fields carried next to `kind` and `message` in the
    /// failure envelope.
    pub fn details(&self) -> Map<String, Value> {
        let mut details = Map::new();
        match self {
            GatewayError::UnknownTool(tool) | GatewayError::DuplicateTool(tool) => {
                details.insert("tool".to_string(), json!(tool));
            }
            GatewayError::InvalidArgument { field, .. } => {
                details.insert("field".to_string(), json!(field));
            }
            GatewayError::BackendRejected { status, body } => {
                details.insert("status".to_string(), json!(status));
                details.insert("body".to_string(), json!(body));
            }
            GatewayError::BackendUnavailable(_) => {}
        }
        details
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            GatewayError::InvalidArgument { field, .. } => Some(field),
            _ => None,
        }
    }
}
