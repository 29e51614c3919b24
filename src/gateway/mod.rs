//! Tool registry and dispatch.
//!
//! The gateway owns the tool catalog and a [`Transport`]. `invoke` validates
//! arguments against the tool's declared parameters, builds the backend
//! request, sends it once, and hands back the backend body untouched.

use crate::backend::Transport;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

mod error;
mod schema;
mod validation;

pub use error::GatewayError;
pub use schema::{Constraint, ParamKind, ParamSpec, ToolDefinition};
pub use validation::{Arguments, validate};

/// Successful backend body. JSON when it parses, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str(&body) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(body),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Payload::Json(value) => value.clone(),
            Payload::Text(text) => Value::String(text.clone()),
        }
    }

    /// Human-readable rendering for text content blocks.
    pub fn to_text(&self) -> String {
        match self {
            Payload::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Payload::Text(text) => text.clone(),
        }
    }
}

pub struct ToolGateway {
    tools: Vec<ToolDefinition>,
    index: HashMap<&'static str, usize>,
    transport: Arc<dyn Transport>,
}

impl ToolGateway {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
            transport,
        }
    }

    pub fn with_catalog(
        transport: Arc<dyn Transport>,
        catalog: Vec<ToolDefinition>,
    ) -> Result<Self, GatewayError> {
        let mut gateway = Self::new(transport);
        for definition in catalog {
            gateway.register(definition)?;
        }
        Ok(gateway)
    }

    pub fn register(&mut self, definition: ToolDefinition) -> Result<(), GatewayError> {
        if self.index.contains_key(definition.name) {
            return Err(GatewayError::DuplicateTool(definition.name.to_string()));
        }
        self.index.insert(definition.name, self.tools.len());
        self.tools.push(definition);
        Ok(())
    }

    pub fn list_tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn definition(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&position| &self.tools[position])
    }

    pub async fn invoke(&self, name: &str, arguments: &Value) -> Result<Payload, GatewayError> {
        let definition = self
            .definition(name)
            .ok_or_else(|| GatewayError::UnknownTool(name.to_string()))?;
        let arguments = validate(definition, arguments)?;
        let request = (definition.build)(&arguments)?;

        debug!(
            tool = name,
            method = request.method.as_str(),
            path = %request.path(),
            "invoking tool"
        );

        let response = self.transport.send(request).await?;
        if response.status >= 400 {
            warn!(tool = name, status = response.status, "backend rejected request");
            return Err(GatewayError::BackendRejected {
                status: response.status,
                body: response.body,
            });
        }
        Ok(Payload::from_body(response.body))
    }
}
