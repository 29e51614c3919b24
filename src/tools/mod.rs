use crate::gateway::{GatewayError, Payload, ToolDefinition};
use serde_json::{Value, json};

pub mod knowledge_graph;
pub mod redact;
pub mod relationships;
pub mod rex;
pub mod runs;

/// Every tool the server exposes, in listing order.
pub fn catalog() -> Vec<ToolDefinition> {
    vec![
        runs::get_project_runs(),
        runs::get_run_results(),
        redact::redact_pii(),
        redact::redact_relevance(),
        relationships::extract_relationships(),
        knowledge_graph::create_knowledge_graph(),
        rex::get_rex_message(),
        rex::send_rex_message(),
    ]
}

pub fn tool_result(outcome: Result<Payload, GatewayError>) -> Value {
    match outcome {
        Ok(payload) => success_result(&payload),
        Err(error) => error_result(&error),
    }
}

pub fn success_result(payload: &Payload) -> Value {
    json!({
        "content": [{"type": "text", "text": payload.to_text()}],
        "structuredContent": {
            "ok": true,
            "payload": payload.to_value()
        },
        "isError": false
    })
}

pub fn error_result(error: &GatewayError) -> Value {
    let message = error.to_string();
    let mut envelope = json!({
        "ok": false,
        "kind": error.kind(),
        "message": message,
    });

    if let Some(obj) = envelope.as_object_mut() {
        obj.extend(error.details());
    }

    json!({
        "content": [{"type": "text", "text": format!("Error: {message}")}],
        "structuredContent": envelope,
        "isError": true
    })
}
