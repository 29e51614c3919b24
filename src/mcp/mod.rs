use crate::gateway::ToolDefinition;
use serde_json::json;

pub mod contracts;
pub mod errors;

pub fn tool_definitions(tools: &[ToolDefinition]) -> Vec<serde_json::Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.description,
                "inputSchema": tool.input_schema()
            })
        })
        .collect()
}
