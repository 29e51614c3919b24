//! Rex chat. History and new messages are separate stateless calls scoped
//! to a run; the backend keeps the conversation.

use crate::backend::BackendRequest;
use crate::gateway::{Arguments, Constraint, GatewayError, ParamKind, ParamSpec, ToolDefinition};
use crate::mcp::contracts::{TOOL_GET_REX_MESSAGE, TOOL_SEND_REX_MESSAGE};
use crate::tools::redact::project_id_param;

fn run_id_param() -> ParamSpec {
    ParamSpec::required("run_id", ParamKind::String, "The ReasonerX run ID")
        .with(Constraint::NonEmpty)
}

fn chat_segments(project_id: &str) -> [&str; 4] {
    ["api", "chat", project_id, "message_rex"]
}

pub fn get_rex_message() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_GET_REX_MESSAGE,
        description: "Get Rex chat message history for a specific run.",
        params: vec![project_id_param(), run_id_param()],
        build: build_get_rex_message,
    }
}

fn build_get_rex_message(args: &Arguments) -> Result<BackendRequest, GatewayError> {
    let project_id = args.require_str("project_id")?;
    let run_id = args.require_str("run_id")?;
    Ok(BackendRequest::get(chat_segments(project_id)).query("run_id", run_id))
}

pub fn send_rex_message() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_SEND_REX_MESSAGE,
        description: "Send a message to Rex (reasoning agent) based on a knowledge graph.",
        params: vec![
            project_id_param(),
            ParamSpec::required("message", ParamKind::String, "The message to send to Rex")
                .with(Constraint::NonEmpty),
            run_id_param(),
            ParamSpec::optional(
                "graph",
                ParamKind::Object,
                "Optional modified graph for the next message with nodes and edges",
            )
            .with(Constraint::Graph),
        ],
        build: build_send_rex_message,
    }
}

fn build_send_rex_message(args: &Arguments) -> Result<BackendRequest, GatewayError> {
    let project_id = args.require_str("project_id")?;
    let message = args.require_str("message")?;
    let run_id = args.require_str("run_id")?;

    let request = BackendRequest::post(chat_segments(project_id))
        .query("message", message)
        .query("run_id", run_id);
    Ok(match args.get("graph") {
        Some(graph) => request.json(graph.clone()),
        None => request,
    })
}
