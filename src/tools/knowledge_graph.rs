use crate::backend::BackendRequest;
use crate::gateway::{Arguments, Constraint, GatewayError, ParamKind, ParamSpec, ToolDefinition};
use crate::mcp::contracts::{
    DEFAULT_FILES1_NAME, DEFAULT_FILES2_NAME, DOCUMENT_EXTENSIONS, TERM_EXTENSIONS,
    TOOL_CREATE_KNOWLEDGE_GRAPH,
};
use crate::tools::redact::{documents_param, project_id_param};
use serde_json::json;

pub fn create_knowledge_graph() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_CREATE_KNOWLEDGE_GRAPH,
        description: "Create a knowledge map where nodes are concepts and edges are relationships.",
        params: vec![
            project_id_param(),
            documents_param(
                "files",
                "Array of file paths to map relationships from (txt, csv, json, html)",
            ),
            ParamSpec::optional(
                "files2",
                ParamKind::StringArray,
                "Additional set of files for comparison",
            )
            .with(Constraint::Extensions(DOCUMENT_EXTENSIONS)),
            ParamSpec::optional(
                "concepts_file",
                ParamKind::String,
                "Path to txt file containing comma separated concepts expected to be nodes",
            )
            .with(Constraint::Extensions(TERM_EXTENSIONS)),
            ParamSpec::optional("files1_name", ParamKind::String, "Name for the first set of files")
                .with_default(json!(DEFAULT_FILES1_NAME)),
            ParamSpec::optional(
                "files2_name",
                ParamKind::String,
                "Name for the second set of files",
            )
            .with_default(json!(DEFAULT_FILES2_NAME)),
        ],
        build: build_knowledge_graph,
    }
}

fn build_knowledge_graph(args: &Arguments) -> Result<BackendRequest, GatewayError> {
    let project_id = args.require_str("project_id")?;

    let mut request = BackendRequest::post([project_id, "reasoner-x"])
        .files("files", "files", args.strings("files"))
        .files("files2", "files2", args.strings("files2"));
    if let Some(concepts_file) = args.str("concepts_file") {
        request = request.file("concepts", "concepts_file", concepts_file);
    }

    Ok(request
        .text(
            "files1_name",
            args.str("files1_name").unwrap_or(DEFAULT_FILES1_NAME),
        )
        .text(
            "files2_name",
            args.str("files2_name").unwrap_or(DEFAULT_FILES2_NAME),
        ))
}
