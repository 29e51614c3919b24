use crate::backend::BackendRequest;
use crate::gateway::{Arguments, Constraint, GatewayError, ParamKind, ParamSpec, ToolDefinition};
use crate::mcp::contracts::{TERM_EXTENSIONS, TOOL_EXTRACT_RELATIONSHIPS};
use crate::tools::redact::{documents_param, project_id_param};

pub fn extract_relationships() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_EXTRACT_RELATIONSHIPS,
        description: "List relationship propositions in documents that are salient and relevant to intent text.",
        params: vec![
            project_id_param(),
            documents_param("files", "Array of file paths to analyze (txt, csv, json, html)"),
            ParamSpec::required(
                "claim_concepts_file",
                ParamKind::String,
                "Path to txt file with a subject of interest",
            )
            .with(Constraint::NonEmpty)
            .with(Constraint::Extensions(TERM_EXTENSIONS)),
        ],
        build: build_extract_relationships,
    }
}

fn build_extract_relationships(args: &Arguments) -> Result<BackendRequest, GatewayError> {
    let project_id = args.require_str("project_id")?;
    let concepts_file = args.require_str("claim_concepts_file")?;

    Ok(BackendRequest::post([project_id, "relationships-from-premises"])
        .files("files", "files", args.strings("files"))
        .file("claim_concepts", "claim_concepts_file", concepts_file))
}
