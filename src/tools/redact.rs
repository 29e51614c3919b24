use crate::backend::BackendRequest;
use crate::gateway::{Arguments, Constraint, GatewayError, ParamKind, ParamSpec, ToolDefinition};
use crate::mcp::contracts::{
    DOCUMENT_EXTENSIONS, TERM_EXTENSIONS, TOOL_REDACT_PII, TOOL_REDACT_RELEVANCE,
};

pub(crate) fn project_id_param() -> ParamSpec {
    ParamSpec::required("project_id", ParamKind::String, "Project the documents belong to")
        .with(Constraint::NonEmpty)
        .with(Constraint::PathSegment)
}

pub(crate) fn documents_param(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec::required(name, ParamKind::StringArray, description)
        .with(Constraint::NonEmpty)
        .with(Constraint::Extensions(DOCUMENT_EXTENSIONS))
}

pub fn redact_pii() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_REDACT_PII,
        description: "Redact PII (Personal Identifiable Information) from documents.",
        params: vec![
            project_id_param(),
            documents_param("files", "Array of file paths to redact (txt, csv, json, html)"),
        ],
        build: build_redact_pii,
    }
}

fn build_redact_pii(args: &Arguments) -> Result<BackendRequest, GatewayError> {
    let project_id = args.require_str("project_id")?;
    Ok(BackendRequest::post([project_id, "redact-pii"]).files(
        "files",
        "files",
        args.strings("files"),
    ))
}

pub fn redact_relevance() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_REDACT_RELEVANCE,
        description: "Remove information from documents that is relevant to a given intent text.",
        params: vec![
            project_id_param(),
            documents_param("files", "Array of file paths to redact (txt, csv, json, html)"),
            ParamSpec::required(
                "relevance_term_file",
                ParamKind::String,
                "Path to txt file with the subject to redact from the main text",
            )
            .with(Constraint::NonEmpty)
            .with(Constraint::Extensions(TERM_EXTENSIONS)),
            ParamSpec::required(
                "cutoff",
                ParamKind::Number,
                "Number between 0 and 1. Lower numbers result in more redaction",
            )
            .with(Constraint::Range { min: 0.0, max: 1.0 }),
        ],
        build: build_redact_relevance,
    }
}

fn build_redact_relevance(args: &Arguments) -> Result<BackendRequest, GatewayError> {
    let project_id = args.require_str("project_id")?;
    let term_file = args.require_str("relevance_term_file")?;
    let cutoff = args
        .f64("cutoff")
        .ok_or_else(|| GatewayError::invalid("cutoff", "is required"))?;

    Ok(BackendRequest::post([project_id, "redact-relevance"])
        .files("files", "files", args.strings("files"))
        .file("relevance_term", "relevance_term_file", term_file)
        .text("cutoff", format_cutoff(cutoff)))
}

/// Whole values are sent with one decimal place (`1.0`).
fn format_cutoff(cutoff: f64) -> String {
    if cutoff.fract() == 0.0 {
        format!("{cutoff:.1}")
    } else {
        cutoff.to_string()
    }
}
