use crate::backend::BackendRequest;
use crate::gateway::{Arguments, Constraint, GatewayError, ParamKind, ParamSpec, ToolDefinition};
use crate::mcp::contracts::{
    COG_NAMES, DEFAULT_PAGE, DEFAULT_ROWS_PER_PAGE, DEFAULT_SORT_BY, SORT_FIELDS,
    TOOL_GET_PROJECT_RUNS, TOOL_GET_RUN_RESULTS,
};
use serde_json::json;

pub fn get_project_runs() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_GET_PROJECT_RUNS,
        description: "Get all past cog runs in a project with optional filtering and sorting.",
        params: vec![
            ParamSpec::required("project_id", ParamKind::String, "Project to list runs for")
                .with(Constraint::NonEmpty)
                .with(Constraint::PathSegment),
            ParamSpec::optional(
                "filter_cog_name",
                ParamKind::String,
                "Only show results from the selected cog",
            )
            .with(Constraint::OneOf(COG_NAMES)),
            ParamSpec::optional(
                "filter_user_id",
                ParamKind::String,
                "Only return runs created by the user with the given ID",
            ),
            ParamSpec::optional(
                "filter_api_key_id",
                ParamKind::String,
                "Only return runs created by the given API key",
            ),
            ParamSpec::optional("page", ParamKind::Integer, "The page number of results to return")
                .with_default(json!(DEFAULT_PAGE))
                .with(Constraint::AtLeast(1)),
            ParamSpec::optional(
                "rows_per_page",
                ParamKind::Integer,
                "The number of runs to return per page",
            )
            .with_default(json!(DEFAULT_ROWS_PER_PAGE))
            .with(Constraint::AtLeast(1)),
            ParamSpec::optional("sort_by", ParamKind::String, "How to sort the runs")
                .with_default(json!(DEFAULT_SORT_BY))
                .with(Constraint::OneOf(SORT_FIELDS)),
            ParamSpec::optional(
                "descending",
                ParamKind::Boolean,
                "Whether to sort results in descending order",
            )
            .with_default(json!(true)),
        ],
        build: build_project_runs,
    }
}

fn build_project_runs(args: &Arguments) -> Result<BackendRequest, GatewayError> {
    let project_id = args.require_str("project_id")?;
    let page = args.i64("page").unwrap_or(DEFAULT_PAGE);
    let rows_per_page = args.i64("rows_per_page").unwrap_or(DEFAULT_ROWS_PER_PAGE);
    let sort_by = args.str("sort_by").unwrap_or(DEFAULT_SORT_BY);
    let descending = args.bool("descending").unwrap_or(true);

    Ok(BackendRequest::get(["api", "runs", "project", project_id])
        .query_opt("filterCogName", args.str("filter_cog_name"))
        .query_opt("filterUserId", args.str("filter_user_id"))
        .query_opt("filterApiKeyId", args.str("filter_api_key_id"))
        .query("page", page.to_string())
        .query("rowsPerPage", rows_per_page.to_string())
        .query("sortBy", sort_by)
        .query("descending", descending.to_string()))
}

pub fn get_run_results() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_GET_RUN_RESULTS,
        description: "Fetch the full results of a past run from its unique ID.",
        params: vec![
            ParamSpec::required(
                "run_id",
                ParamKind::String,
                "The run ID, returned in previous run responses",
            )
            .with(Constraint::NonEmpty)
            .with(Constraint::PathSegment),
        ],
        build: build_run_results,
    }
}

fn build_run_results(args: &Arguments) -> Result<BackendRequest, GatewayError> {
    let run_id = args.require_str("run_id")?;
    Ok(BackendRequest::get(["api", "runs", run_id, "results"]))
}
