pub const PROTOCOL_VERSION: &str = "2025-11-25";

pub const TOOL_GET_PROJECT_RUNS: &str = "get_project_runs";
pub const TOOL_GET_RUN_RESULTS: &str = "get_run_results";
pub const TOOL_REDACT_PII: &str = "redact_pii";
pub const TOOL_REDACT_RELEVANCE: &str = "redact_relevance";
pub const TOOL_EXTRACT_RELATIONSHIPS: &str = "extract_relationships";
pub const TOOL_CREATE_KNOWLEDGE_GRAPH: &str = "create_knowledge_graph";
pub const TOOL_GET_REX_MESSAGE: &str = "get_rex_message";
pub const TOOL_SEND_REX_MESSAGE: &str = "send_rex_message";

pub const DEFAULT_BASE_URL: &str = "https://controller.latentsense.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const PROJECT_ID_HEADER: &str = "x-project-id";

pub const COG_NAMES: &[&str] = &[
    "deidentification",
    "relationships",
    "ai_authorship_detection",
    "knowledge_graph",
];
pub const SORT_FIELDS: &[&str] = &["time", "cost"];

/// Document types the backend accepts for analysis uploads.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "csv", "json", "html"];
/// Term and concept lists are plain text.
pub const TERM_EXTENSIONS: &[&str] = &["txt"];

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_ROWS_PER_PAGE: i64 = 50;
pub const DEFAULT_SORT_BY: &str = "time";
pub const DEFAULT_FILES1_NAME: &str = "set_1";
pub const DEFAULT_FILES2_NAME: &str = "set_2";
