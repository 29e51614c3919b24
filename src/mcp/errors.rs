pub const UNKNOWN_TOOL: &str = "unknown_tool";
pub const INVALID_ARGUMENT: &str = "invalid_argument";
pub const DUPLICATE_TOOL: &str = "duplicate_tool";
pub const BACKEND_UNAVAILABLE: &str = "backend_unavailable";
pub const BACKEND_REJECTED: &str = "backend_rejected";

// JSON-RPC error codes
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
