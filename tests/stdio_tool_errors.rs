mod common;

use common::{Server, StubBackend, unreachable_base_url};
use serde_json::json;

fn kind_of(result: &serde_json::Value) -> Option<&str> {
    result
        .get("structuredContent")
        .and_then(|value| value.get("kind"))
        .and_then(|value| value.as_str())
}

#[test]
fn unknown_tool_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::start(&unreachable_base_url())?;
    let result = server.call_tool(1, "nonexistent_tool", json!({}))?;

    assert_eq!(result.get("isError").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(kind_of(&result), Some("unknown_tool"));
    assert_eq!(
        result["structuredContent"]["tool"].as_str(),
        Some("nonexistent_tool")
    );
    Ok(())
}

#[test]
fn missing_and_invalid_arguments_skip_backend() -> Result<(), Box<dyn std::error::Error>> {
    // Any request reaching the stub would be answered with 200.
    let backend = StubBackend::serve(vec![(200, "{}")]);
    let mut server = Server::start(&backend.base_url)?;

    let result = server.call_tool(1, "get_run_results", json!({}))?;
    assert_eq!(kind_of(&result), Some("invalid_argument"));
    assert_eq!(result["structuredContent"]["field"].as_str(), Some("run_id"));

    for (id, cutoff) in [(2, -0.1), (3, 1.5)] {
        let result = server.call_tool(
            id,
            "redact_relevance",
            json!({
                "project_id": "p1",
                "files": ["doc.txt"],
                "relevance_term_file": "term.txt",
                "cutoff": cutoff
            }),
        )?;
        assert_eq!(kind_of(&result), Some("invalid_argument"));
        assert_eq!(result["structuredContent"]["field"].as_str(), Some("cutoff"));
    }

    let result = server.call_tool(
        4,
        "get_project_runs",
        json!({"project_id": "p1", "sort_by": "size"}),
    )?;
    assert_eq!(result["structuredContent"]["field"].as_str(), Some("sort_by"));

    let result = server.call_tool(5, "get_run_results", json!({"run_id": "r1", "extra": 1}))?;
    assert_eq!(result["structuredContent"]["field"].as_str(), Some("extra"));

    let result = server.call_tool(6, "get_run_results", json!({"run_id": ".."}))?;
    assert_eq!(result["structuredContent"]["field"].as_str(), Some("run_id"));

    let result = server.call_tool(7, "redact_pii", json!({"project_id": ".", "files": ["a.txt"]}))?;
    assert_eq!(result["structuredContent"]["field"].as_str(), Some("project_id"));

    let result = server.call_tool(
        8,
        "get_project_runs",
        json!({"project_id": "p1", "page": 18446744073709551615u64}),
    )?;
    assert_eq!(result["structuredContent"]["field"].as_str(), Some("page"));

    assert!(backend.received_nothing());
    Ok(())
}

#[test]
fn malformed_params_are_tool_errors() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::start(&unreachable_base_url())?;
    let response = server.send(json!({
        "jsonrpc": "2.0",
        "id": 9,
        "method": "tools/call",
        "params": {"arguments": {}}
    }))?;
    let result = response.get("result").expect("result present");
    assert_eq!(result.get("isError").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(result["structuredContent"]["field"].as_str(), Some("name"));
    Ok(())
}

#[test]
fn unreachable_backend_is_unavailable() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::start(&unreachable_base_url())?;
    let result = server.call_tool(1, "get_run_results", json!({"run_id": "r1"}))?;

    assert_eq!(result.get("isError").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(kind_of(&result), Some("backend_unavailable"));
    let text = result["content"][0]["text"].as_str().expect("text");
    assert!(text.starts_with("Error: backend unavailable"));
    Ok(())
}
