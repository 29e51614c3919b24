mod common;

use common::{Server, unreachable_base_url};
use std::collections::BTreeMap;

fn required_of(tool: &serde_json::Value) -> Vec<String> {
    tool.get("inputSchema")
        .and_then(|schema| schema.get("required"))
        .and_then(|value| value.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn tools_list_matches_catalog() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::start(&unreachable_base_url())?;

    let response = server.send(serde_json::json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/list",
        "params": {}
    }))?;
    let tools = response
        .get("result")
        .and_then(|value| value.get("tools"))
        .and_then(|value| value.as_array())
        .expect("tools array present");
    assert_eq!(tools.len(), 8);

    let required: BTreeMap<&str, Vec<String>> = tools
        .iter()
        .filter_map(|tool| {
            let name = tool.get("name").and_then(|value| value.as_str())?;
            Some((name, required_of(tool)))
        })
        .collect();

    let expected: BTreeMap<&str, Vec<&str>> = [
        ("get_project_runs", vec!["project_id"]),
        ("get_run_results", vec!["run_id"]),
        ("redact_pii", vec!["project_id", "files"]),
        (
            "redact_relevance",
            vec!["project_id", "files", "relevance_term_file", "cutoff"],
        ),
        (
            "extract_relationships",
            vec!["project_id", "files", "claim_concepts_file"],
        ),
        ("create_knowledge_graph", vec!["project_id", "files"]),
        ("get_rex_message", vec!["project_id", "run_id"]),
        ("send_rex_message", vec!["project_id", "message", "run_id"]),
    ]
    .into_iter()
    .collect();

    assert_eq!(required.len(), expected.len());
    for (name, fields) in expected {
        assert_eq!(required.get(name).expect(name), &fields, "tool {name}");
    }

    let graph = tools
        .iter()
        .find(|tool| tool.get("name").and_then(|v| v.as_str()) == Some("create_knowledge_graph"))
        .expect("knowledge graph tool");
    let properties = &graph["inputSchema"]["properties"];
    assert_eq!(properties["files1_name"]["default"], "set_1");
    assert_eq!(properties["files2_name"]["default"], "set_2");
    assert_eq!(properties["files2"]["type"], "array");
    Ok(())
}

#[test]
fn tools_list_unchanged_after_calls() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::start(&unreachable_base_url())?;
    let list = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/list"
    });

    let before = server.send(list.clone())?;
    server.call_tool(2, "nonexistent_tool", serde_json::json!({}))?;
    server.call_tool(3, "get_run_results", serde_json::json!({}))?;
    let after = server.send(list)?;

    assert_eq!(before.get("result"), after.get("result"));
    Ok(())
}
