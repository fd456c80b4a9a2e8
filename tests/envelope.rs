//! Integration tests for the envelope resolver
//! Covers:
//! - JSON-RPC error and success envelopes
//! - Direct (unwrapped) tool results from SIEM, EDR and SSH providers
//! - Segmenter output flowing into the resolver

use lilith_transcript::engine::segmenter::segment;
use lilith_transcript::engine_core::models::ResolvedResult;
use lilith_transcript::protocol::envelope::resolve;
use serde_json::json;

#[test]
fn test_rpc_error_envelope() {
    let record = resolve(
        r#"{"tool":"search_alerts","args":{"limit":5},"result":{"jsonrpc":"2.0","error":{"message":"scope denied"}}}"#,
    )
    .expect("payload is valid JSON");

    assert_eq!(record.tool_name, "search_alerts");
    assert_eq!(record.arguments.get("limit"), Some(&json!(5)));
    assert_eq!(record.outcome, ResolvedResult::error("scope denied"));
}

#[test]
fn test_rpc_success_envelope() {
    let record = resolve(
        r#"{"tool":"search_alerts","args":{"limit":5},"result":{"jsonrpc":"2.0","result":{"content":[{"text":"5 alerts found"}]}}}"#,
    )
    .expect("payload is valid JSON");

    assert_eq!(record.outcome, ResolvedResult::success("5 alerts found"));
    assert_eq!(
        record.result_envelope,
        json!({"jsonrpc": "2.0", "result": {"content": [{"text": "5 alerts found"}]}})
    );
}

#[test]
fn test_rpc_error_wins_over_result() {
    let record = resolve(
        r#"{"tool":"a","result":{"jsonrpc":"2.0","error":{"code":-32000,"message":"blocked"},"result":{"content":[{"text":"ignored"}]}}}"#,
    )
    .unwrap();
    assert_eq!(record.outcome, ResolvedResult::error("blocked"));
}

#[test]
fn test_multi_part_content_joined_by_newlines() {
    let record = resolve(
        r#"{"tool":"get_agents","result":{"jsonrpc":"2.0","result":{"content":[{"type":"text","text":"001 active"},{"type":"text","text":"002 disconnected"}]}}}"#,
    )
    .unwrap();
    assert_eq!(record.outcome.display_text, "001 active\n002 disconnected");
    assert!(!record.outcome.is_error);
}

#[test]
fn test_ssh_exec_stdout_and_stderr() {
    let record = resolve(
        r#"{"tool_name":"ssh_exec","args":{"host":"10.0.0.5","cmd":"id"},"result":{"stdout":"uid=0(root)","stderr":"warning: agent forwarding"}}"#,
    )
    .unwrap();
    assert_eq!(record.tool_name, "ssh_exec");
    assert_eq!(
        record.outcome,
        ResolvedResult::success("uid=0(root)\nwarning: agent forwarding")
    );
}

#[test]
fn test_direct_is_error_without_rpc_marker() {
    let record = resolve(
        r#"{"tool":"contain_host","result":{"isError":true,"content":[{"text":"device not found"}]}}"#,
    )
    .unwrap();
    assert_eq!(record.outcome, ResolvedResult::error("device not found"));
}

#[test]
fn test_message_field() {
    let record = resolve(r#"{"tool":"t","result":{"message":"queued"}}"#).unwrap();
    assert_eq!(record.outcome.display_text, "queued");
}

#[test]
fn test_string_result_used_verbatim() {
    let record = resolve(r#"{"tool":"t","result":"  raw output\n"}"#).unwrap();
    assert_eq!(record.outcome.display_text, "  raw output\n");
}

#[test]
fn test_missing_result_resolves_to_empty_text() {
    let record = resolve(r#"{"tool":"t","args":{}}"#).unwrap();
    assert_eq!(record.outcome, ResolvedResult::success(""));
}

#[test]
fn test_unknown_tool_sentinel() {
    let record = resolve(r#"{"args":{"x":1}}"#).unwrap();
    assert_eq!(record.tool_name, "unknown_tool");
}

#[test]
fn test_unparseable_payload_is_none() {
    assert!(resolve("{not json}").is_none());
    assert!(resolve(r#"{"tool":"a","#).is_none());
}

#[test]
fn test_segmenter_payloads_resolve() {
    let text = r#"Result: [MCP_TOOL_CALL]
{"tool":"search_alerts","args":{"limit":5},"result":{"jsonrpc":"2.0","result":{"content":[{"text":"5 alerts found"}]}}}
[/MCP_TOOL_CALL]"#;
    let records: Vec<_> = segment(text)
        .iter()
        .filter_map(|s| s.raw_payload())
        .filter_map(|p| resolve(p.as_str()))
        .collect();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome.display_text, "5 alerts found");
}
