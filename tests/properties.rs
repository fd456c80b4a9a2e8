use lilith_transcript::engine::segmenter::segment;
use lilith_transcript::engine_core::models::Segment;
use lilith_transcript::protocol::envelope::resolve;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Piece {
    Plain(String),
    Tool(String),
    Thought(String),
}

fn piece_strategy() -> impl Strategy<Value = Piece> {
    prop_oneof![
        "[a-zA-Z0-9 .,:\n]{1,16}".prop_map(Piece::Plain),
        ("[a-z_]{1,12}", 0..1000u32).prop_map(|(name, n)| {
            Piece::Tool(format!(r#"{{"tool":"{}","args":{{"limit":{}}}}}"#, name, n))
        }),
        "[a-z ]{0,12}".prop_map(Piece::Thought),
    ]
}

/// Text built from markers and fragments that exercise every scanner state
fn adversarial_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("[MCP_TOOL_CALL]".to_string()),
            Just("[/MCP_TOOL_CALL]".to_string()),
            Just("[THOUGHT]".to_string()),
            Just("[/THOUGHT]".to_string()),
            Just("[SYSTEM] hidden\n".to_string()),
            Just("[FILE_UPLOAD: a.txt]\n".to_string()),
            Just("\n\n".to_string()),
            Just("{".to_string()),
            Just("}".to_string()),
            Just("\"".to_string()),
            Just("\\".to_string()),
            Just(r#"{"tool":"x","response":"ok"}"#.to_string()),
            Just(r#"{"tool":"y","result":{"jsonrpc":"2.0","result":"done"}}"#.to_string()),
            Just(r#"{"tool":"z","x":"[MCP_TOOL_CALL]{"tool":"a"}[/MCP_TOOL_CALL]"}"#.to_string()),
            Just("[FILE_UPLOAD: [MCP_TOOL_CALL]{\"tool\":\"a\"}[/MCP_TOOL_CALL]]\n".to_string()),
            "[a-z é🛡]{0,6}",
        ],
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

/// A well-formed tagged block wrapped in a context that some pass rewrites,
/// plus the payload it must come out as.
fn nested_block_strategy() -> impl Strategy<Value = (String, String)> {
    ("[a-z_]{1,8}", 0..6usize).prop_map(|(name, context)| {
        let payload = format!(r#"{{"tool":"{}"}}"#, name);
        let block = tool_block(&payload);
        let text = match context {
            0 => block,
            1 => format!(r#"{{"tool":"outer","x":"{}"}}"#, block),
            2 => format!(r#"{{"tool":"outer","response":"ok","x":"{}"}}"#, block),
            3 => format!("[FILE_UPLOAD: {}]\n", block),
            4 => format!("[FILE_UPLOAD: a{}.txt]\nbody {}\n", block, block),
            _ => format!("[SYSTEM] {}\n", block),
        };
        (text, payload)
    })
}

/// Fragments that never form or break a tool-call marker on their own
fn noise_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("[THOUGHT]".to_string()),
        Just("[/THOUGHT]".to_string()),
        Just("[SYSTEM] hidden\n".to_string()),
        Just("[FILE_UPLOAD: a.txt]\n".to_string()),
        Just("\n\n".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just("\"".to_string()),
        Just(r#"{"tool":"x","response":"ok"}"#.to_string()),
        "[a-z é🛡]{0,6}",
    ]
}

fn tool_block(payload: &str) -> String {
    format!("[MCP_TOOL_CALL]{}[/MCP_TOOL_CALL]", payload)
}

proptest! {
    #[test]
    fn test_round_trip_of_complete_transcripts(pieces in prop::collection::vec(piece_strategy(), 0..12)) {
        let mut text = String::new();
        let mut expected = String::new();
        let mut thoughts = Vec::new();
        for piece in &pieces {
            match piece {
                Piece::Plain(t) => {
                    text.push_str(t);
                    expected.push_str(t);
                }
                Piece::Tool(p) => {
                    text.push_str(&tool_block(p));
                    expected.push_str(&tool_block(p));
                }
                Piece::Thought(t) => {
                    text.push_str(&format!("[THOUGHT]{}[/THOUGHT]", t));
                    if !t.trim().is_empty() {
                        thoughts.push(t.trim().to_string());
                    }
                }
            }
        }

        let segments = segment(&text);
        let mut rebuilt = String::new();
        let mut reasoning = None;
        for s in &segments {
            match s {
                Segment::PlainText { text } => rebuilt.push_str(text),
                Segment::ToolInvocation { raw_payload } => rebuilt.push_str(&tool_block(raw_payload.as_str())),
                Segment::ReasoningTrace { text } => reasoning = Some(text.clone()),
                _ => {}
            }
        }

        prop_assert_eq!(rebuilt, expected);
        let expected_reasoning = (!thoughts.is_empty()).then(|| thoughts.join("\n\n"));
        prop_assert_eq!(reasoning, expected_reasoning);
    }

    #[test]
    fn test_streaming_prefixes_converge(text in adversarial_strategy()) {
        // Every prefix is a valid intermediate state; none may panic
        for (i, _) in text.char_indices() {
            let segments = segment(&text[..i]);
            for s in segments.iter().filter_map(|s| s.raw_payload()) {
                let _ = resolve(s.as_str());
            }
        }
        let first = segment(&text);
        let second = segment(&text);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_segment_shape_invariants(text in adversarial_strategy()) {
        let segments = segment(&text);

        let reasoning_positions: Vec<usize> = segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_reasoning())
            .map(|(i, _)| i)
            .collect();
        prop_assert!(reasoning_positions.is_empty() || reasoning_positions == vec![0]);

        for s in &segments {
            if let Some(t) = s.text() {
                prop_assert!(!t.is_empty(), "empty text segment in {:?}", segments);
            }
            if let Some(p) = s.raw_payload() {
                prop_assert!(resolve(p.as_str()).is_some(), "unresolvable payload emitted");
            }
        }
    }

    #[test]
    fn test_every_tagged_block_is_emitted_exactly_once(
        parts in prop::collection::vec(
            prop_oneof![
                nested_block_strategy().prop_map(|(text, payload)| (text, Some(payload))),
                noise_strategy().prop_map(|text| (text, None)),
            ],
            0..16,
        )
    ) {
        let mut text = String::new();
        let mut expected: Vec<String> = Vec::new();
        for (fragment, payload) in &parts {
            text.push_str(fragment);
            if let Some(payload) = payload {
                // Context 4 carries the block twice
                let copies = fragment.matches("[MCP_TOOL_CALL]").count();
                expected.extend(std::iter::repeat(payload.clone()).take(copies));
            }
        }

        let emitted: Vec<String> = segment(&text)
            .iter()
            .filter_map(|s| s.raw_payload())
            .map(|p| p.as_str().to_string())
            .collect();
        prop_assert_eq!(emitted, expected, "transcript: {:?}", text);
    }

    #[test]
    fn test_arbitrary_unicode_never_panics(text in "\\PC*") {
        let _ = segment(&text);
        let _ = resolve(&text);
    }
}
