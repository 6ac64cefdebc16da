//! Property tests for the batch reply parser.

use proptest::prelude::*;
use veritas_core::models::Conclusion;
use veritas_verification::batch::parser::{parse_batch, INCOMPLETE_ANSWER};

fn conclusion() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("REAL"), Just("FAKE"), Just("UNVERIFIABLE")]
}

fn reply(conclusions: &[&str], indexed: bool, fenced: bool) -> String {
    let results: Vec<serde_json::Value> = conclusions
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if indexed {
                serde_json::json!({"article_index": i + 1, "conclusion": c, "answer": "a"})
            } else {
                serde_json::json!({"conclusion": c, "answer": "a"})
            }
        })
        .collect();
    let body = serde_json::json!({ "results": results }).to_string();
    if fenced {
        format!("```json\n{body}\n```")
    } else {
        body
    }
}

proptest! {
    #[test]
    fn arbitrary_text_never_panics(text in ".{0,400}", expected in 0usize..20) {
        let _ = parse_batch(&text, expected);
    }

    #[test]
    fn output_always_matches_batch_size(
        conclusions in prop::collection::vec(conclusion(), 1..12),
        expected in 0usize..12,
        indexed in any::<bool>(),
        fenced in any::<bool>(),
    ) {
        let records = parse_batch(&reply(&conclusions, indexed, fenced), expected).unwrap();
        prop_assert_eq!(records.len(), expected);
        for (i, record) in records.iter().enumerate() {
            if i < conclusions.len() {
                prop_assert_eq!(record.conclusion, conclusions[i].parse::<Conclusion>().unwrap());
            } else {
                prop_assert_eq!(record.conclusion, Conclusion::Unverifiable);
                prop_assert_eq!(record.answer.as_str(), INCOMPLETE_ANSWER);
            }
            prop_assert_eq!(record.verified, record.conclusion != Conclusion::Fake);
        }
    }
}
