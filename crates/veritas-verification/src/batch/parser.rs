//! Strict parsing of the LLM batch reply.
//!
//! The reply is untrusted text: it may carry prose around the JSON, code
//! fences, or fewer/more results than requested. Anything that does not fit
//! `{"results":[{article_index, conclusion, answer, citations}]}` with a known
//! conclusion is rejected so the caller can retry.

use serde::Deserialize;
use serde_json::Value;
use veritas_core::errors::{VerificationError, VeritasResult};
use veritas_core::models::{Conclusion, VerificationRecord};

pub const INCOMPLETE_ANSWER: &str = "Incomplete verification";

#[derive(Debug, Deserialize)]
struct RawBatch {
    results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(default)]
    article_index: Option<i64>,
    conclusion: String,
    #[serde(default)]
    answer: String,
    #[serde(default)]
    citations: Vec<Value>,
}

/// Remove a leading ```` ```json ```` / ```` ``` ```` marker and a trailing
/// ```` ``` ````.
pub fn strip_code_fences(text: &str) -> &str {
    let mut out = text.trim();
    if let Some(rest) = out.strip_prefix("```json") {
        out = rest;
    } else if let Some(rest) = out.strip_prefix("```") {
        out = rest;
    }
    if let Some(rest) = out.strip_suffix("```") {
        out = rest;
    }
    out.trim()
}

/// The JSON object inside `text`: fences stripped, and if prose remains,
/// the span from the first `{` to the last `}`.
pub fn extract_json(text: &str) -> &str {
    let stripped = strip_code_fences(text);
    if stripped.starts_with('{') {
        return stripped;
    }
    match (stripped.find('{'), stripped.rfind('}')) {
        (Some(start), Some(end)) if start < end => &stripped[start..=end],
        _ => stripped,
    }
}

/// Parse a batch reply into exactly `expected` records, in article order.
///
/// Results are placed by `article_index` when every result carries a
/// distinct index in `1..=expected`, positionally otherwise. Missing slots
/// become UNVERIFIABLE "Incomplete verification"; surplus results are dropped.
pub fn parse_batch(text: &str, expected: usize) -> VeritasResult<Vec<VerificationRecord>> {
    let raw: RawBatch =
        serde_json::from_str(extract_json(text)).map_err(|e| VerificationError::MalformedResponse {
            reason: e.to_string(),
        })?;
    if raw.results.is_empty() {
        return Err(VerificationError::EmptyResults.into());
    }

    let mut parsed = Vec::with_capacity(raw.results.len());
    for result in raw.results {
        let conclusion: Conclusion = result
            .conclusion
            .parse()
            .map_err(|reason| VerificationError::MalformedResponse { reason })?;
        let record =
            VerificationRecord::new(conclusion, result.answer, citation_strings(&result.citations));
        parsed.push((result.article_index, record));
    }

    let mut slots: Vec<Option<VerificationRecord>> = vec![None; expected];
    match slot_indices(&parsed, expected) {
        Some(indices) => {
            for (slot, (_, record)) in indices.into_iter().zip(parsed) {
                slots[slot] = Some(record);
            }
        }
        None => {
            for (slot, (_, record)) in slots.iter_mut().zip(parsed) {
                *slot = Some(record);
            }
        }
    }

    Ok(slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| VerificationRecord::unverifiable(INCOMPLETE_ANSWER)))
        .collect())
}

/// Zero-based slots when every index is present, in range, and distinct.
fn slot_indices(parsed: &[(Option<i64>, VerificationRecord)], expected: usize) -> Option<Vec<usize>> {
    let mut taken = vec![false; expected];
    let mut indices = Vec::with_capacity(parsed.len());
    for (index, _) in parsed {
        let slot = usize::try_from((*index)?).ok()?.checked_sub(1)?;
        if slot >= expected || taken[slot] {
            return None;
        }
        taken[slot] = true;
        indices.push(slot);
    }
    Some(indices)
}

/// String citations verbatim; object citations contribute their `url`.
fn citation_strings(raw: &[Value]) -> Vec<String> {
    raw.iter()
        .filter_map(|c| match c {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Object(map) => map.get("url").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn extracts_object_from_prose() {
        let text = "Sure, here you go:\n```json\n{\"results\": []}\n```\nHope that helps.";
        assert_eq!(extract_json(text), "{\"results\": []}");
    }

    #[test]
    fn pads_short_results() {
        let text = r#"{"results":[{"article_index":1,"conclusion":"REAL","answer":"ok"}]}"#;
        let records = parse_batch(text, 3).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].conclusion, Conclusion::Real);
        assert_eq!(records[1].conclusion, Conclusion::Unverifiable);
        assert_eq!(records[2].answer, INCOMPLETE_ANSWER);
    }

    #[test]
    fn truncates_long_results() {
        let text = r#"{"results":[
            {"conclusion":"REAL"},{"conclusion":"FAKE"},{"conclusion":"UNVERIFIABLE"}
        ]}"#;
        let records = parse_batch(text, 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].conclusion, Conclusion::Fake);
        assert!(!records[1].verified);
    }

    #[test]
    fn places_results_by_index() {
        let text = r#"{"results":[
            {"article_index":2,"conclusion":"FAKE","answer":"second"},
            {"article_index":1,"conclusion":"REAL","answer":"first"}
        ]}"#;
        let records = parse_batch(text, 2).unwrap();
        assert_eq!(records[0].answer, "first");
        assert_eq!(records[1].answer, "second");
    }

    #[test]
    fn duplicate_indices_fall_back_to_positions() {
        let text = r#"{"results":[
            {"article_index":1,"conclusion":"FAKE","answer":"a"},
            {"article_index":1,"conclusion":"REAL","answer":"b"}
        ]}"#;
        let records = parse_batch(text, 2).unwrap();
        assert_eq!(records[0].answer, "a");
        assert_eq!(records[1].answer, "b");
    }

    #[test]
    fn out_of_range_index_falls_back_to_positions() {
        let text = r#"{"results":[{"article_index":7,"conclusion":"REAL","answer":"a"}]}"#;
        let records = parse_batch(text, 2).unwrap();
        assert_eq!(records[0].answer, "a");
        assert_eq!(records[1].answer, INCOMPLETE_ANSWER);
    }

    #[test]
    fn unknown_conclusion_is_malformed() {
        let text = r#"{"results":[{"conclusion":"MAYBE"}]}"#;
        let err = parse_batch(text, 1).unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn empty_results_are_rejected() {
        let err = parse_batch(r#"{"results":[]}"#, 2).unwrap_err();
        assert!(err.to_string().contains("no results"));
    }

    #[test]
    fn conclusion_case_is_normalized() {
        let records = parse_batch(r#"{"results":[{"conclusion":"real"}]}"#, 1).unwrap();
        assert_eq!(records[0].conclusion, Conclusion::Real);
    }

    #[test]
    fn citations_keep_strings_and_object_urls() {
        let text = r#"{"results":[{"conclusion":"REAL","citations":[
            "Reuters", {"url":"https://bbc.com/x"}, 3, ""
        ]}]}"#;
        let records = parse_batch(text, 1).unwrap();
        assert_eq!(records[0].citations, vec!["Reuters", "https://bbc.com/x"]);
    }
}
