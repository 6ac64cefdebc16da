//! Prompt and grounding-query construction.

use veritas_core::constants::TRUSTED_SOURCES;
use veritas_core::models::SearchResult;

const NO_RESULTS: &str = "No web search results available.";

/// Claims prompt listing every uncached title, 1-based.
pub fn claims_prompt(titles: &[&str]) -> String {
    let claims = titles
        .iter()
        .enumerate()
        .map(|(i, title)| format!("{}. {title}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Verify news claims from: {sources}.\n\n{claims}\n\n\
         For each: REAL (verified ≥1 source), FAKE (contradicted), UNVERIFIABLE (not found).\n\
         JSON: {{\"results\":[{{\"article_index\":1,\"conclusion\":\"REAL|FAKE|UNVERIFIABLE\",\"answer\":\"reason\",\"citations\":[\"source\"]}}]}}",
        sources = TRUSTED_SOURCES.join(", "),
    )
}

/// Quoted title prefixes of the first `max_titles` titles, OR-joined.
pub fn grounding_query(titles: &[&str], max_titles: usize, prefix_chars: usize) -> String {
    titles
        .iter()
        .take(max_titles)
        .map(|title| format!("\"{}\"", truncate_chars(title, prefix_chars)))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// One line per search result, or a fixed notice when there are none.
pub fn web_context(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_RESULTS.to_string();
    }
    results
        .iter()
        .map(|r| {
            let source = if r.source.is_empty() { "Unknown" } else { r.source.as_str() };
            format!("- {} ({source}): {}", r.title, r.snippet)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Append the grounding block to `prompt`.
pub fn grounded(prompt: &str, context: &str, instruction: &str) -> String {
    format!(
        "{prompt}\n\nWEB SEARCH RESULTS FROM TRUSTED NEWS SOURCES (Google News RSS):\n{context}\n\n{instruction}"
    )
}

pub const VERIFY_INSTRUCTION: &str = "Use the above search results to verify each claim.";

pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_uses_three_quoted_prefixes() {
        let long = "x".repeat(80);
        let titles = ["first", long.as_str(), "third", "fourth"];
        let query = grounding_query(&titles, 3, 50);
        let parts: Vec<&str> = query.split(" OR ").collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "\"first\"");
        assert_eq!(parts[1].len(), 52);
        assert!(!query.contains("fourth"));
    }

    #[test]
    fn prefix_counts_characters_not_bytes() {
        let title = "é".repeat(60);
        let query = grounding_query(&[title.as_str()], 3, 50);
        assert_eq!(query.chars().count(), 52);
    }

    #[test]
    fn claims_are_numbered_from_one() {
        let prompt = claims_prompt(&["Alpha headline", "Beta headline"]);
        assert!(prompt.contains("1. Alpha headline\n2. Beta headline"));
        assert!(prompt.contains("Reuters"));
        assert!(prompt.contains("\"article_index\":1"));
    }

    #[test]
    fn empty_context_has_notice() {
        assert_eq!(web_context(&[]), NO_RESULTS);
    }

    #[test]
    fn context_lines_name_the_source() {
        let results = vec![SearchResult {
            title: "Rates hold".into(),
            snippet: "Bank keeps rates.".into(),
            link: "https://www.reuters.com/x".into(),
            source: "Reuters".into(),
        }];
        assert_eq!(web_context(&results), "- Rates hold (Reuters): Bank keeps rates.");
    }
}
