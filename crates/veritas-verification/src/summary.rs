//! Trusted-source summaries with validated citations.
//!
//! Collaborator failures never reach the caller: they become a placeholder
//! summary with a truncated `error` field. Only a missing topic is an error.

use std::sync::Arc;

use serde_json::{Map, Value};
use veritas_core::config::SummaryConfig;
use veritas_core::constants::TRUSTED_SOURCES;
use veritas_core::errors::{VerificationError, VeritasResult};
use veritas_core::models::{NewsSummary, SearchResult, SummaryRequest};
use veritas_core::traits::{ILlmClient, INewsSearch};
use veritas_observability::summary_span;

use crate::batch::{parser, prompt};
use crate::citation::{validate_citations, LinkProbe};

pub const UNPARSEABLE_SUMMARY: &str = "Unable to generate summary at this time. Please try again.";
pub const FAILED_SUMMARY: &str =
    "Unable to generate summary due to an error. Please try again later.";
pub const MISSING_SUMMARY: &str = "Summary not available.";

const TOPIC_CHARS: usize = 200;
const SUMMARY_CHARS: usize = 1000;
const ERROR_CHARS: usize = 200;
const MIN_SUMMARY_CHARS: usize = 10;
/// Unparseable replies longer than this are used as the summary text.
const RAW_FALLBACK_MIN_CHARS: usize = 50;

const SUMMARY_INSTRUCTION: &str = "Use the above search results to write your summary and citations. \
If the search results do not match the topic or are not from trusted sources, \
STICK TO THE ORIGINAL ARTICLE CONTENT as per instructions.";

pub struct SummaryService {
    search: Arc<dyn INewsSearch>,
    llm: Arc<dyn ILlmClient>,
    probe: Arc<dyn LinkProbe>,
    config: SummaryConfig,
}

impl SummaryService {
    pub fn new(
        search: Arc<dyn INewsSearch>,
        llm: Arc<dyn ILlmClient>,
        probe: Arc<dyn LinkProbe>,
        config: SummaryConfig,
    ) -> Self {
        Self {
            search,
            llm,
            probe,
            config,
        }
    }

    /// Summarize `request.topic` from trusted coverage.
    ///
    /// # Errors
    /// `VerificationError::MissingField` when the topic is blank.
    pub fn summarize(&self, request: &SummaryRequest) -> VeritasResult<NewsSummary> {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return Err(VerificationError::MissingField {
                field: "topic".into(),
            }
            .into());
        }

        let span = summary_span!(prompt::truncate_chars(topic, 50));
        let _guard = span.enter();

        match self.try_summarize(topic, request) {
            Ok(summary) => Ok(summary),
            Err(e) => {
                let error = e.to_string();
                tracing::warn!(error = %error, "summary generation failed");
                Ok(NewsSummary {
                    topic: topic.to_string(),
                    summary: FAILED_SUMMARY.to_string(),
                    citations: Vec::new(),
                    error: Some(prompt::truncate_chars(&error, ERROR_CHARS)),
                })
            }
        }
    }

    fn try_summarize(&self, topic: &str, request: &SummaryRequest) -> VeritasResult<NewsSummary> {
        let results = self.grounding(topic);
        let grounded = prompt::grounded(
            &summary_prompt(topic, &request.description, &request.content),
            &prompt::web_context(&results),
            SUMMARY_INSTRUCTION,
        );
        let reply = self.llm.generate(&grounded, self.config.temperature)?;

        let Ok(fields) = serde_json::from_str::<Map<String, Value>>(parser::extract_json(&reply))
        else {
            return Ok(self.unparsed(topic, parser::strip_code_fences(&reply)));
        };

        let citations = match fields.get("citations") {
            Some(Value::Array(raw)) => validate_citations(
                raw,
                self.probe.as_ref(),
                self.config.max_citations_considered,
                self.config.max_valid_citations,
            ),
            _ => Vec::new(),
        };
        let summary = match fields.get("summary") {
            Some(Value::String(s)) if s.chars().count() >= MIN_SUMMARY_CHARS => {
                prompt::truncate_chars(s, SUMMARY_CHARS)
            }
            _ => MISSING_SUMMARY.to_string(),
        };
        let topic = match fields.get("topic") {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => topic.to_string(),
            Some(other) => other.to_string(),
        };

        Ok(NewsSummary {
            topic: prompt::truncate_chars(&topic, TOPIC_CHARS),
            summary,
            citations,
            error: None,
        })
    }

    /// A reply that is not JSON: long prose is still a usable summary.
    fn unparsed(&self, topic: &str, text: &str) -> NewsSummary {
        tracing::debug!(reply_chars = text.chars().count(), "summary reply was not JSON");
        let length = text.chars().count();
        let summary = if length > RAW_FALLBACK_MIN_CHARS {
            if length < SUMMARY_CHARS {
                text.to_string()
            } else {
                format!("{}...", prompt::truncate_chars(text, SUMMARY_CHARS - 3))
            }
        } else {
            UNPARSEABLE_SUMMARY.to_string()
        };
        NewsSummary {
            topic: topic.to_string(),
            summary,
            citations: Vec::new(),
            error: None,
        }
    }

    fn grounding(&self, topic: &str) -> Vec<SearchResult> {
        match self.search.search(topic, self.config.search_results) {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(search = %self.search.name(), error = %e, "summary search failed");
                Vec::new()
            }
        }
    }
}

fn summary_prompt(topic: &str, description: &str, content: &str) -> String {
    let original = if description.is_empty() && content.is_empty() {
        String::new()
    } else {
        format!("\n\nORIGINAL ARTICLE CONTENT:\nDescription: {description}\nContent: {content}")
    };
    format!(
        "Topic: {topic}\n\n\
         Search trusted news ({sources}). 150-word summary.\n\
         IMPORTANT: If you cannot find info from the trusted news sources above, provide a summary BASED ONLY ON THE ORIGINAL ARTICLE CONTENT provided below.\n\
         In that case, the first sentence MUST BE: \"Based on the original article source (no secondary verification available):\"\n\n\
         {original}\n\n\
         JSON FORMAT: {{\"topic\":\"title\",\"summary\":\"text\",\"citations\":[{{\"source_name\":\"name\",\"title\":\"title\",\"url\":\"url\"}}]}}",
        sources = TRUSTED_SOURCES.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_original_content_only_when_present() {
        let with = summary_prompt("Rates", "Bank held rates", "");
        assert!(with.contains("ORIGINAL ARTICLE CONTENT:\nDescription: Bank held rates"));
        let without = summary_prompt("Rates", "", "");
        assert!(!without.contains("ORIGINAL ARTICLE CONTENT"));
        assert!(without.contains("Based on the original article source"));
        assert!(without.contains("\"source_name\":\"name\""));
    }
}
