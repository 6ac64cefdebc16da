use serde::{Deserialize, Serialize};

use super::defaults;

/// Batch verification and summary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Total LLM attempts per batch before failing open.
    pub max_retries: u32,
    /// Snippets requested from the grounding search.
    pub search_results: usize,
    /// Uncached titles OR-joined into the grounding query.
    pub grounding_titles: usize,
    /// Characters kept from each title in the grounding query.
    pub title_prefix_chars: usize,
    pub temperature: f32,
    /// FAKE articles reported back in `fake_news_detected`.
    pub fake_sample_limit: usize,
    /// Backoff before the second attempt; doubles per attempt.
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// How long a caller waits on another caller's in-flight verification.
    pub single_flight_wait_secs: u64,
    pub summary: SummaryConfig,
    pub chat: ChatConfig,
    pub llm: LlmConfig,
    pub search: SearchConfig,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            search_results: defaults::DEFAULT_SEARCH_RESULTS,
            grounding_titles: defaults::DEFAULT_GROUNDING_TITLES,
            title_prefix_chars: defaults::DEFAULT_TITLE_PREFIX_CHARS,
            temperature: defaults::DEFAULT_VERIFICATION_TEMPERATURE,
            fake_sample_limit: defaults::DEFAULT_FAKE_SAMPLE_LIMIT,
            initial_backoff_ms: defaults::DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: defaults::DEFAULT_MAX_BACKOFF_MS,
            single_flight_wait_secs: defaults::DEFAULT_SINGLE_FLIGHT_WAIT_SECS,
            summary: SummaryConfig::default(),
            chat: ChatConfig::default(),
            llm: LlmConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

/// Trusted-source summary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub temperature: f32,
    pub search_results: usize,
    pub citation_timeout_secs: u64,
    pub max_citations_considered: usize,
    pub max_valid_citations: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            temperature: defaults::DEFAULT_SUMMARY_TEMPERATURE,
            search_results: defaults::DEFAULT_SUMMARY_SEARCH_RESULTS,
            citation_timeout_secs: defaults::DEFAULT_CITATION_TIMEOUT_SECS,
            max_citations_considered: defaults::DEFAULT_MAX_CITATIONS_CONSIDERED,
            max_valid_citations: defaults::DEFAULT_MAX_VALID_CITATIONS,
        }
    }
}

/// Question answering over an article's knowledge graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub temperature: f32,
    /// Entities listed in the prompt context.
    pub max_entities: usize,
    /// Relations listed in the prompt context.
    pub max_relations: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            temperature: defaults::DEFAULT_CHAT_TEMPERATURE,
            max_entities: defaults::DEFAULT_CHAT_MAX_ENTITIES,
            max_relations: defaults::DEFAULT_CHAT_MAX_RELATIONS,
        }
    }
}

/// LLM collaborator configuration (Gemini REST API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub endpoint: String,
    /// Never serialized back out; normally supplied via `GEMINI_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Transport-level retries (connection errors, 5xx) per request.
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_LLM_MODEL.to_string(),
            endpoint: defaults::DEFAULT_LLM_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: defaults::DEFAULT_LLM_TIMEOUT_SECS,
            max_retries: defaults::DEFAULT_LLM_MAX_RETRIES,
        }
    }
}

/// Grounding search collaborator configuration (Google News RSS).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub language: String,
    pub country: String,
    pub snippet_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_SEARCH_ENDPOINT.to_string(),
            timeout_secs: defaults::DEFAULT_SEARCH_TIMEOUT_SECS,
            language: defaults::DEFAULT_SEARCH_LANGUAGE.to_string(),
            country: defaults::DEFAULT_SEARCH_COUNTRY.to_string(),
            snippet_chars: defaults::DEFAULT_SNIPPET_CHARS,
        }
    }
}
