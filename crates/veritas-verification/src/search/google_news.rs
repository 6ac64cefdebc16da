//! Google News RSS search. Free, keyless, and good enough for grounding.

use std::time::Duration;

use veritas_core::config::SearchConfig;
use veritas_core::errors::{VerificationError, VeritasResult};
use veritas_core::models::{clean_text, SearchResult};
use veritas_core::traits::INewsSearch;

use crate::http::{HttpClient, HttpClientConfig};

/// Google News appends " - Publisher" to every item title.
const PUBLISHER_SEPARATOR: &str = " - ";

pub struct GoogleNewsSearch {
    http: HttpClient,
    config: SearchConfig,
}

impl GoogleNewsSearch {
    pub fn new(config: SearchConfig) -> Self {
        let http = HttpClient::new(HttpClientConfig::with_timeout(Duration::from_secs(
            config.timeout_secs,
        )));
        Self { http, config }
    }

    /// Search URL for `query` with the configured locale.
    pub fn search_url(&self, query: &str) -> VeritasResult<String> {
        let language = self.config.language.as_str();
        let country = self.config.country.as_str();
        let short_language = language.split('-').next().unwrap_or(language);
        let ceid = format!("{country}:{short_language}");

        url::Url::parse_with_params(
            &self.config.endpoint,
            &[
                ("q", query),
                ("hl", language),
                ("gl", country),
                ("ceid", ceid.as_str()),
            ],
        )
        .map(String::from)
        .map_err(|e| {
            VerificationError::SearchFailed {
                reason: format!("invalid search endpoint {}: {e}", self.config.endpoint),
            }
            .into()
        })
    }
}

impl INewsSearch for GoogleNewsSearch {
    fn search(&self, query: &str, max_results: usize) -> VeritasResult<Vec<SearchResult>> {
        let url = self.search_url(query)?;
        let preview: String = query.chars().take(60).collect();
        tracing::debug!(query = %preview, max_results, "google news search");

        let body = self
            .http
            .get_bytes(&url)
            .map_err(|e| VerificationError::SearchFailed {
                reason: e.to_string(),
            })?;
        let results = parse_feed(&body, max_results, self.config.snippet_chars)?;
        tracing::debug!(found = results.len(), "google news search complete");
        Ok(results)
    }

    fn name(&self) -> &str {
        "google-news-rss"
    }
}

/// Parse an RSS/Atom document into at most `max_results` search results.
pub fn parse_feed(
    bytes: &[u8],
    max_results: usize,
    snippet_chars: usize,
) -> VeritasResult<Vec<SearchResult>> {
    let feed = feed_rs::parser::parse(bytes).map_err(|e| VerificationError::SearchFailed {
        reason: format!("failed to parse RSS feed: {e}"),
    })?;

    Ok(feed
        .entries
        .into_iter()
        .take(max_results)
        .map(|entry| {
            let title = entry
                .title
                .map(|t| clean_text(&t.content))
                .unwrap_or_default();
            let snippet = entry
                .summary
                .map(|s| clean_text(&s.content))
                .unwrap_or_default()
                .chars()
                .take(snippet_chars)
                .collect();
            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default();
            let source = publisher(&title).unwrap_or("Unknown").to_string();
            SearchResult {
                title,
                snippet,
                link,
                source,
            }
        })
        .collect())
}

fn publisher(title: &str) -> Option<&str> {
    title
        .rsplit_once(PUBLISHER_SEPARATOR)
        .map(|(_, name)| name.trim())
        .filter(|name| !name.is_empty())
}
