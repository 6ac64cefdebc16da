//! Citation validation for trusted-source summaries.

use std::time::Duration;

use serde_json::Value;
use veritas_core::constants::BROWSER_USER_AGENT;
use veritas_core::models::Citation;

/// Final statuses accepted as a live link (after redirects).
const ACCEPTED_STATUSES: [u16; 5] = [200, 301, 302, 307, 308];

const SOURCE_NAME_CHARS: usize = 100;
const TITLE_CHARS: usize = 200;

/// Outcome of probing one citation URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Status(u16),
    /// No answer within the probe timeout.
    TimedOut,
    Unreachable,
}

impl LinkStatus {
    /// Slow servers get the benefit of the doubt.
    pub fn is_acceptable(self) -> bool {
        match self {
            Self::Status(code) => ACCEPTED_STATUSES.contains(&code),
            Self::TimedOut => true,
            Self::Unreachable => false,
        }
    }
}

/// Checks whether a citation URL resolves.
pub trait LinkProbe: Send + Sync {
    fn probe(&self, url: &str) -> LinkStatus;
}

impl<F> LinkProbe for F
where
    F: Fn(&str) -> LinkStatus + Send + Sync,
{
    fn probe(&self, url: &str) -> LinkStatus {
        self(url)
    }
}

/// HEAD probe following redirects.
#[derive(Debug, Clone)]
pub struct HttpLinkProbe {
    timeout: Duration,
}

impl HttpLinkProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl LinkProbe for HttpLinkProbe {
    fn probe(&self, url: &str) -> LinkStatus {
        let client = match reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::debug!(error = %e, "citation probe client build failed");
                return LinkStatus::Unreachable;
            }
        };
        match client.head(url).send() {
            Ok(resp) => LinkStatus::Status(resp.status().as_u16()),
            Err(e) if e.is_timeout() => {
                tracing::debug!(url = %url, "citation probe timed out");
                LinkStatus::TimedOut
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "citation probe failed");
                LinkStatus::Unreachable
            }
        }
    }
}

/// Keep the citations whose URL is well formed and reachable.
///
/// Only the first `max_considered` entries are looked at; validation stops
/// once `max_valid` citations are kept. Non-object entries and URLs without
/// an http(s) scheme are skipped without probing.
pub fn validate_citations(
    raw: &[Value],
    probe: &dyn LinkProbe,
    max_considered: usize,
    max_valid: usize,
) -> Vec<Citation> {
    let mut valid = Vec::new();
    for entry in raw.iter().take(max_considered) {
        if valid.len() >= max_valid {
            break;
        }
        let Value::Object(fields) = entry else {
            continue;
        };
        let Some(url) = fields.get("url").and_then(Value::as_str) else {
            continue;
        };
        if !is_web_url(url) {
            tracing::debug!(url = %url, "skipping malformed citation url");
            continue;
        }
        if !probe.probe(url).is_acceptable() {
            continue;
        }
        valid.push(Citation {
            source_name: text_field(fields.get("source_name"), "Unknown", SOURCE_NAME_CHARS),
            title: text_field(fields.get("title"), "", TITLE_CHARS),
            url: url.to_string(),
        });
    }
    valid
}

fn is_web_url(candidate: &str) -> bool {
    url::Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
        .unwrap_or(false)
}

/// Strings verbatim, other JSON values rendered, missing/null as `default`.
fn text_field(value: Option<&Value>, default: &str, max_chars: usize) -> String {
    let text = match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    text.chars().take(max_chars).collect()
}
