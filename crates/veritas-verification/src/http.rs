//! Blocking HTTP client with retry, exponential backoff, timeout, and gzip.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use veritas_core::constants::BROWSER_USER_AGENT;

use crate::backoff::Backoff;

/// Configuration for the HTTP transport layer.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Retries after the first attempt, for transport errors and 5xx only.
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry).
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

impl HttpClientConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// Non-retryable 4xx.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("all {retries} retries exhausted: {last_err}")]
    Exhausted { retries: u32, last_err: String },

    #[error("invalid response body: {0}")]
    Body(String),
}

/// HTTP transport shared by the news-search and LLM collaborators.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// GET a resource and return the raw body.
    pub fn get_bytes(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let resp = self.send_with_retry(|client| client.get(url))?;
        resp.bytes()
            .map(|b| b.to_vec())
            .map_err(|e| HttpError::Body(e.to_string()))
    }

    /// POST a JSON payload and decode a JSON response.
    pub fn post_json<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        payload: &Req,
    ) -> Result<Resp, HttpError> {
        let resp = self.send_with_retry(|client| {
            let mut req = client.post(url).json(payload);
            for (name, value) in headers {
                req = req.header(*name, *value);
            }
            req
        })?;
        resp.json::<Resp>()
            .map_err(|e| HttpError::Body(format!("deserialization failed: {e}")))
    }

    /// Unified retry loop for any request shape.
    fn send_with_retry(
        &self,
        build: impl Fn(&reqwest::blocking::Client) -> reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::Response, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .user_agent(self.config.user_agent.as_str())
            .gzip(true)
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        let mut backoff = Backoff::new(self.config.initial_backoff, self.config.max_backoff);
        let mut last_err = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = backoff.next_delay();
                tracing::debug!(
                    "http: retry attempt {}/{} after {:?}",
                    attempt,
                    self.config.max_retries,
                    delay
                );
                std::thread::sleep(delay);
            }

            match build(&client).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return Ok(resp);
                    }
                    if status.is_client_error() {
                        let body = resp.text().unwrap_or_default();
                        return Err(HttpError::Status {
                            status: status.as_u16(),
                            body: body.chars().take(200).collect(),
                        });
                    }
                    last_err = format!("HTTP {status}");
                }
                Err(e) => {
                    last_err = e.to_string();
                }
            }
        }

        Err(HttpError::Exhausted {
            retries: self.config.max_retries,
            last_err,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> HttpClientConfig {
        HttpClientConfig {
            timeout: Duration::from_millis(300),
            max_retries: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            ..HttpClientConfig::default()
        }
    }

    #[test]
    fn unreachable_host_exhausts_retries() {
        let client = HttpClient::new(fast_config());
        let err = client.get_bytes("http://127.0.0.1:9/feed").unwrap_err();
        match err {
            HttpError::Exhausted { retries, .. } => assert_eq!(retries, 1),
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[test]
    fn malformed_url_is_not_a_success() {
        let client = HttpClient::new(fast_config());
        assert!(client.get_bytes("not a url").is_err());
    }
}
