//! Gemini `generateContent` REST client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use veritas_core::config::LlmConfig;
use veritas_core::errors::{VerificationError, VeritasResult};
use veritas_core::traits::ILlmClient;

use crate::http::{HttpClient, HttpClientConfig};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

pub struct GeminiClient {
    http: HttpClient,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig) -> Self {
        let http = HttpClient::new(HttpClientConfig {
            max_retries: config.max_retries,
            ..HttpClientConfig::with_timeout(Duration::from_secs(config.timeout_secs))
        });
        Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl ILlmClient for GeminiClient {
    fn generate(&self, prompt: &str, temperature: f32) -> VeritasResult<String> {
        let Some(api_key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            return Err(VerificationError::LlmFailed {
                reason: "GEMINI_API_KEY is not configured".into(),
            }
            .into());
        };

        let request = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature },
        };
        let response: GenerateResponse = self
            .http
            .post_json(&self.url(), &[("x-goog-api-key", api_key)], &request)
            .map_err(|e| VerificationError::LlmFailed {
                reason: e.to_string(),
            })?;

        response.text().ok_or_else(|| {
            VerificationError::LlmFailed {
                reason: "response contained no text".into(),
            }
            .into()
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_rest_shape() {
        let request = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: "hi" }],
            }],
            generation_config: GenerationConfig { temperature: 0.1 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        let t = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((t - 0.1).abs() < 1e-6);
    }

    #[test]
    fn response_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn blocked_response_has_no_text() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn missing_key_fails_without_network() {
        let client = GeminiClient::new(&LlmConfig::default());
        assert!(!client.is_configured());
        let err = client.generate("prompt", 0.1).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn url_targets_model() {
        let client = GeminiClient::new(&LlmConfig {
            endpoint: "https://example.test/v1beta/".into(),
            model: "m".into(),
            ..LlmConfig::default()
        });
        assert_eq!(client.url(), "https://example.test/v1beta/models/m:generateContent");
    }
}
