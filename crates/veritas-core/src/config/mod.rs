pub mod defaults;
mod detection_config;
mod embedding_config;
mod observability_config;
mod verification_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use detection_config::DetectionConfig;
pub use embedding_config::{EmbeddingConfig, GraphEmbeddingConfig, ImageEmbeddingConfig};
pub use observability_config::ObservabilityConfig;
pub use verification_config::{
    ChatConfig, LlmConfig, SearchConfig, SummaryConfig, VerificationConfig,
};

use crate::errors::ConfigError;

/// Top-level configuration aggregating every subsystem section.
///
/// Resolution order, lowest to highest priority: compiled defaults, TOML,
/// environment variables. `validate()` runs last.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VeritasConfig {
    pub embedding: EmbeddingConfig,
    pub detection: DetectionConfig,
    pub verification: VerificationConfig,
    pub observability: ObservabilityConfig,
}

impl VeritasConfig {
    /// Parse configuration from a TOML string. Missing sections keep defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Parse configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Full resolution: optional file, process environment, validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (injectable for tests).
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = non_empty("VERITAS_MODEL_PATH") {
            self.detection.model_path = path;
        }
        if let Some(path) = non_empty("VERITAS_CLIP_MODEL_PATH") {
            self.embedding.image.model_path = path;
        }
        if let Some(key) = non_empty("GEMINI_API_KEY") {
            self.verification.llm.api_key = Some(key);
        }
        if let Some(model) = non_empty("GEMINI_MODEL") {
            self.verification.llm.model = model;
        }
        if let Some(level) = non_empty("VERITAS_LOG") {
            self.observability.log_level = level;
        }
    }

    /// Reject values that would make a subsystem misbehave at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |field: &str, message: &str| {
            Err(ConfigError::ValidationFailed {
                field: field.to_string(),
                message: message.to_string(),
            })
        };

        if self.embedding.dimensions == 0 {
            return fail("embedding.dimensions", "must be greater than 0");
        }
        let graph = &self.embedding.graph;
        if graph.walk_length < 2 {
            return fail("embedding.graph.walk_length", "must be at least 2");
        }
        if graph.walks_per_node == 0 {
            return fail("embedding.graph.walks_per_node", "must be greater than 0");
        }
        if graph.window == 0 {
            return fail("embedding.graph.window", "must be greater than 0");
        }
        if graph.epochs == 0 {
            return fail("embedding.graph.epochs", "must be greater than 0");
        }
        if graph.min_count == 0 {
            return fail("embedding.graph.min_count", "must be at least 1");
        }
        if graph.return_param <= 0.0 || graph.in_out_param <= 0.0 {
            return fail(
                "embedding.graph.return_param/in_out_param",
                "must be positive",
            );
        }
        if !(graph.subsample >= 0.0) {
            return fail("embedding.graph.subsample", "must not be negative");
        }
        if !(graph.learning_rate > 0.0 && graph.min_learning_rate <= graph.learning_rate) {
            return fail(
                "embedding.graph.learning_rate",
                "must be positive and not below min_learning_rate",
            );
        }
        if self.embedding.image.max_image_bytes == 0 {
            return fail("embedding.image.max_image_bytes", "must be greater than 0");
        }
        if self.embedding.image.input_side == 0 {
            return fail("embedding.image.input_side", "must be greater than 0");
        }

        let verification = &self.verification;
        if verification.max_retries == 0 {
            return fail("verification.max_retries", "must be at least 1");
        }
        if !(0.0..=2.0).contains(&verification.temperature) {
            return fail("verification.temperature", "must be between 0.0 and 2.0");
        }
        if !(0.0..=2.0).contains(&verification.summary.temperature) {
            return fail(
                "verification.summary.temperature",
                "must be between 0.0 and 2.0",
            );
        }
        if !(0.0..=2.0).contains(&verification.chat.temperature) {
            return fail("verification.chat.temperature", "must be between 0.0 and 2.0");
        }
        if verification.initial_backoff_ms > verification.max_backoff_ms {
            return fail(
                "verification.initial_backoff_ms",
                "must not exceed max_backoff_ms",
            );
        }
        Ok(())
    }
}
