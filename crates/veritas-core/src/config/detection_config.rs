use serde::{Deserialize, Serialize};

use super::defaults;

/// Fusion classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Path to the ONNX export of the two-input fusion model.
    pub model_path: String,
    pub intra_threads: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            model_path: defaults::DEFAULT_FUSION_MODEL_PATH.to_string(),
            intra_threads: defaults::DEFAULT_INTRA_THREADS,
        }
    }
}
