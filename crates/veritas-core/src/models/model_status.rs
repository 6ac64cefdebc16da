use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelState {
    Ready,
    NotLoaded,
}

/// Readiness report for the detection pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub status: ModelState,
    pub model_loaded: bool,
    pub classifier: Option<String>,
    pub image_encoder: Option<String>,
    pub graph_embedder: String,
    pub embedding_dim: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
