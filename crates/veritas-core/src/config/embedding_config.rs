use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Output width of both embedders.
    pub dimensions: usize,
    pub graph: GraphEmbeddingConfig,
    pub image: ImageEmbeddingConfig,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            graph: GraphEmbeddingConfig::default(),
            image: ImageEmbeddingConfig::default(),
        }
    }
}

/// Random-walk sampling and skip-gram training parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphEmbeddingConfig {
    /// Nodes per walk, including the start node.
    pub walk_length: usize,
    /// Walks started from every node.
    pub walks_per_node: usize,
    /// Maximum skip-gram context distance.
    pub window: usize,
    /// Passes over the walk corpus.
    pub epochs: usize,
    /// Nodes seen fewer times than this are left out of the vocabulary.
    pub min_count: usize,
    /// Negative samples per positive pair.
    pub negative_samples: usize,
    pub learning_rate: f32,
    pub min_learning_rate: f32,
    /// node2vec return parameter `p`.
    pub return_param: f64,
    /// node2vec in-out parameter `q`.
    pub in_out_param: f64,
    /// Frequent-node downsampling threshold; 0 keeps every token.
    pub subsample: f64,
    /// Seed for walk sampling and training. `None` draws from OS entropy,
    /// so repeated calls on the same graph differ.
    pub seed: Option<u64>,
}

impl Default for GraphEmbeddingConfig {
    fn default() -> Self {
        Self {
            walk_length: defaults::DEFAULT_WALK_LENGTH,
            walks_per_node: defaults::DEFAULT_WALKS_PER_NODE,
            window: defaults::DEFAULT_WINDOW,
            epochs: defaults::DEFAULT_EPOCHS,
            min_count: defaults::DEFAULT_MIN_COUNT,
            negative_samples: defaults::DEFAULT_NEGATIVE_SAMPLES,
            learning_rate: defaults::DEFAULT_LEARNING_RATE,
            min_learning_rate: defaults::DEFAULT_MIN_LEARNING_RATE,
            return_param: defaults::DEFAULT_RETURN_PARAM,
            in_out_param: defaults::DEFAULT_IN_OUT_PARAM,
            subsample: defaults::DEFAULT_SUBSAMPLE,
            seed: None,
        }
    }
}

/// Image fetch and encoder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageEmbeddingConfig {
    /// Path to the ONNX export of the CLIP image tower.
    pub model_path: String,
    pub fetch_timeout_secs: u64,
    /// Larger image downloads are abandoned.
    pub max_image_bytes: u64,
    pub user_agent: String,
    /// Square input side expected by the encoder.
    pub input_side: usize,
    pub intra_threads: usize,
}

impl Default for ImageEmbeddingConfig {
    fn default() -> Self {
        Self {
            model_path: defaults::DEFAULT_CLIP_MODEL_PATH.to_string(),
            fetch_timeout_secs: defaults::DEFAULT_IMAGE_FETCH_TIMEOUT_SECS,
            max_image_bytes: defaults::DEFAULT_MAX_IMAGE_BYTES,
            user_agent: crate::constants::BROWSER_USER_AGENT.to_string(),
            input_side: defaults::DEFAULT_IMAGE_INPUT_SIDE,
            intra_threads: defaults::DEFAULT_INTRA_THREADS,
        }
    }
}
