/// Embedding subsystem errors.
///
/// These never cross the embedder boundary: the graph and image embedders
/// convert every variant into a sentinel vector before returning.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("model load failed: {path}: {reason}")]
    ModelLoadFailed { path: String, reason: String },

    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("graph too small: {nodes} node(s)")]
    GraphTooSmall { nodes: usize },

    #[error("walk corpus is empty")]
    EmptyCorpus,

    #[error("embedding contains non-finite values")]
    NonFinite,

    #[error("image fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("image decode failed: {reason}")]
    DecodeFailed { reason: String },
}
