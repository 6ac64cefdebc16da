use serde::{Deserialize, Serialize};

/// Which path produced a graph embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphEmbeddingSource {
    /// Mean of trained node vectors.
    RandomWalk,
    /// Hand-built count features, zero-padded.
    FeatureFallback,
    /// No entities and no relations.
    NoEvidence,
}

/// Fixed-width graph embedding plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEmbedding {
    pub vector: Vec<f32>,
    pub source: GraphEmbeddingSource,
    /// Why the main path was not used, when it was attempted and failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl GraphEmbedding {
    pub fn is_fallback(&self) -> bool {
        self.source != GraphEmbeddingSource::RandomWalk
    }
}

/// Which path produced an image embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageEmbeddingSource {
    Encoder,
    /// The zero vector: fetch, decode, or inference failed.
    NoVisualEvidence,
}

/// Fixed-width, L2-normalized image embedding, or the zero vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEmbedding {
    pub vector: Vec<f32>,
    pub source: ImageEmbeddingSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl ImageEmbedding {
    pub fn zero(dimensions: usize) -> Self {
        Self {
            vector: vec![0.0; dimensions],
            source: ImageEmbeddingSource::NoVisualEvidence,
            failure: None,
        }
    }

    /// The zero vector, annotated with what went wrong.
    pub fn no_visual_evidence(dimensions: usize, failure: impl Into<String>) -> Self {
        Self {
            failure: Some(failure.into()),
            ..Self::zero(dimensions)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.vector.iter().all(|v| *v == 0.0)
    }
}
