//! Model readiness reporting.

use veritas_core::models::{ModelState, ModelStatus};

use crate::service::DetectionService;

/// Status of a fully loaded detection pipeline.
pub fn ready(service: &DetectionService) -> ModelStatus {
    ModelStatus {
        status: ModelState::Ready,
        model_loaded: true,
        classifier: Some(service.classifier().model_name().to_string()),
        image_encoder: Some(service.image_embedder().encoder_name().to_string()),
        graph_embedder: service.graph_embedder().name().to_string(),
        embedding_dim: service.classifier().dimensions(),
        error: None,
    }
}

/// Status when startup could not load a model.
pub fn not_loaded(error: impl Into<String>, embedding_dim: usize) -> ModelStatus {
    ModelStatus {
        status: ModelState::NotLoaded,
        model_loaded: false,
        classifier: None,
        image_encoder: None,
        graph_embedder: "node2vec".to_string(),
        embedding_dim,
        error: Some(error.into()),
    }
}
