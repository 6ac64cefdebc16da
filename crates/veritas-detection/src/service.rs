//! Detection orchestration: embed both modalities, fuse, derive the verdict.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;

use veritas_core::errors::{DetectionError, VeritasResult};
use veritas_core::models::{
    DegradationEvent, Entity, GraphEmbedding, GraphEmbeddingSource, ImageEmbedding,
    KnowledgeGraph, Relation, Verdict,
};
use veritas_embeddings::{GraphEmbedder, ImageEmbedder};
use veritas_observability::tracing_setup::events;
use veritas_observability::{DegradationTracker, TrackedDegradation};

use crate::classifier::FusionClassifier;
use crate::verdict::derive_verdict;

pub mod stages {
    pub const GRAPH_EMBEDDING: &str = "graph_embedding";
    pub const IMAGE_EMBEDDING: &str = "image_embedding";
    pub const FUSION: &str = "fusion";
}

/// Constructed once at startup and shared across requests.
pub struct DetectionService {
    graph_embedder: GraphEmbedder,
    image_embedder: ImageEmbedder,
    classifier: FusionClassifier,
    degradations: Mutex<DegradationTracker>,
}

impl DetectionService {
    pub fn new(
        graph_embedder: GraphEmbedder,
        image_embedder: ImageEmbedder,
        classifier: FusionClassifier,
    ) -> Self {
        Self {
            graph_embedder,
            image_embedder,
            classifier,
            degradations: Mutex::new(DegradationTracker::new()),
        }
    }

    pub fn graph_embedder(&self) -> &GraphEmbedder {
        &self.graph_embedder
    }

    pub fn image_embedder(&self) -> &ImageEmbedder {
        &self.image_embedder
    }

    pub fn classifier(&self) -> &FusionClassifier {
        &self.classifier
    }

    /// Classify one article.
    ///
    /// # Errors
    /// `DetectionError::MissingField` when `image_url`, `entities` or
    /// `relations` is empty; `DetectionError::StageFailed` when a sub-step fails.
    pub fn predict(
        &self,
        image_url: &str,
        entities: &[Entity],
        relations: &[Relation],
    ) -> VeritasResult<Verdict> {
        if image_url.trim().is_empty() {
            return Err(missing("image_url"));
        }
        if entities.is_empty() {
            return Err(missing("entities"));
        }
        if relations.is_empty() {
            return Err(missing("relations"));
        }
        let kg = KnowledgeGraph::new(entities.to_vec(), relations.to_vec());
        self.predict_graph(image_url, &kg)
    }

    /// Classify with a prebuilt graph. Performs no request validation.
    pub fn predict_graph(&self, image_url: &str, kg: &KnowledgeGraph) -> VeritasResult<Verdict> {
        let _span =
            veritas_observability::detection_span!(kg.entities.len(), kg.relations.len())
                .entered();

        let (graph, image) = rayon::join(
            || guarded(stages::GRAPH_EMBEDDING, || self.graph_embedder.embed(kg)),
            || guarded(stages::IMAGE_EMBEDDING, || self.image_embedder.embed(image_url)),
        );
        let graph = graph?;
        let image = image?;
        self.track(&graph, &image);

        let p = guarded(stages::FUSION, || {
            self.classifier.score(&graph.vector, &image.vector)
        })?
        .map_err(|e| DetectionError::StageFailed {
            stage: stages::FUSION.to_string(),
            reason: e.to_string(),
        })?;

        let verdict = derive_verdict(p);
        events::verdict_issued(
            &verdict.prediction.to_string(),
            verdict.confidence,
            graph.source != GraphEmbeddingSource::RandomWalk,
            image.is_zero(),
        );
        Ok(verdict)
    }

    /// Snapshot of recorded embedding degradations.
    pub fn degradations(&self) -> Vec<TrackedDegradation> {
        self.degradations
            .lock()
            .map(|t| t.events().to_vec())
            .unwrap_or_default()
    }

    fn track(&self, graph: &GraphEmbedding, image: &ImageEmbedding) {
        let Ok(mut tracker) = self.degradations.lock() else {
            return;
        };
        match (&graph.source, &graph.failure) {
            (GraphEmbeddingSource::FeatureFallback, Some(failure)) => tracker.record(
                DegradationEvent::now(stages::GRAPH_EMBEDDING, failure, "feature_vector"),
            ),
            (GraphEmbeddingSource::RandomWalk, _) => {
                tracker.mark_recovered(stages::GRAPH_EMBEDDING)
            }
            _ => {}
        }
        match &image.failure {
            Some(failure) => tracker.record(DegradationEvent::now(
                stages::IMAGE_EMBEDDING,
                failure,
                "zero_vector",
            )),
            None => tracker.mark_recovered(stages::IMAGE_EMBEDDING),
        }
    }
}

fn missing(field: &str) -> veritas_core::VeritasError {
    DetectionError::MissingField {
        field: field.to_string(),
    }
    .into()
}

/// Run one stage, turning a panic into `StageFailed`.
fn guarded<T>(stage: &str, f: impl FnOnce() -> T) -> Result<T, DetectionError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panicked".to_string());
        DetectionError::StageFailed {
            stage: stage.to_string(),
            reason,
        }
    })
}
