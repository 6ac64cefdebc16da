use crate::errors::VeritasResult;

/// Two-input model scoring `(graph, image)` embedding pairs.
pub trait IFusionModel: Send + Sync {
    /// Probability that the article is FAKE.
    fn predict(&self, graph: &[f32], image: &[f32]) -> VeritasResult<f32>;

    fn name(&self) -> &str;
}
