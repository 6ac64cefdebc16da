//! Fusion classifier: `(graph, image)` embeddings to P(FAKE).

mod onnx_fusion;

use std::sync::Arc;

use veritas_core::errors::{ClassifierError, VeritasResult};
use veritas_core::traits::IFusionModel;

pub use onnx_fusion::OnnxFusionModel;

/// Validating wrapper around a loaded fusion model.
#[derive(Clone)]
pub struct FusionClassifier {
    model: Arc<dyn IFusionModel>,
    dimensions: usize,
}

impl FusionClassifier {
    pub fn new(model: Arc<dyn IFusionModel>, dimensions: usize) -> Self {
        Self { model, dimensions }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Score one article. The result is a probability in `[0, 1]`.
    ///
    /// # Errors
    /// `ClassifierError::InferenceFailed` for wrongly sized inputs or a model
    /// failure, `ClassifierError::InvalidOutput` for anything outside `[0, 1]`.
    pub fn score(&self, graph: &[f32], image: &[f32]) -> VeritasResult<f64> {
        for (input, len) in [("graph", graph.len()), ("image", image.len())] {
            if len != self.dimensions {
                return Err(ClassifierError::InferenceFailed {
                    reason: format!(
                        "{input} input has {len} values, expected {}",
                        self.dimensions
                    ),
                }
                .into());
            }
        }

        let p = self.model.predict(graph, image)?;
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ClassifierError::InvalidOutput { value: p }.into());
        }
        Ok(f64::from(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_core::VeritasError;

    struct Constant(f32);

    impl IFusionModel for Constant {
        fn predict(&self, _: &[f32], _: &[f32]) -> VeritasResult<f32> {
            Ok(self.0)
        }
        fn name(&self) -> &str {
            "constant"
        }
    }

    fn classifier(p: f32) -> FusionClassifier {
        FusionClassifier::new(Arc::new(Constant(p)), 4)
    }

    #[test]
    fn passes_valid_probability_through() {
        let p = classifier(0.25).score(&[0.0; 4], &[0.0; 4]).unwrap();
        assert!((p - 0.25).abs() < 1e-9);
    }

    #[test]
    fn rejects_wrong_input_width() {
        let err = classifier(0.5).score(&[0.0; 3], &[0.0; 4]).unwrap_err();
        assert!(err.to_string().contains("graph input has 3 values"));
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        for bad in [1.5, -0.1, f32::NAN] {
            let err = classifier(bad).score(&[0.0; 4], &[0.0; 4]).unwrap_err();
            assert!(matches!(
                err,
                VeritasError::ClassifierError(ClassifierError::InvalidOutput { .. })
            ));
        }
    }
}
