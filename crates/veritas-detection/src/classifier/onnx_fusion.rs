//! ONNX Runtime two-input fusion model.
//!
//! Input order is `[graph_embedding: f32[1, D], image_embedding: f32[1, D]]`;
//! the first output holds a single sigmoid score.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tracing::info;
use veritas_core::errors::{ClassifierError, VeritasResult};
use veritas_core::traits::IFusionModel;

/// Fusion model backed by an `ort` session. Loaded once at startup.
pub struct OnnxFusionModel {
    session: Mutex<Session>,
    model_name: String,
}

// Safety: Session is Send but not Sync by default. The Mutex provides Sync.
unsafe impl Sync for OnnxFusionModel {}

impl OnnxFusionModel {
    /// Load the classifier from `model_path`.
    ///
    /// # Errors
    /// `ClassifierError::ModelLoadFailed` if the artifact is missing or corrupt.
    pub fn load(model_path: &str, intra_threads: usize) -> VeritasResult<Self> {
        let path = Path::new(model_path);
        let load_err = |reason: String| ClassifierError::ModelLoadFailed {
            path: model_path.to_string(),
            reason,
        };
        if !path.exists() {
            return Err(load_err("model file not found".to_string()).into());
        }

        let session = Session::builder()
            .map_err(|e| load_err(e.to_string()))?
            .with_intra_threads(intra_threads)
            .map_err(|e| load_err(e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e| load_err(e.to_string()))?;

        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("fusion-classifier")
            .to_string();

        info!(model = %model_name, "fusion classifier loaded");

        Ok(Self {
            session: Mutex::new(session),
            model_name,
        })
    }
}

impl IFusionModel for OnnxFusionModel {
    fn predict(&self, graph: &[f32], image: &[f32]) -> VeritasResult<f32> {
        let tensor = |data: &[f32]| {
            Tensor::from_array((vec![1i64, data.len() as i64], data.to_vec())).map_err(|e| {
                ClassifierError::InferenceFailed {
                    reason: format!("tensor creation error: {e}"),
                }
            })
        };
        let graph_tensor = tensor(graph)?;
        let image_tensor = tensor(image)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| ClassifierError::InferenceFailed {
                reason: format!("session lock poisoned: {e}"),
            })?;

        let outputs = session
            .run(ort::inputs![graph_tensor, image_tensor])
            .map_err(|e| ClassifierError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let (_name, output) =
            outputs
                .iter()
                .next()
                .ok_or_else(|| ClassifierError::InferenceFailed {
                    reason: "no output tensor".to_string(),
                })?;

        let (_shape, data) =
            output
                .try_extract_tensor::<f32>()
                .map_err(|e| ClassifierError::InferenceFailed {
                    reason: format!("tensor extraction failed: {e}"),
                })?;

        data.first()
            .copied()
            .ok_or_else(|| {
                ClassifierError::InferenceFailed {
                    reason: "empty output tensor".to_string(),
                }
                .into()
            })
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artifact_fails_fast() {
        let err = OnnxFusionModel::load("/nonexistent/fusion.onnx", 1)
            .err()
            .unwrap();
        assert!(err.to_string().contains("model file not found"));
    }
}
