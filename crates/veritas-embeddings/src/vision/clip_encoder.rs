//! ONNX Runtime CLIP image tower.
//!
//! Expects an export whose single input is `pixel_values: f32[1, 3, S, S]` and
//! whose first output is the projected image embedding `f32[1, D]`.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;
use veritas_core::errors::{EmbeddingError, VeritasResult};
use veritas_core::traits::IImageEncoder;

/// CLIP image encoder backed by an `ort` session.
pub struct ClipImageEncoder {
    /// `Session::run` takes `&mut self`, so the session sits behind a Mutex.
    session: Mutex<Session>,
    input_side: usize,
    dimensions: usize,
    model_name: String,
}

// Safety: Session is Send but not Sync by default. The Mutex provides Sync.
unsafe impl Sync for ClipImageEncoder {}

impl ClipImageEncoder {
    /// Load the image tower from `model_path`.
    ///
    /// # Errors
    /// `EmbeddingError::ModelLoadFailed` if the file is missing or invalid.
    pub fn load(
        model_path: &str,
        input_side: usize,
        dimensions: usize,
        intra_threads: usize,
    ) -> VeritasResult<Self> {
        let path = Path::new(model_path);
        let load_err = |reason: String| EmbeddingError::ModelLoadFailed {
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
            .unwrap_or("clip-image")
            .to_string();

        debug!(model = %model_name, dims = dimensions, side = input_side, "CLIP image tower loaded");

        Ok(Self {
            session: Mutex::new(session),
            input_side,
            dimensions,
            model_name,
        })
    }
}

impl IImageEncoder for ClipImageEncoder {
    fn encode(&self, pixels: &[f32], side: usize) -> VeritasResult<Vec<f32>> {
        let expected = 3 * side * side;
        if pixels.len() != expected {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: pixels.len(),
            }
            .into());
        }

        let input = Tensor::from_array((vec![1i64, 3, side as i64, side as i64], pixels.to_vec()))
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("tensor creation error: {e}"),
            })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("session lock poisoned: {e}"),
            })?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let (_name, output) =
            outputs
                .iter()
                .next()
                .ok_or_else(|| EmbeddingError::InferenceFailed {
                    reason: "no output tensor".to_string(),
                })?;

        let (_shape, data) =
            output
                .try_extract_tensor::<f32>()
                .map_err(|e| EmbeddingError::InferenceFailed {
                    reason: format!("tensor extraction failed: {e}"),
                })?;

        Ok(data.to_vec())
    }

    fn input_side(&self) -> usize {
        self.input_side
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_a_load_error() {
        let err = ClipImageEncoder::load("/nonexistent/clip.onnx", 224, 512, 1)
            .err()
            .unwrap();
        assert!(err.to_string().contains("/nonexistent/clip.onnx"));
    }
}
