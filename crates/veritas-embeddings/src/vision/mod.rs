//! Image embedder: URL to an L2-normalized CLIP vector, or the zero vector.

pub mod clip_encoder;
pub mod preprocess;

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use veritas_core::config::ImageEmbeddingConfig;
use veritas_core::errors::{EmbeddingError, VeritasError, VeritasResult};
use veritas_core::models::{ImageEmbedding, ImageEmbeddingSource};
use veritas_core::traits::IImageEncoder;

pub use clip_encoder::ClipImageEncoder;

/// Fetches, decodes and encodes article images.
pub struct ImageEmbedder {
    encoder: Arc<dyn IImageEncoder>,
    config: ImageEmbeddingConfig,
    dimensions: usize,
}

impl ImageEmbedder {
    pub fn new(
        encoder: Arc<dyn IImageEncoder>,
        config: ImageEmbeddingConfig,
        dimensions: usize,
    ) -> Self {
        Self {
            encoder,
            config,
            dimensions,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn encoder_name(&self) -> &str {
        self.encoder.name()
    }

    /// Embed the image at `image_url`. Never fails.
    pub fn embed(&self, image_url: &str) -> ImageEmbedding {
        let _span =
            veritas_observability::embedding_span!(self.encoder.name(), self.dimensions).entered();
        let result = self
            .fetch(image_url)
            .and_then(|bytes| self.try_embed_bytes(&bytes));
        self.settle(result)
    }

    /// Embed already-fetched image bytes. Never fails.
    pub fn embed_bytes(&self, bytes: &[u8]) -> ImageEmbedding {
        self.settle(self.try_embed_bytes(bytes))
    }

    /// Decode, preprocess, encode and normalize.
    pub fn try_embed_bytes(&self, bytes: &[u8]) -> VeritasResult<Vec<f32>> {
        let img = image::load_from_memory(bytes).map_err(|e| EmbeddingError::DecodeFailed {
            reason: e.to_string(),
        })?;

        let side = self.encoder.input_side();
        let pixels = preprocess::preprocess(&img, side);
        let raw = self.encoder.encode(&pixels, side)?;
        if raw.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: raw.len(),
            }
            .into());
        }
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(EmbeddingError::NonFinite.into());
        }
        Ok(preprocess::l2_normalize(raw))
    }

    fn fetch(&self, image_url: &str) -> VeritasResult<Vec<u8>> {
        let fetch_err = |reason: String| -> VeritasError {
            EmbeddingError::FetchFailed {
                url: image_url.to_string(),
                reason,
            }
            .into()
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.config.fetch_timeout_secs))
            .user_agent(self.config.user_agent.as_str())
            .build()
            .map_err(|e| fetch_err(e.to_string()))?;

        let resp = client
            .get(image_url)
            .send()
            .map_err(|e| fetch_err(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {status}")));
        }

        let limit = self.config.max_image_bytes;
        if let Some(length) = resp.content_length().filter(|&len| len > limit) {
            return Err(fetch_err(format!("image is {length} bytes, limit is {limit}")));
        }
        // Content-Length may be absent or wrong; never read past the limit.
        let mut bytes = Vec::new();
        resp.take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|e| fetch_err(e.to_string()))?;
        if bytes.len() as u64 > limit {
            return Err(fetch_err(format!("image exceeds {limit} bytes")));
        }
        debug!(url = %image_url, bytes = bytes.len(), "image fetched");
        Ok(bytes)
    }

    fn settle(&self, result: VeritasResult<Vec<f32>>) -> ImageEmbedding {
        match result {
            Ok(vector) => ImageEmbedding {
                vector,
                source: ImageEmbeddingSource::Encoder,
                failure: None,
            },
            Err(e) => {
                warn!(error = %e, "no visual evidence, using zero vector");
                ImageEmbedding::no_visual_evidence(self.dimensions, e.to_string())
            }
        }
    }
}
