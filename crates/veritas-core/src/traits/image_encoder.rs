use crate::errors::VeritasResult;

/// Pretrained vision encoder behind the image embedder.
pub trait IImageEncoder: Send + Sync {
    /// Encode a preprocessed `3 x side x side` NCHW pixel buffer.
    fn encode(&self, pixels: &[f32], side: usize) -> VeritasResult<Vec<f32>>;

    /// Square input side length the encoder expects.
    fn input_side(&self) -> usize;

    /// The dimensionality of vectors produced by this encoder.
    fn dimensions(&self) -> usize;

    /// Human-readable encoder name.
    fn name(&self) -> &str;
}
