/// Fusion classifier errors.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier load failed: {path}: {reason}")]
    ModelLoadFailed { path: String, reason: String },

    #[error("classifier inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("classifier produced invalid output {value}: expected a probability in [0, 1]")]
    InvalidOutput { value: f32 },
}
