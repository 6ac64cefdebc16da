/// Request-level detection errors. Surfaced to the caller, never swallowed.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("classifier model not loaded: {reason}")]
    ModelNotLoaded { reason: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("detection failed at {stage}: {reason}")]
    StageFailed { stage: String, reason: String },
}
