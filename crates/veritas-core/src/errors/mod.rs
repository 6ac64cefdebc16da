mod classifier_error;
mod config_error;
mod detection_error;
mod embedding_error;
mod verification_error;

pub use classifier_error::ClassifierError;
pub use config_error::ConfigError;
pub use detection_error::DetectionError;
pub use embedding_error::EmbeddingError;
pub use verification_error::VerificationError;

/// Top-level error for the Veritas system.
#[derive(Debug, thiserror::Error)]
pub enum VeritasError {
    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("detection error: {0}")]
    DetectionError(#[from] DetectionError),

    #[error("classifier error: {0}")]
    ClassifierError(#[from] ClassifierError),

    #[error("verification error: {0}")]
    VerificationError(#[from] VerificationError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type VeritasResult<T> = Result<T, VeritasError>;
