//! Span definitions per operation.

/// Create a detection span.
#[macro_export]
macro_rules! detection_span {
    ($entities:expr, $relations:expr) => {
        tracing::info_span!(
            "veritas.detection",
            entities = $entities,
            relations = $relations
        )
    };
}

/// Create a verification span.
#[macro_export]
macro_rules! verification_span {
    ($batch_size:expr) => {
        tracing::info_span!("veritas.verification", batch_size = $batch_size)
    };
}

/// Create an embedding span.
#[macro_export]
macro_rules! embedding_span {
    ($embedder:expr, $dimension:expr) => {
        tracing::info_span!("veritas.embedding", embedder = %$embedder, dimension = $dimension)
    };
}

/// Create a summary span.
#[macro_export]
macro_rules! summary_span {
    ($topic:expr) => {
        tracing::info_span!("veritas.summary", topic = %$topic)
    };
}

/// Create a knowledge-graph chat span.
#[macro_export]
macro_rules! chat_span {
    ($entities:expr, $relations:expr) => {
        tracing::info_span!(
            "veritas.chat",
            entities = $entities,
            relations = $relations
        )
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const DETECTION: &str = "veritas.detection";
    pub const VERIFICATION: &str = "veritas.verification";
    pub const EMBEDDING: &str = "veritas.embedding";
    pub const SUMMARY: &str = "veritas.summary";
    pub const CHAT: &str = "veritas.chat";
}
