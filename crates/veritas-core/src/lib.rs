//! # veritas-core
//!
//! Foundation crate for the Veritas news-verification system.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::VeritasConfig;
pub use errors::{VeritasError, VeritasResult};
pub use models::{
    Article, Conclusion, Entity, EntityType, KnowledgeGraph, Prediction, Relation, Verdict,
    VerificationRecord,
};
