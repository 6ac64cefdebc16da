//! # veritas-detection
//!
//! Multi-modal fake-news detection: graph and image embeddings fused by a
//! pretrained two-input classifier into a [`Verdict`](veritas_core::Verdict).

pub mod classifier;
pub mod service;
pub mod status;
pub mod verdict;

pub use classifier::{FusionClassifier, OnnxFusionModel};
pub use service::DetectionService;
pub use verdict::derive_verdict;
