//! # veritas-embeddings
//!
//! Fixed-width embeddings for the two fusion inputs.
//!
//! - [`GraphEmbedder`]: entity/relation graph to a mean node vector via
//!   node2vec walks and a skip-gram model, with a count-feature fallback.
//! - [`ImageEmbedder`]: image URL to an L2-normalized CLIP image-tower vector,
//!   or the zero vector when no visual evidence can be obtained.
//!
//! Both embedders are total: failures never cross their boundary.

pub mod graph;
pub mod vision;

pub use graph::GraphEmbedder;
pub use vision::{ClipImageEncoder, ImageEmbedder};
