//! Graph embedder: knowledge graph to a fixed-width vector.
//!
//! Main path: node2vec walks, skip-gram training, mean of node vectors.
//! Graphs under two nodes or a failed fit use [`fallback::feature_vector`];
//! a graph with no entities and no relations yields the zero vector.

pub mod entity_graph;
pub mod fallback;
pub mod skipgram;
pub mod walks;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};
use veritas_core::config::GraphEmbeddingConfig;
use veritas_core::errors::EmbeddingError;
use veritas_core::models::{GraphEmbedding, GraphEmbeddingSource, KnowledgeGraph};

use self::entity_graph::EntityGraph;
use self::skipgram::SkipGramParams;
use self::walks::WalkParams;

/// Random-walk graph embedder. Stateless between calls.
#[derive(Debug, Clone)]
pub struct GraphEmbedder {
    config: GraphEmbeddingConfig,
    dimensions: usize,
}

impl GraphEmbedder {
    pub fn new(config: GraphEmbeddingConfig, dimensions: usize) -> Self {
        Self { config, dimensions }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn name(&self) -> &str {
        "node2vec"
    }

    /// Embed a knowledge graph. Never fails.
    pub fn embed(&self, kg: &KnowledgeGraph) -> GraphEmbedding {
        let _span = veritas_observability::embedding_span!(self.name(), self.dimensions).entered();

        if kg.is_empty() {
            return GraphEmbedding {
                vector: vec![0.0; self.dimensions],
                source: GraphEmbeddingSource::NoEvidence,
                failure: None,
            };
        }

        match self.try_embed(kg) {
            Ok(vector) => GraphEmbedding {
                vector,
                source: GraphEmbeddingSource::RandomWalk,
                failure: None,
            },
            Err(e) => {
                match e {
                    EmbeddingError::GraphTooSmall { .. } => {
                        debug!(error = %e, "using feature fallback")
                    }
                    _ => warn!(error = %e, "graph embedding failed, using feature fallback"),
                }
                GraphEmbedding {
                    vector: fallback::feature_vector(kg, self.dimensions),
                    source: GraphEmbeddingSource::FeatureFallback,
                    failure: Some(e.to_string()),
                }
            }
        }
    }

    /// The random-walk path only, without the fallback.
    pub fn try_embed(&self, kg: &KnowledgeGraph) -> Result<Vec<f32>, EmbeddingError> {
        let graph = EntityGraph::build(kg);
        if graph.node_count() < 2 {
            return Err(EmbeddingError::GraphTooSmall {
                nodes: graph.node_count(),
            });
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let adjacency = graph.adjacency();
        let corpus = walks::generate_walks(&adjacency, &self.walk_params(), &mut rng);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            walks = corpus.len(),
            "walk corpus sampled"
        );

        let vectors = skipgram::train(&corpus, &self.skipgram_params(), &mut rng)?;

        let mut mean = vec![0.0f32; self.dimensions];
        let mut members = 0usize;
        for idx in graph.graph.node_indices() {
            if let Some(v) = vectors.get(idx.index()) {
                for (m, x) in mean.iter_mut().zip(v) {
                    *m += x;
                }
                members += 1;
            }
        }
        if members == 0 {
            return Err(EmbeddingError::EmptyCorpus);
        }
        for m in &mut mean {
            *m /= members as f32;
        }

        if mean.iter().any(|v| !v.is_finite()) {
            return Err(EmbeddingError::NonFinite);
        }
        Ok(mean)
    }

    fn walk_params(&self) -> WalkParams {
        WalkParams {
            walk_length: self.config.walk_length,
            walks_per_node: self.config.walks_per_node,
            return_param: self.config.return_param,
            in_out_param: self.config.in_out_param,
        }
    }

    fn skipgram_params(&self) -> SkipGramParams {
        SkipGramParams {
            dimensions: self.dimensions,
            window: self.config.window,
            epochs: self.config.epochs,
            min_count: self.config.min_count,
            negative_samples: self.config.negative_samples,
            learning_rate: self.config.learning_rate,
            min_learning_rate: self.config.min_learning_rate,
            subsample: self.config.subsample,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_core::models::{Entity, Relation};

    fn quick(seed: u64) -> GraphEmbedder {
        GraphEmbedder::new(
            GraphEmbeddingConfig {
                walks_per_node: 5,
                epochs: 2,
                seed: Some(seed),
                ..Default::default()
            },
            64,
        )
    }

    #[test]
    fn empty_graph_is_zero_vector() {
        let out = quick(1).embed(&KnowledgeGraph::default());
        assert_eq!(out.source, GraphEmbeddingSource::NoEvidence);
        assert_eq!(out.vector, vec![0.0; 64]);
    }

    #[test]
    fn single_node_reports_graph_too_small() {
        let kg = KnowledgeGraph::new(vec![Entity::new("Solo", "PERSON")], vec![]);
        assert!(matches!(
            quick(1).try_embed(&kg),
            Err(EmbeddingError::GraphTooSmall { nodes: 1 })
        ));
        let out = quick(1).embed(&kg);
        assert_eq!(out.source, GraphEmbeddingSource::FeatureFallback);
        assert!(out.failure.is_some());
    }

    #[test]
    fn seeded_main_path_is_reproducible() {
        let kg = KnowledgeGraph::new(
            vec![Entity::new("A", "PERSON"), Entity::new("B", "LOCATION")],
            vec![Relation::new("A", "B", "lives_in"), Relation::new("B", "C", "near")],
        );
        let a = quick(42).embed(&kg);
        let b = quick(42).embed(&kg);
        assert_eq!(a.source, GraphEmbeddingSource::RandomWalk);
        assert_eq!(a.vector, b.vector);
    }

    #[test]
    fn disconnected_nodes_without_edges_fall_back() {
        // Two nodes, no edges: every walk is dropped, the corpus is empty.
        let kg = KnowledgeGraph::new(
            vec![Entity::new("A", "PERSON"), Entity::new("B", "PERSON")],
            vec![],
        );
        let out = quick(5).embed(&kg);
        assert_eq!(out.source, GraphEmbeddingSource::FeatureFallback);
        assert_eq!(&out.vector[..3], &[2.0, 0.0, 2.0]);
    }
}
