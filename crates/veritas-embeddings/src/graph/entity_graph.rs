//! Undirected simple graph over entity names.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use veritas_core::models::{EntityType, KnowledgeGraph};

/// Node payload: the entity name plus its declared type, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityNode {
    pub name: String,
    /// `None` for names introduced only by a relation.
    pub entity_type: Option<EntityType>,
}

/// petgraph graph with O(1) name lookup.
pub struct EntityGraph {
    pub graph: UnGraph<EntityNode, ()>,
    pub node_index: HashMap<String, NodeIndex>,
}

impl EntityGraph {
    /// Build from a knowledge graph.
    ///
    /// Empty names are skipped, as are relations missing either endpoint.
    /// Repeated pairs share one edge and self-relations add no edge.
    pub fn build(kg: &KnowledgeGraph) -> Self {
        let mut this = Self {
            graph: UnGraph::default(),
            node_index: HashMap::new(),
        };

        for entity in kg.entities.iter().filter(|e| !e.name.is_empty()) {
            let idx = this.ensure_node(&entity.name);
            // First declaration wins the type.
            if this.graph[idx].entity_type.is_none() {
                this.graph[idx].entity_type = Some(entity.entity_type.clone());
            }
        }

        for relation in &kg.relations {
            if relation.source.is_empty() || relation.target.is_empty() {
                continue;
            }
            let a = this.ensure_node(&relation.source);
            let b = this.ensure_node(&relation.target);
            if a != b {
                this.graph.update_edge(a, b, ());
            }
        }

        this
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(EntityNode {
            name: name.to_string(),
            entity_type: None,
        });
        self.node_index.insert(name.to_string(), idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Sorted neighbor lists indexed by `NodeIndex::index()`.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        self.graph
            .node_indices()
            .map(|idx| {
                let mut neighbors: Vec<usize> =
                    self.graph.neighbors(idx).map(|n| n.index()).collect();
                neighbors.sort_unstable();
                neighbors
            })
            .collect()
    }
}
