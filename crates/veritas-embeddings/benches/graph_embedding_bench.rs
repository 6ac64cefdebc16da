use criterion::{criterion_group, criterion_main, Criterion};
use veritas_core::config::GraphEmbeddingConfig;
use veritas_core::models::{Entity, KnowledgeGraph, Relation};
use veritas_embeddings::GraphEmbedder;

fn sample_graph() -> KnowledgeGraph {
    KnowledgeGraph::new(
        vec![
            Entity::new("Jane Doe", "PERSON"),
            Entity::new("Acme Corp", "ORGANIZATION"),
            Entity::new("Springfield", "LOCATION"),
            Entity::new("Annual Meeting", "EVENT"),
        ],
        vec![
            Relation::new("Jane Doe", "Acme Corp", "works_for"),
            Relation::new("Acme Corp", "Springfield", "based_in"),
            Relation::new("Acme Corp", "Annual Meeting", "hosted"),
            Relation::new("Jane Doe", "Annual Meeting", "spoke_at"),
        ],
    )
}

fn bench_default_config(c: &mut Criterion) {
    let embedder = GraphEmbedder::new(
        GraphEmbeddingConfig {
            seed: Some(7),
            ..Default::default()
        },
        512,
    );
    let kg = sample_graph();

    c.bench_function("graph_embed_4_nodes_default", |b| b.iter(|| embedder.embed(&kg)));
}

fn bench_feature_fallback(c: &mut Criterion) {
    let embedder = GraphEmbedder::new(GraphEmbeddingConfig::default(), 512);
    let kg = KnowledgeGraph::new(vec![Entity::new("Acme Corp", "ORGANIZATION")], vec![]);

    c.bench_function("graph_embed_feature_fallback", |b| b.iter(|| embedder.embed(&kg)));
}

criterion_group!(benches, bench_default_config, bench_feature_fallback);
criterion_main!(benches);
