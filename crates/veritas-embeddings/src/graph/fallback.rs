//! Count-feature fallback used when random-walk embedding is unavailable.

use veritas_core::constants::FEATURE_FALLBACK_SLOTS;
use veritas_core::models::{EntityType, KnowledgeGraph};

/// `[entities, relations, PERSON, ORGANIZATION, LOCATION, EVENT, DATE]`,
/// zero-padded (or truncated) to `dimensions`.
pub fn feature_vector(kg: &KnowledgeGraph, dimensions: usize) -> Vec<f32> {
    let count_of = |wanted: EntityType| {
        kg.entities
            .iter()
            .filter(|e| e.entity_type == wanted)
            .count() as f32
    };

    let features: [f32; FEATURE_FALLBACK_SLOTS] = [
        kg.entities.len() as f32,
        kg.relations.len() as f32,
        count_of(EntityType::Person),
        count_of(EntityType::Organization),
        count_of(EntityType::Location),
        count_of(EntityType::Event),
        count_of(EntityType::Date),
    ];

    let mut vector = vec![0.0f32; dimensions];
    for (slot, value) in vector.iter_mut().zip(features) {
        *slot = value;
    }
    vector
}
