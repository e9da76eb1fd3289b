//! Broad-phase candidate pairs from the space partition
//!
//! Two entities are a candidate pair when they share a leaf. Pairs where
//! neither entity contributes a sphere to that leaf are skipped: static
//! triangle geometry never collides with other static triangle geometry.
//! The narrow-phase decides which candidates actually touch.

use std::collections::HashSet;

use crate::scene::Entity;
use crate::spatial::{PartitionNode, SpatialPartitionTree};

/// Collision pair representing two entities that may be colliding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollisionPair {
    /// Entity with the smaller id
    pub entity_a: Entity,
    /// Entity with the larger id
    pub entity_b: Entity,
}

impl CollisionPair {
    /// Create a new collision pair (always stores smaller entity ID first for consistency)
    pub fn new(entity_a: Entity, entity_b: Entity) -> Self {
        if entity_a.id() < entity_b.id() {
            Self { entity_a, entity_b }
        } else {
            Self { entity_a: entity_b, entity_b: entity_a }
        }
    }
}

/// Candidate pairs sharing a single leaf
pub fn leaf_pairs(leaf: &PartitionNode) -> Vec<CollisionPair> {
    let mut entities: Vec<Entity> = leaf.entities().into_iter().collect();
    entities.sort_unstable();

    let mut pairs = Vec::new();
    for (i, &a) in entities.iter().enumerate() {
        for &b in &entities[i + 1..] {
            if leaf.spheres().contains_key(&a) || leaf.spheres().contains_key(&b) {
                pairs.push(CollisionPair::new(a, b));
            }
        }
    }
    pairs
}

/// Deduplicated, sorted candidate pairs over every leaf of the tree
pub fn candidate_pairs(tree: &SpatialPartitionTree) -> Vec<CollisionPair> {
    let unique: HashSet<CollisionPair> = tree
        .leaves()
        .into_iter()
        .flat_map(leaf_pairs)
        .collect();

    let mut pairs: Vec<_> = unique.into_iter().collect();
    pairs.sort_unstable();
    pairs
}
