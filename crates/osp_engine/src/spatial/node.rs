//! Partition tree nodes

use std::collections::{HashMap, HashSet};

use crate::scene::Entity;
use super::volume::{Volume, OCTANT_COUNT};

slotmap::new_key_type! {
    /// Stable handle to a node in the partition arena
    pub struct NodeId;
}

/// Entity to primitive-index membership map
pub type Membership = HashMap<Entity, HashSet<usize>>;

/// Reference to one primitive in an entity's geometry buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveRef {
    /// Index into the entity's triangle buffer
    Triangle(usize),
    /// Index into the entity's sphere buffer
    Sphere(usize),
}

/// Single node in the partition hierarchy
///
/// A primitive straddling a boundary is registered in every node it touches,
/// so the same reference can appear under several siblings at once.
#[derive(Debug, Clone)]
pub struct PartitionNode {
    volume: Volume,
    depth: u32,
    children: [Option<NodeId>; OCTANT_COUNT],
    triangles: Membership,
    spheres: Membership,
}

impl PartitionNode {
    /// Create a new leaf node
    pub fn new(volume: Volume, depth: u32) -> Self {
        Self {
            volume,
            depth,
            children: [None; OCTANT_COUNT],
            triangles: HashMap::new(),
            spheres: HashMap::new(),
        }
    }

    /// Register a primitive; returns `false` if it was already registered
    pub fn add_geometry(&mut self, entity: Entity, primitive: PrimitiveRef) -> bool {
        match primitive {
            PrimitiveRef::Triangle(index) => self.triangles.entry(entity).or_default().insert(index),
            PrimitiveRef::Sphere(index) => self.spheres.entry(entity).or_default().insert(index),
        }
    }

    /// Drop a sphere membership; returns whether it was present
    ///
    /// Triangle memberships are static and have no removal.
    pub fn remove_sphere(&mut self, entity: Entity, index: usize) -> bool {
        let Some(indices) = self.spheres.get_mut(&entity) else {
            return false;
        };
        let removed = indices.remove(&index);
        if indices.is_empty() {
            self.spheres.remove(&entity);
        }
        removed
    }

    /// Whether a primitive is registered here
    pub fn contains(&self, entity: Entity, primitive: PrimitiveRef) -> bool {
        let (map, index) = match primitive {
            PrimitiveRef::Triangle(index) => (&self.triangles, index),
            PrimitiveRef::Sphere(index) => (&self.spheres, index),
        };
        map.get(&entity).is_some_and(|indices| indices.contains(&index))
    }

    /// Bounding volume
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// Depth in the tree (0 = root)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Child links in octant order; `None` where not subdivided
    pub fn children(&self) -> &[Option<NodeId>; OCTANT_COUNT] {
        &self.children
    }

    pub(crate) fn set_child(&mut self, octant: usize, child: NodeId) {
        self.children[octant] = Some(child);
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Triangle memberships
    pub fn triangles(&self) -> &Membership {
        &self.triangles
    }

    /// Sphere memberships
    pub fn spheres(&self) -> &Membership {
        &self.spheres
    }

    /// Number of triangle and sphere registrations at this node
    pub fn primitive_count(&self) -> usize {
        let triangles: usize = self.triangles.values().map(HashSet::len).sum();
        let spheres: usize = self.spheres.values().map(HashSet::len).sum();
        triangles + spheres
    }

    /// Every entity with at least one primitive here
    pub fn entities(&self) -> HashSet<Entity> {
        self.triangles.keys().chain(self.spheres.keys()).copied().collect()
    }

    /// Every registered primitive as `(entity, reference)` pairs
    pub fn primitives(&self) -> impl Iterator<Item = (Entity, PrimitiveRef)> + '_ {
        let triangles = self.triangles.iter().flat_map(|(&entity, indices)| {
            indices.iter().map(move |&index| (entity, PrimitiveRef::Triangle(index)))
        });
        let spheres = self.spheres.iter().flat_map(|(&entity, indices)| {
            indices.iter().map(move |&index| (entity, PrimitiveRef::Sphere(index)))
        });
        triangles.chain(spheres)
    }
}
