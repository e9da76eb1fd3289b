//! Spatial partitioning data structures
//!
//! Provides the octary space partition used as the broad-phase of collision
//! detection, along with the cube volumes it is built from and the
//! primitive-versus-cube predicates that assign geometry to them.

mod config;
mod intersection;
mod node;
mod osp;
mod volume;

#[cfg(test)]
mod tests;

pub use config::{OspConfig, OspError, UpdatePolicy};
pub use intersection::{
    sphere_overlaps_volume, triangle_overlaps_volume, triangle_overlaps_volume_exact,
    TriangleTest,
};
pub use node::{Membership, NodeId, PartitionNode, PrimitiveRef};
pub use osp::{OspStats, SpatialPartitionTree, UpdateReport};
pub use volume::{Volume, BOUNDARY_TOLERANCE, OCTANT_COUNT};
