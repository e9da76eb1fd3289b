//! # OSP Engine
//!
//! Broad-phase collision detection built on an octary space partition.
//!
//! ## Features
//!
//! - **Octary Space Partition**: Nested cubic subspaces over triangle and sphere geometry
//! - **Incremental Updates**: Per-tick sphere membership maintenance for moving entities
//! - **Boundary-Inclusive Predicates**: Triangle-vs-cube and sphere-vs-cube overlap tests
//! - **Configurable**: Thresholds, depth guards and update policy from TOML or RON files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use osp_engine::prelude::*;
//!
//! fn main() -> Result<(), OspError> {
//!     let mut tree = SpatialPartitionTree::with_params(2000.0, 10)?;
//!
//!     let ground = Body::new(
//!         Entity::new(0),
//!         Geometry::from_triangles(vec![Triangle::new(
//!             Vec3::new(-10.0, 0.0, -10.0),
//!             Vec3::new(10.0, 0.0, -10.0),
//!             Vec3::new(0.0, 0.0, 10.0),
//!         )]),
//!         KinematicState::at_rest(Vec3::zeros()),
//!     );
//!     let mut bodies = vec![ground];
//!
//!     tree.generate_osp(&bodies);
//!
//!     // Each tick: advance kinematics first, then refresh the partition
//!     for body in &mut bodies {
//!         body.advance(1.0 / 60.0);
//!     }
//!     tree.update_osp(&bodies);
//!
//!     for leaf in tree.leaves() {
//!         println!("{:?}: {} primitives", leaf.volume(), leaf.primitive_count());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod scene;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::math::Vec3,
        physics::{
            broad_phase::{candidate_pairs, CollisionPair},
            collision::{BoundingSphere, Triangle},
        },
        scene::{Body, Collidable, Entity, Geometry, KinematicState},
        spatial::{
            NodeId, OspConfig, OspError, OspStats, PartitionNode, PrimitiveRef,
            SpatialPartitionTree, TriangleTest, UpdatePolicy, UpdateReport, Volume,
        },
    };
}
