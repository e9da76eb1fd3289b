//! Physics module for collision detection
//!
//! Holds the world-space collision primitives and the broad-phase helpers
//! that turn the space partition's leaves into candidate pairs. Narrow-phase
//! tests and collision response live outside this crate.

pub mod broad_phase;
pub mod collision;

pub use broad_phase::{candidate_pairs, CollisionPair};
pub use collision::{BoundingSphere, Triangle};
