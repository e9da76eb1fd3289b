//! Collision geometry
//!
//! # Module Organization
//!
//! - [`primitives`] - Basic geometric primitives (spheres, triangles)
//!
//! Primitives are stored in world space inside each entity's
//! [`Geometry`](crate::scene::Geometry) buffers; the space partition only
//! keeps indices into those buffers.

pub mod primitives;

// Re-export commonly used types
pub use primitives::{BoundingSphere, Triangle};
