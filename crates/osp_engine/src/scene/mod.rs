//! Scene-side views consumed by the space partition
//!
//! The partition never owns entities. It reads each entity through the
//! [`Collidable`] trait: an identifier, world-space [`Geometry`] buffers and a
//! [`KinematicState`] whose `active` flag gates per-tick updates.

mod body;
mod entity;

pub use body::{Body, Collidable, Geometry, KinematicState};
pub use entity::Entity;
