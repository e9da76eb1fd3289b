//! Geometry and kinematic views of a scene entity

use crate::foundation::math::Vec3;
use crate::physics::collision::{BoundingSphere, Triangle};
use super::Entity;

/// World-space collision geometry owned by one entity
///
/// The space partition refers to these primitives by their index in
/// `triangles` / `spheres`, so indices must stay stable between a build and
/// the updates that follow it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    /// Triangle buffer
    pub triangles: Vec<Triangle>,
    /// Sphere buffer
    pub spheres: Vec<BoundingSphere>,
}

impl Geometry {
    /// Create geometry from both buffers
    pub fn new(triangles: Vec<Triangle>, spheres: Vec<BoundingSphere>) -> Self {
        Self { triangles, spheres }
    }

    /// Triangle-only geometry
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self::new(triangles, Vec::new())
    }

    /// Sphere-only geometry
    pub fn from_spheres(spheres: Vec<BoundingSphere>) -> Self {
        Self::new(Vec::new(), spheres)
    }

    /// Total number of primitives
    pub fn primitive_count(&self) -> usize {
        self.triangles.len() + self.spheres.len()
    }

    /// Move every primitive by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        for triangle in &mut self.triangles {
            triangle.translate(offset);
        }
        for sphere in &mut self.spheres {
            sphere.translate(offset);
        }
    }
}

/// Kinematic state of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicState {
    /// World-space position
    pub position: Vec3,

    /// Linear velocity in units per second
    pub velocity: Vec3,

    /// Whether the entity is in motion; only active entities are revisited per tick
    pub active: bool,
}

impl KinematicState {
    /// A moving state
    pub fn moving(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            active: true,
        }
    }

    /// A resting state (inactive, zero velocity)
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            active: false,
        }
    }

    /// Whether the entity is in motion
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// The view of an entity the space partition consumes
pub trait Collidable {
    /// Stable identifier used as the membership key
    fn entity(&self) -> Entity;

    /// World-space collision geometry
    fn geometry(&self) -> &Geometry;

    /// Current kinematic state
    fn kinematic_state(&self) -> &KinematicState;
}

/// A simple rigid entity: geometry that moves with its kinematic state
#[derive(Debug, Clone)]
pub struct Body {
    entity: Entity,
    geometry: Geometry,
    state: KinematicState,
}

impl Body {
    /// Create a body; `geometry` is expected in world space already
    pub fn new(entity: Entity, geometry: Geometry, state: KinematicState) -> Self {
        Self {
            entity,
            geometry,
            state,
        }
    }

    /// Integrate velocity over `dt` seconds, carrying the geometry along
    ///
    /// Inactive bodies do not move.
    pub fn advance(&mut self, dt: f32) {
        if !self.state.active {
            return;
        }
        let offset = self.state.velocity * dt;
        self.state.position += offset;
        self.geometry.translate(offset);
    }

    /// Move the body to `position`, carrying the geometry along
    pub fn set_position(&mut self, position: Vec3) {
        let offset = position - self.state.position;
        self.state.position = position;
        self.geometry.translate(offset);
    }

    /// Mutable access to the kinematic state
    pub fn kinematic_state_mut(&mut self) -> &mut KinematicState {
        &mut self.state
    }
}

impl Collidable for Body {
    fn entity(&self) -> Entity {
        self.entity
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn kinematic_state(&self) -> &KinematicState {
        &self.state
    }
}
