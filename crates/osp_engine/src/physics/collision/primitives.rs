//! Primitive collision shapes
//!
//! Provides the geometric primitives (spheres, triangles) that entities
//! contribute to the broad-phase.

use crate::foundation::math::{max3, min3, Vec3};

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &Self) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Move the sphere by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        self.center += offset;
    }
}

/// A triangle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Triangle vertices in world space
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unnormalized face normal (right-hand rule)
    ///
    /// Zero for degenerate triangles, so callers that need a direction must
    /// check the magnitude first.
    pub fn raw_normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Axis-aligned extent of the triangle as `(min, max)`
    pub fn bounds(&self) -> (Vec3, Vec3) {
        (min3(self.v0, self.v1, self.v2), max3(self.v0, self.v1, self.v2))
    }

    /// The three edges, `v0→v1`, `v1→v2`, `v2→v0`
    pub fn edges(&self) -> [Vec3; 3] {
        [self.v1 - self.v0, self.v2 - self.v1, self.v0 - self.v2]
    }

    /// Move every vertex by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        self.v0 += offset;
        self.v1 += offset;
        self.v2 += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_intersection_touching() {
        let a = BoundingSphere::new(Vec3::zeros(), 1.0);
        let b = BoundingSphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        let c = BoundingSphere::new(Vec3::new(2.5, 0.0, 0.0), 1.0);

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_triangle_bounds() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, -1.0, 0.0),
            Vec3::new(0.0, 2.0, 6.0),
        );
        let (min, max) = tri.bounds();
        assert_eq!(min, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(max, Vec3::new(3.0, 2.0, 6.0));
    }

    #[test]
    fn test_degenerate_triangle_has_zero_normal() {
        let p = Vec3::new(1.0, 1.0, 1.0);
        let tri = Triangle::new(p, p, p);
        assert_relative_eq!(tri.raw_normal().magnitude(), 0.0);
    }

    #[test]
    fn test_translate() {
        let mut sphere = BoundingSphere::new(Vec3::zeros(), 0.5);
        sphere.translate(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(sphere.center, Vec3::new(1.0, 2.0, 3.0));

        let mut tri = Triangle::new(Vec3::zeros(), Vec3::x(), Vec3::y());
        tri.translate(Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(tri.v2, Vec3::new(0.0, 1.0, -1.0));
    }
}
