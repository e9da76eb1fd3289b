//! Primitive-versus-volume overlap predicates
//!
//! All tests are exact and boundary inclusive: a vertex, edge or sphere
//! surface lying exactly on a face of the cube counts as overlapping, anything
//! past a face does not.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::physics::collision::{BoundingSphere, Triangle};
use super::volume::Volume;

/// Which triangle predicate the partition uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangleTest {
    /// Triangle bounding box against the cube (conservative)
    #[default]
    Bounds,
    /// Separating-axis test against the cube (exact)
    Separating,
}

impl TriangleTest {
    /// Run the selected predicate
    pub fn overlaps(self, triangle: &Triangle, volume: &Volume) -> bool {
        match self {
            Self::Bounds => triangle_overlaps_volume(triangle, volume),
            Self::Separating => triangle_overlaps_volume_exact(triangle, volume),
        }
    }
}

/// Conservative triangle test: the triangle's axis-aligned extent touches the cube
pub fn triangle_overlaps_volume(triangle: &Triangle, volume: &Volume) -> bool {
    let cube_min = volume.min();
    let cube_max = volume.max();
    let (tri_min, tri_max) = triangle.bounds();

    tri_min.x <= cube_max.x && tri_max.x >= cube_min.x &&
    tri_min.y <= cube_max.y && tri_max.y >= cube_min.y &&
    tri_min.z <= cube_max.z && tri_max.z >= cube_min.z
}

/// Exact triangle test using the separating axis theorem
///
/// Tests 13 potential separating axes:
/// - 3 cube face normals (the bounding-box test)
/// - 1 triangle face normal
/// - 9 edge-axis cross products
pub fn triangle_overlaps_volume_exact(triangle: &Triangle, volume: &Volume) -> bool {
    if !triangle_overlaps_volume(triangle, volume) {
        return false;
    }

    let half = volume.half_extent();
    let center = volume.center();
    let vertices = [
        triangle.v0 - center,
        triangle.v1 - center,
        triangle.v2 - center,
    ];

    if !overlaps_on_axis(&vertices, triangle.raw_normal(), half) {
        return false;
    }

    let box_axes = [Vec3::x(), Vec3::y(), Vec3::z()];
    for edge in triangle.edges() {
        for axis in &box_axes {
            if !overlaps_on_axis(&vertices, edge.cross(axis), half) {
                return false;
            }
        }
    }

    true
}

/// Projection overlap of a cube-centered triangle and the cube on `axis`
///
/// A zero axis projects everything onto 0 and never separates, which is what
/// makes degenerate triangles fall back to the remaining axes.
fn overlaps_on_axis(vertices: &[Vec3; 3], axis: Vec3, half: f32) -> bool {
    let p0 = axis.dot(&vertices[0]);
    let p1 = axis.dot(&vertices[1]);
    let p2 = axis.dot(&vertices[2]);
    let radius = half * (axis.x.abs() + axis.y.abs() + axis.z.abs());

    let min = p0.min(p1).min(p2);
    let max = p0.max(p1).max(p2);
    min <= radius && max >= -radius
}

/// Sphere test: distance from the center to the nearest point of the cube is within the radius
pub fn sphere_overlaps_volume(sphere: &BoundingSphere, volume: &Volume) -> bool {
    let half = volume.half_extent();
    let local = sphere.center - volume.center();
    let closest_point = Vec3::new(
        local.x.clamp(-half, half),
        local.y.clamp(-half, half),
        local.z.clamp(-half, half),
    );

    (closest_point - local).magnitude_squared() <= sphere.radius * sphere.radius
}
