//! Integration tests for the space partition: build invariants, update
//! behavior and the reference scenarios


use crate::foundation::math::Vec3;
use crate::physics::collision::{BoundingSphere, Triangle};
use crate::scene::{Body, Entity, Geometry, KinematicState};
use super::{NodeId, PrimitiveRef, SpatialPartitionTree};

/// 25 small triangles spread over a 2000-unit root cube
pub(super) fn scattered_triangles() -> Vec<Triangle> {
    (0..25u16)
        .map(|i| {
            let x = -800.0 + f32::from(i % 5) * 400.0;
            let z = -800.0 + f32::from(i / 5) * 400.0;
            let y = -800.0 + f32::from((i * 3) % 5) * 400.0;
            let p = Vec3::new(x + 7.0, y + 11.0, z + 13.0);
            Triangle::new(p, p + Vec3::new(15.0, 0.0, 0.0), p + Vec3::new(0.0, 15.0, 5.0))
        })
        .collect()
}

pub(super) fn terrain(id: u32, triangles: Vec<Triangle>) -> Body {
    Body::new(
        Entity::new(id),
        Geometry::from_triangles(triangles),
        KinematicState::at_rest(Vec3::zeros()),
    )
}

pub(super) fn mover(id: u32, center: Vec3, radius: f32, velocity: Vec3) -> Body {
    Body::new(
        Entity::new(id),
        Geometry::from_spheres(vec![BoundingSphere::new(center, radius)]),
        KinematicState::moving(center, velocity),
    )
}

/// Leaves holding the primitive
pub(super) fn leaves_holding(
    tree: &SpatialPartitionTree,
    entity: Entity,
    primitive: PrimitiveRef,
) -> Vec<NodeId> {
    tree.leaf_ids()
        .iter()
        .copied()
        .filter(|&id| tree.node(id).is_some_and(|node| node.contains(entity, primitive)))
        .collect()
}

/// Every node (leaf or not) holding the primitive
pub(super) fn nodes_holding(
    tree: &SpatialPartitionTree,
    entity: Entity,
    primitive: PrimitiveRef,
) -> Vec<NodeId> {
    tree.nodes()
        .filter(|(_, node)| node.contains(entity, primitive))
        .map(|(id, _)| id)
        .collect()
}
