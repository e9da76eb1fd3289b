//! Octary space partition
//!
//! Divides the world cube into nested octants for broad-phase collision
//! detection. Every entity's triangles and spheres are assigned to the root,
//! then any node holding more than `max_geometries` primitives is split into 8
//! children and its primitives are pushed down to every child they overlap.
//! The resulting leaves are the buckets the narrow-phase tests within.
//!
//! After the build, only spheres of active entities are revisited, once per
//! tick, by walking them down from the root again. Triangles are static.
//!
//! The root is tested exactly. Below it, each volume is widened by
//! [`BOUNDARY_TOLERANCE`] when assigning geometry, so a primitive on the face
//! shared by two siblings reaches both even if the child bounds round apart.

use std::collections::HashMap;
use std::path::Path;

use slotmap::SlotMap;

use crate::config::Config;
use crate::physics::collision::BoundingSphere;
use crate::scene::{Collidable, Entity, Geometry};
use super::config::{OspConfig, OspError, UpdatePolicy};
use super::intersection::{sphere_overlaps_volume, TriangleTest};
use super::node::{NodeId, PartitionNode, PrimitiveRef};
use super::volume::{Volume, BOUNDARY_TOLERANCE};

type GeometryLookup<'a> = HashMap<Entity, &'a Geometry>;

/// Summary of the last build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OspStats {
    /// Nodes in the arena
    pub node_count: usize,
    /// Leaves in the leaf list
    pub leaf_count: usize,
    /// Depth of the deepest leaf
    pub deepest_leaf: u32,
    /// Leaves over the threshold that the depth guard stopped from splitting
    pub saturated_leaves: usize,
}

/// Outcome of one `update_osp` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Spheres of active entities walked down the tree
    pub spheres_walked: usize,
    /// New node memberships registered
    pub added: usize,
    /// Memberships dropped (reconcile policy only)
    pub removed: usize,
}

/// Octary space partition over scene geometry
#[derive(Debug, Clone)]
pub struct SpatialPartitionTree {
    config: OspConfig,
    nodes: SlotMap<NodeId, PartitionNode>,
    root: Option<NodeId>,
    leaves: Vec<NodeId>,
    stats: OspStats,
}

impl SpatialPartitionTree {
    /// Create an empty partition; fails fast on an unusable configuration
    pub fn new(config: OspConfig) -> Result<Self, OspError> {
        config.validate()?;
        log::debug!(
            "Creating OSP: root side {}, max geometries {}, max depth {}, policy {:?}",
            config.root_side,
            config.max_geometries,
            config.max_depth,
            config.update_policy
        );
        Ok(Self {
            config,
            nodes: SlotMap::with_key(),
            root: None,
            leaves: Vec::new(),
            stats: OspStats::default(),
        })
    }

    /// Create a partition from the two required parameters, defaults elsewhere
    pub fn with_params(root_side: f32, max_geometries: usize) -> Result<Self, OspError> {
        Self::new(OspConfig::with_params(root_side, max_geometries))
    }

    /// Create a partition from a TOML or RON configuration file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, OspError> {
        Self::new(OspConfig::load_from_file(path)?)
    }

    /// Active configuration
    pub fn config(&self) -> &OspConfig {
        &self.config
    }

    /// Rebuild the whole partition from `entities`
    ///
    /// Any previous tree is discarded. Entity identifiers are expected to be
    /// unique within `entities`.
    pub fn generate_osp<C: Collidable>(&mut self, entities: &[C]) {
        self.clear();

        let root_volume = Volume::at_origin(self.config.root_side);
        let mut root = PartitionNode::new(root_volume, 0);
        let triangle_test = self.config.triangle_test;

        for collidable in entities {
            let entity = collidable.entity();
            let geometry = collidable.geometry();

            for (index, triangle) in geometry.triangles.iter().enumerate() {
                if triangle_test.overlaps(triangle, &root_volume) {
                    root.add_geometry(entity, PrimitiveRef::Triangle(index));
                }
            }
            for (index, sphere) in geometry.spheres.iter().enumerate() {
                if sphere_overlaps_volume(sphere, &root_volume) {
                    root.add_geometry(entity, PrimitiveRef::Sphere(index));
                }
            }
        }

        let lookup: GeometryLookup<'_> = entities
            .iter()
            .map(|collidable| (collidable.entity(), collidable.geometry()))
            .collect();

        let root_count = root.primitive_count();
        let root_id = self.nodes.insert(root);
        self.root = Some(root_id);
        self.settle(root_id, root_count, &lookup);

        self.stats.node_count = self.nodes.len();
        self.stats.leaf_count = self.leaves.len();
        log::info!(
            "Built OSP from {} entities ({} root primitives): {} nodes, {} leaves, deepest leaf {}, {} saturated",
            entities.len(),
            root_count,
            self.stats.node_count,
            self.stats.leaf_count,
            self.stats.deepest_leaf,
            self.stats.saturated_leaves
        );
    }

    /// Refresh sphere memberships of active entities
    ///
    /// Call once per tick, after kinematics have moved the entities. With
    /// [`UpdatePolicy::Additive`] memberships are only ever added; with
    /// [`UpdatePolicy::Reconcile`] nodes a sphere has left also drop it.
    pub fn update_osp<C: Collidable>(&mut self, entities: &[C]) -> UpdateReport {
        let mut report = UpdateReport::default();
        let Some(root) = self.root else {
            log::warn!("update_osp called before generate_osp, ignoring");
            return report;
        };

        let policy = self.config.update_policy;
        for collidable in entities.iter().filter(|c| c.kinematic_state().is_active()) {
            let entity = collidable.entity();
            for (index, sphere) in collidable.geometry().spheres.iter().enumerate() {
                report.spheres_walked += 1;
                match policy {
                    UpdatePolicy::Additive => {
                        self.insert_sphere_subspaces(root, entity, index, sphere, &mut report);
                    }
                    UpdatePolicy::Reconcile => {
                        self.reconcile_sphere_subspaces(root, entity, index, sphere, &mut report);
                    }
                }
            }
        }

        log::trace!(
            "OSP update: {} spheres walked, {} added, {} removed",
            report.spheres_walked,
            report.added,
            report.removed
        );
        report
    }

    /// Leaf nodes in depth-first, octant order
    pub fn leaves(&self) -> Vec<&PartitionNode> {
        self.leaves.iter().filter_map(|&id| self.nodes.get(id)).collect()
    }

    /// Leaf handles in depth-first, octant order
    pub fn leaf_ids(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&PartitionNode> {
        self.nodes.get(id)
    }

    /// Root handle, `None` before the first build
    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    /// Root node, `None` before the first build
    pub fn root(&self) -> Option<&PartitionNode> {
        self.root.and_then(|id| self.nodes.get(id))
    }

    /// Whether `generate_osp` has run
    pub fn is_built(&self) -> bool {
        self.root.is_some()
    }

    /// Every node in the arena (unordered)
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &PartitionNode)> + '_ {
        self.nodes.iter()
    }

    /// Number of nodes in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Summary of the last build
    pub fn stats(&self) -> OspStats {
        self.stats
    }

    /// Drop the whole tree (scene teardown)
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.leaves.clear();
        self.stats = OspStats::default();
    }

    /// Freeze `node` as a leaf or split it, depending on its primitive count
    fn settle(&mut self, node: NodeId, count: usize, geometry: &GeometryLookup<'_>) {
        if count <= self.config.max_geometries {
            self.push_leaf(node, false);
        } else if self.can_subdivide(node) {
            self.build_octet_tree(node, geometry);
        } else {
            log::debug!(
                "OSP node at depth {} holds {} primitives but cannot subdivide further",
                self.nodes.get(node).map_or(0, PartitionNode::depth),
                count
            );
            self.push_leaf(node, true);
        }
    }

    fn can_subdivide(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(|node| {
            node.depth() < self.config.max_depth
                && node.volume().length() / 2.0 >= self.config.min_volume_side
        })
    }

    fn push_leaf(&mut self, node: NodeId, saturated: bool) {
        if let Some(leaf) = self.nodes.get(node) {
            self.stats.deepest_leaf = self.stats.deepest_leaf.max(leaf.depth());
        }
        if saturated {
            self.stats.saturated_leaves += 1;
        }
        self.leaves.push(node);
    }

    /// Split `node` into 8 octants and push its primitives down
    fn build_octet_tree(&mut self, node: NodeId, geometry: &GeometryLookup<'_>) {
        let Some(parent) = self.nodes.get(node) else {
            return;
        };
        let triangle_test = self.config.triangle_test;
        let child_depth = parent.depth() + 1;
        let mut children = parent
            .volume()
            .subdivide()
            .map(|volume| PartitionNode::new(volume, child_depth));

        for (entity, primitive) in parent.primitives() {
            let Some(buffers) = geometry.get(&entity) else {
                continue;
            };
            for child in &mut children {
                let volume = assignment_volume(child);
                if primitive_overlaps(triangle_test, buffers, primitive, &volume) {
                    child.add_geometry(entity, primitive);
                }
            }
        }

        log::trace!(
            "Subdivided OSP node at depth {}: child counts {:?}",
            child_depth - 1,
            children.each_ref().map(PartitionNode::primitive_count)
        );

        for (octant, child) in children.into_iter().enumerate() {
            let count = child.primitive_count();
            let child_id = self.nodes.insert(child);
            if let Some(parent) = self.nodes.get_mut(node) {
                parent.set_child(octant, child_id);
            }
            self.settle(child_id, count, geometry);
        }
    }

    fn insert_sphere_subspaces(
        &mut self,
        node: NodeId,
        entity: Entity,
        index: usize,
        sphere: &BoundingSphere,
        report: &mut UpdateReport,
    ) {
        let Some(current) = self.nodes.get_mut(node) else {
            return;
        };
        if !sphere_overlaps_volume(sphere, &assignment_volume(current)) {
            return;
        }
        if current.add_geometry(entity, PrimitiveRef::Sphere(index)) {
            report.added += 1;
        }

        let children = *current.children();
        for child in children.into_iter().flatten() {
            self.insert_sphere_subspaces(child, entity, index, sphere, report);
        }
    }

    fn reconcile_sphere_subspaces(
        &mut self,
        node: NodeId,
        entity: Entity,
        index: usize,
        sphere: &BoundingSphere,
        report: &mut UpdateReport,
    ) {
        let Some(current) = self.nodes.get_mut(node) else {
            return;
        };
        if !sphere_overlaps_volume(sphere, &assignment_volume(current)) {
            self.evict_sphere(node, entity, index, report);
            return;
        }
        if current.add_geometry(entity, PrimitiveRef::Sphere(index)) {
            report.added += 1;
        }

        let children = *current.children();
        for child in children.into_iter().flatten() {
            self.reconcile_sphere_subspaces(child, entity, index, sphere, report);
        }
    }

    /// Remove a sphere from `node` and its subtree
    ///
    /// A node only holds a sphere if its parent does, so the walk stops at the
    /// first node that does not hold it.
    fn evict_sphere(&mut self, node: NodeId, entity: Entity, index: usize, report: &mut UpdateReport) {
        let Some(current) = self.nodes.get_mut(node) else {
            return;
        };
        if !current.remove_sphere(entity, index) {
            return;
        }
        report.removed += 1;

        let children = *current.children();
        for child in children.into_iter().flatten() {
            self.evict_sphere(child, entity, index, report);
        }
    }
}

/// Volume geometry is tested against: exact at the root, padded below it
fn assignment_volume(node: &PartitionNode) -> Volume {
    if node.depth() == 0 {
        *node.volume()
    } else {
        node.volume().padded(BOUNDARY_TOLERANCE)
    }
}

fn primitive_overlaps(
    triangle_test: TriangleTest,
    geometry: &Geometry,
    primitive: PrimitiveRef,
    volume: &Volume,
) -> bool {
    match primitive {
        PrimitiveRef::Triangle(index) => geometry
            .triangles
            .get(index)
            .is_some_and(|triangle| triangle_test.overlaps(triangle, volume)),
        PrimitiveRef::Sphere(index) => geometry
            .spheres
            .get(index)
            .is_some_and(|sphere| sphere_overlaps_volume(sphere, volume)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::physics::collision::Triangle;
    use crate::scene::{Body, KinematicState};

    fn static_spheres(id: u32, centers: &[Vec3], radius: f32) -> Body {
        let spheres = centers.iter().map(|&c| BoundingSphere::new(c, radius)).collect();
        Body::new(
            Entity::new(id),
            Geometry::from_spheres(spheres),
            KinematicState::at_rest(Vec3::zeros()),
        )
    }

    #[test]
    fn test_construction_rejects_bad_params() {
        assert!(matches!(
            SpatialPartitionTree::with_params(0.0, 10),
            Err(OspError::InvalidRootSide(_))
        ));
        assert!(matches!(
            SpatialPartitionTree::with_params(100.0, 0),
            Err(OspError::InvalidMaxGeometries(0))
        ));
        assert!(SpatialPartitionTree::with_params(100.0, 1).is_ok());
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let result = SpatialPartitionTree::from_config_file("no/such/osp.toml");
        assert!(matches!(result, Err(OspError::Config(_))));
    }

    #[test]
    fn test_from_config_file_uses_file_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("osp.toml");
        std::fs::write(&path, "root_side = 100.0\nmax_geometries = 1\nupdate_policy = \"reconcile\"\n").unwrap();

        let tree = SpatialPartitionTree::from_config_file(&path).unwrap();
        assert_eq!(tree.config().root_side, 100.0);
        assert_eq!(tree.config().max_geometries, 1);
        assert_eq!(tree.config().update_policy, UpdatePolicy::Reconcile);
        assert_eq!(tree.config().max_depth, OspConfig::default().max_depth);

        std::fs::write(&path, "root_side = -1.0\n").unwrap();
        assert!(matches!(
            SpatialPartitionTree::from_config_file(&path),
            Err(OspError::InvalidRootSide(_))
        ));
    }

    #[test]
    fn test_root_stays_leaf_under_threshold() {
        let mut tree = SpatialPartitionTree::with_params(100.0, 10).unwrap();
        let body = static_spheres(1, &[Vec3::new(10.0, 10.0, 10.0)], 1.0);
        tree.generate_osp(&[body]);

        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.leaf_ids(), &[tree.root_id().unwrap()]);
        assert_eq!(tree.leaves()[0].primitive_count(), 1);
        assert_eq!(tree.stats().deepest_leaf, 0);
    }

    #[test]
    fn test_overfull_root_splits_into_eight() {
        let mut tree = SpatialPartitionTree::with_params(100.0, 1).unwrap();
        // One sphere deep inside each of two opposite octants
        let body = static_spheres(
            1,
            &[Vec3::new(-25.0, -25.0, -25.0), Vec3::new(25.0, 25.0, 25.0)],
            1.0,
        );
        tree.generate_osp(&[body]);

        let root = tree.root().unwrap();
        assert!(!root.is_leaf());
        assert_eq!(tree.node_count(), 9);
        assert_eq!(tree.leaves().len(), 8);

        let leaves = tree.leaves();
        assert!(leaves[0].contains(Entity::new(1), PrimitiveRef::Sphere(0)));
        assert!(leaves[7].contains(Entity::new(1), PrimitiveRef::Sphere(1)));
        assert_eq!(leaves[0].primitive_count(), 1);
        assert_eq!(leaves[7].primitive_count(), 1);
        for leaf in &leaves[1..7] {
            assert_eq!(leaf.primitive_count(), 0);
        }
    }

    #[test]
    fn test_regenerate_discards_previous_tree() {
        let mut tree = SpatialPartitionTree::with_params(100.0, 1).unwrap();
        let crowded = static_spheres(1, &[Vec3::new(-25.0, -25.0, -25.0), Vec3::new(25.0, 25.0, 25.0)], 1.0);
        tree.generate_osp(&[crowded]);
        assert_eq!(tree.node_count(), 9);

        let sparse = static_spheres(2, &[Vec3::new(5.0, 5.0, 5.0)], 1.0);
        tree.generate_osp(&[sparse]);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.leaves().len(), 1);
        assert!(tree.leaves()[0].spheres().get(&Entity::new(1)).is_none());
    }

    #[test]
    fn test_update_before_build_is_noop() {
        let mut tree = SpatialPartitionTree::with_params(100.0, 1).unwrap();
        let mut body = static_spheres(1, &[Vec3::zeros()], 1.0);
        body.kinematic_state_mut().active = true;

        let report = tree.update_osp(&[body]);
        assert_eq!(report, UpdateReport::default());
        assert!(!tree.is_built());
    }

    #[test]
    fn test_update_skips_inactive_entities_and_triangles() {
        let mut tree = SpatialPartitionTree::with_params(100.0, 1).unwrap();
        let ground = Body::new(
            Entity::new(1),
            Geometry::from_triangles(vec![
                Triangle::new(Vec3::new(-30.0, -30.0, -30.0), Vec3::new(-20.0, -30.0, -30.0), Vec3::new(-30.0, -20.0, -30.0)),
                Triangle::new(Vec3::new(30.0, 30.0, 30.0), Vec3::new(20.0, 30.0, 30.0), Vec3::new(30.0, 20.0, 30.0)),
            ]),
            KinematicState::moving(Vec3::zeros(), Vec3::x()),
        );
        let resting = static_spheres(2, &[Vec3::new(10.0, 10.0, 10.0)], 1.0);
        let mut bodies = vec![ground, resting];
        tree.generate_osp(&bodies);

        bodies[1].set_position(Vec3::new(-40.0, 0.0, 0.0));
        let report = tree.update_osp(&bodies);

        assert_eq!(report.spheres_walked, 0);
        assert_eq!(report.added, 0);
    }

    #[test]
    fn test_geometry_just_past_root_face_is_not_registered() {
        let mut tree = SpatialPartitionTree::with_params(2000.0, 10).unwrap();
        let sliver = Body::new(
            Entity::new(1),
            Geometry::new(
                vec![Triangle::new(
                    Vec3::new(1000.015, 0.0, 0.0),
                    Vec3::new(1010.0, 0.0, 0.0),
                    Vec3::new(1010.0, 5.0, 0.0),
                )],
                vec![BoundingSphere::new(Vec3::new(1001.015, 0.0, 0.0), 1.0)],
            ),
            KinematicState::at_rest(Vec3::zeros()),
        );
        tree.generate_osp(std::slice::from_ref(&sliver));
        assert_eq!(tree.root().unwrap().primitive_count(), 0);

        let mut moving = sliver;
        moving.kinematic_state_mut().active = true;
        let report = tree.update_osp(&[moving]);
        assert_eq!(report.spheres_walked, 1);
        assert_eq!(report.added, 0);
        assert_eq!(tree.root().unwrap().primitive_count(), 0);
    }

    #[test]
    fn test_sphere_on_split_plane_reaches_both_siblings() {
        let mut tree = SpatialPartitionTree::with_params(100.0, 2).unwrap();
        // The last sphere sits a hair on the +X side of the x = 0 split
        let body = static_spheres(
            1,
            &[
                Vec3::new(-25.0, -25.0, -25.0),
                Vec3::new(25.0, 25.0, 25.0),
                Vec3::new(2.0e-4, -25.0, -25.0),
            ],
            0.0,
        );
        tree.generate_osp(&[body]);

        let leaves = tree.leaves();
        assert_eq!(leaves.len(), 8);
        assert!(leaves[0].contains(Entity::new(1), PrimitiveRef::Sphere(2)));
        assert!(leaves[1].contains(Entity::new(1), PrimitiveRef::Sphere(2)));
        assert!(!leaves[2].contains(Entity::new(1), PrimitiveRef::Sphere(2)));
    }

    #[test]
    fn test_split_root_has_eight_children_at_depth_one() {
        let mut tree = SpatialPartitionTree::with_params(100.0, 1).unwrap();
        let body = static_spheres(1, &[Vec3::new(-25.0, -25.0, -25.0), Vec3::new(25.0, 25.0, 25.0)], 1.0);
        tree.generate_osp(&[body]);

        assert_eq!(tree.nodes().count(), 9);
        assert_eq!(tree.nodes().filter(|(_, node)| node.depth() == 1).count(), 8);
        assert!(tree.nodes().all(|(_, node)| node.depth() <= 1));
    }
}
