//! Axis-aligned cubic volumes

use crate::foundation::math::Vec3;

/// Number of children a volume splits into
pub const OCTANT_COUNT: usize = 8;

/// Relative widening the partition applies to non-root volumes when assigning geometry
pub const BOUNDARY_TOLERANCE: f32 = 1.0e-5;

/// An axis-aligned cube described by its center and side length
///
/// Immutable value type; subdividing produces new volumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    center: Vec3,
    side: f32,
}

impl Volume {
    /// Create a cube of side `side` centered at `center`
    pub fn new(side: f32, center: Vec3) -> Self {
        debug_assert!(side > 0.0, "volume side must be positive, got {side}");
        Self { center, side }
    }

    /// Cube of side `side` centered at the world origin
    pub fn at_origin(side: f32) -> Self {
        Self::new(side, Vec3::zeros())
    }

    /// Side length
    pub fn length(&self) -> f32 {
        self.side
    }

    /// Center point
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Half the side length
    pub fn half_extent(&self) -> f32 {
        self.side * 0.5
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.center - Vec3::repeat(self.half_extent())
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.center + Vec3::repeat(self.half_extent())
    }

    /// Boundary-inclusive point containment
    pub fn contains_point(&self, point: Vec3) -> bool {
        let offset = (point - self.center).abs();
        let half = self.half_extent();
        offset.x <= half && offset.y <= half && offset.z <= half
    }

    /// Same center, every face pushed out by `relative * side`
    pub fn padded(&self, relative: f32) -> Self {
        Self::new(self.side * (1.0 + 2.0 * relative), self.center)
    }

    /// The child volume for octant `index`
    ///
    /// Octant layout:
    /// 0: -X, -Y, -Z (back-bottom-left)
    /// 1: +X, -Y, -Z (back-bottom-right)
    /// 2: -X, +Y, -Z (back-top-left)
    /// 3: +X, +Y, -Z (back-top-right)
    /// 4: -X, -Y, +Z (front-bottom-left)
    /// 5: +X, -Y, +Z (front-bottom-right)
    /// 6: -X, +Y, +Z (front-top-left)
    /// 7: +X, +Y, +Z (front-top-right)
    pub fn octant(&self, index: usize) -> Self {
        debug_assert!(index < OCTANT_COUNT, "octant index out of range: {index}");
        let half = self.side / 2.0;
        let quarter = half / 2.0;

        let x_sign = if index & 1 != 0 { 1.0 } else { -1.0 };
        let y_sign = if index & 2 != 0 { 1.0 } else { -1.0 };
        let z_sign = if index & 4 != 0 { 1.0 } else { -1.0 };

        let child_center = Vec3::new(
            self.center.x + quarter * x_sign,
            self.center.y + quarter * y_sign,
            self.center.z + quarter * z_sign,
        );
        Self::new(half, child_center)
    }

    /// All 8 children in octant order
    pub fn subdivide(&self) -> [Self; OCTANT_COUNT] {
        std::array::from_fn(|index| self.octant(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_accessors() {
        let volume = Volume::new(4.0, Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(volume.length(), 4.0);
        assert_eq!(volume.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(volume.min(), Vec3::new(-1.0, 0.0, 1.0));
        assert_eq!(volume.max(), Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_subdivide_geometry() {
        let parent = Volume::new(2000.0, Vec3::new(10.0, -20.0, 30.0));
        let children = parent.subdivide();

        let mut center_sum = Vec3::zeros();
        for child in &children {
            assert_relative_eq!(child.length(), 1000.0);
            let offset = child.center() - parent.center();
            assert_relative_eq!(offset.x.abs(), 500.0);
            assert_relative_eq!(offset.y.abs(), 500.0);
            assert_relative_eq!(offset.z.abs(), 500.0);
            center_sum += offset;
        }
        // Symmetric about the parent's center
        assert_relative_eq!(center_sum.magnitude(), 0.0);

        // Distinct centers, so the eight cubes partition the parent
        for (i, a) in children.iter().enumerate() {
            for b in &children[i + 1..] {
                assert_ne!(a.center(), b.center());
            }
        }
    }

    #[test]
    fn test_children_tile_parent() {
        let parent = Volume::new(8.0, Vec3::zeros());
        let children = parent.subdivide();

        // Sample a grid over the parent including faces, edges and the center
        let steps = 8;
        for i in 0..=steps {
            for j in 0..=steps {
                for k in 0..=steps {
                    let p = Vec3::new(
                        -4.0 + i as f32,
                        -4.0 + j as f32,
                        -4.0 + k as f32,
                    );
                    assert!(parent.contains_point(p));
                    assert!(
                        children.iter().any(|c| c.contains_point(p)),
                        "point {p:?} not covered by any child"
                    );
                }
            }
        }
    }

    #[test]
    fn test_padded_keeps_center() {
        let volume = Volume::new(10.0, Vec3::new(1.0, 2.0, 3.0));
        let padded = volume.padded(0.1);
        assert_eq!(padded.center(), volume.center());
        assert_relative_eq!(padded.length(), 12.0);
        assert_relative_eq!(padded.max().x, volume.max().x + 1.0);
        assert!(!volume.contains_point(Vec3::new(6.5, 2.0, 3.0)));
        assert!(padded.contains_point(Vec3::new(6.5, 2.0, 3.0)));
    }

    #[test]
    fn test_octant_order() {
        let parent = Volume::at_origin(4.0);
        assert_eq!(parent.octant(0).center(), Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(parent.octant(1).center(), Vec3::new(1.0, -1.0, -1.0));
        assert_eq!(parent.octant(2).center(), Vec3::new(-1.0, 1.0, -1.0));
        assert_eq!(parent.octant(4).center(), Vec3::new(-1.0, -1.0, 1.0));
        assert_eq!(parent.octant(7).center(), Vec3::new(1.0, 1.0, 1.0));
    }
}
