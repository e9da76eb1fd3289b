//! Math utilities and types
//!
//! Provides the vector types shared by the partition and the collision primitives.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Component-wise minimum of three vectors
pub fn min3(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    a.inf(&b).inf(&c)
}

/// Component-wise maximum of three vectors
pub fn max3(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    a.sup(&b).sup(&c)
}
