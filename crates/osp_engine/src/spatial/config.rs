//! Partition configuration and construction errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use super::intersection::TriangleTest;

/// How `update_osp` treats spheres that have left a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePolicy {
    /// Only add new memberships; stale ones stay until the next build.
    /// Consumers must tolerate spheres listed in leaves they have left.
    #[default]
    Additive,
    /// Add new memberships and drop the ones the sphere no longer overlaps
    Reconcile,
}

/// Configuration for partition behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OspConfig {
    /// Side length of the root cube, centered at the world origin
    pub root_side: f32,

    /// Maximum primitives per node before subdivision
    pub max_geometries: usize,

    /// Maximum subdivision depth (root is depth 0)
    pub max_depth: u32,

    /// Minimum child side length (prevents excessive subdivision)
    pub min_volume_side: f32,

    /// Sphere membership maintenance on update
    pub update_policy: UpdatePolicy,

    /// Triangle predicate used for assignment
    pub triangle_test: TriangleTest,
}

impl Default for OspConfig {
    fn default() -> Self {
        Self {
            root_side: 2000.0,
            max_geometries: 10,
            max_depth: 10,
            min_volume_side: 1.0,
            update_policy: UpdatePolicy::Additive,
            triangle_test: TriangleTest::Bounds,
        }
    }
}

impl OspConfig {
    /// Default configuration with the two required parameters replaced
    pub fn with_params(root_side: f32, max_geometries: usize) -> Self {
        Self {
            root_side,
            max_geometries,
            ..Self::default()
        }
    }

    /// Reject configurations no tree can be built from
    pub fn validate(&self) -> Result<(), OspError> {
        if !(self.root_side.is_finite() && self.root_side > 0.0) {
            return Err(OspError::InvalidRootSide(self.root_side));
        }
        if self.max_geometries < 1 {
            return Err(OspError::InvalidMaxGeometries(self.max_geometries));
        }
        if !(self.min_volume_side.is_finite() && self.min_volume_side > 0.0) {
            return Err(OspError::InvalidMinVolumeSide(self.min_volume_side));
        }
        Ok(())
    }
}

impl Config for OspConfig {}

/// Partition construction errors
#[derive(Error, Debug)]
pub enum OspError {
    /// Root side must be finite and positive
    #[error("Invalid root side length: {0} (must be finite and > 0)")]
    InvalidRootSide(f32),

    /// Threshold must allow at least one primitive per node
    #[error("Invalid max geometries: {0} (must be >= 1)")]
    InvalidMaxGeometries(usize),

    /// Minimum volume side must be finite and positive
    #[error("Invalid minimum volume side: {0} (must be finite and > 0)")]
    InvalidMinVolumeSide(f32),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
