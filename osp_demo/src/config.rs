//! Demo configuration

use osp_engine::config::Config;
use osp_engine::spatial::{OspConfig, OspError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest terrain grid the demo will generate per side
pub const MAX_TERRAIN_RESOLUTION: u32 = 1024;

/// Settings for the headless broad-phase demo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulation ticks to run
    pub ticks: u32,

    /// Seconds per tick
    pub timestep: f32,

    /// Terrain quads per side (two triangles each)
    pub terrain_resolution: u32,

    /// Number of moving spheres
    pub body_count: u32,

    /// Radius of each moving sphere
    pub body_radius: f32,

    /// Maximum speed per axis, units per second
    pub max_speed: f32,

    /// Fraction of bodies left at rest
    pub resting_fraction: f32,

    /// Random seed for scene layout
    pub seed: u64,

    /// Partition settings
    pub osp: OspConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            ticks: 120,
            timestep: 1.0 / 60.0,
            terrain_resolution: 16,
            body_count: 200,
            body_radius: 8.0,
            max_speed: 150.0,
            resting_fraction: 0.25,
            seed: 7,
            osp: OspConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Reject settings the scene generator cannot work with
    pub fn validate(&self) -> Result<(), DemoConfigError> {
        self.osp.validate()?;
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(DemoConfigError::InvalidTimestep(self.timestep));
        }
        if self.terrain_resolution > MAX_TERRAIN_RESOLUTION {
            return Err(DemoConfigError::InvalidTerrainResolution(self.terrain_resolution));
        }
        if !(self.body_radius.is_finite() && self.body_radius >= 0.0) {
            return Err(DemoConfigError::InvalidBodyRadius(self.body_radius));
        }
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return Err(DemoConfigError::InvalidMaxSpeed(self.max_speed));
        }
        if !(0.0..=1.0).contains(&self.resting_fraction) {
            return Err(DemoConfigError::InvalidRestingFraction(self.resting_fraction));
        }
        Ok(())
    }
}

impl Config for DemoConfig {}

/// Demo configuration errors
#[derive(Error, Debug)]
pub enum DemoConfigError {
    /// Partition settings are unusable
    #[error(transparent)]
    Osp(#[from] OspError),

    /// Timestep must be finite and positive
    #[error("Invalid timestep: {0} (must be finite and > 0)")]
    InvalidTimestep(f32),

    /// Terrain grid too large
    #[error("Invalid terrain resolution: {0} (must be <= {MAX_TERRAIN_RESOLUTION})")]
    InvalidTerrainResolution(u32),

    /// Radius must be finite and non-negative
    #[error("Invalid body radius: {0} (must be finite and >= 0)")]
    InvalidBodyRadius(f32),

    /// Speed must be finite and non-negative
    #[error("Invalid max speed: {0} (must be finite and >= 0)")]
    InvalidMaxSpeed(f32),

    /// Fraction must lie in `0..=1`
    #[error("Invalid resting fraction: {0} (must be within 0..=1)")]
    InvalidRestingFraction(f32),
}
