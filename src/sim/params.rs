//! Default simulation parameters
//!
//! One record holds every initial value. Constructing a model and restoring
//! defaults both read from it, so there is a single source of truth.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::RotationDirection;
use crate::consts::*;

/// Control ranges exposed by the parameter UI
pub mod ranges {
    pub const MASS: (f32, f32) = (0.01, 10.0);
    pub const ANGULAR_VELOCITY: (f32, f32) = (0.0, 2.0);
    pub const MAX_TENSION: (f32, f32) = (0.0, 10.0);
    pub const RADIUS: (f32, f32) = (0.0, 10.0);
}

/// Initial parameters for a simulation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Body mass (kg)
    pub mass: f32,
    /// Angular speed (rad/s, sign carried by `rotation_direction`)
    pub angular_velocity: f32,
    /// Rope length (m)
    pub radius: f32,
    /// Rope force capacity (N)
    pub max_tension: f32,
    pub rotation_direction: RotationDirection,
    /// Pivot in surface coordinates
    pub center: Vec2,
    /// Trail capacity
    pub max_trajectory_points: usize,
    /// Sample the trail every N steps
    pub trajectory_interval: u32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            angular_velocity: 0.5,
            radius: 5.0,
            max_tension: 5.0,
            rotation_direction: RotationDirection::Clockwise,
            center: Vec2::new(SURFACE_WIDTH / 2.0, SURFACE_HEIGHT / 2.0),
            max_trajectory_points: DEFAULT_MAX_TRAJECTORY_POINTS,
            trajectory_interval: DEFAULT_TRAJECTORY_INTERVAL,
        }
    }
}

impl SimParams {
    /// Copy with every scalar clamped into its UI control range
    pub fn clamped_to_controls(&self) -> Self {
        let clamp = |v: f32, (lo, hi): (f32, f32)| if v.is_nan() { lo } else { v.clamp(lo, hi) };
        Self {
            mass: clamp(self.mass, ranges::MASS),
            angular_velocity: clamp(self.angular_velocity, ranges::ANGULAR_VELOCITY),
            radius: clamp(self.radius, ranges::RADIUS),
            max_tension: clamp(self.max_tension, ranges::MAX_TENSION),
            ..self.clone()
        }
    }

    /// Load parameters from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, crate::error::ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let params = serde_json::from_str(&json)?;
        log::info!("Loaded parameters from {}", path.display());
        Ok(params)
    }
}
