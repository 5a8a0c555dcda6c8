//! Simulation state and core types
//!
//! One body on a rope around a fixed pivot. While the rope holds, position is
//! a function of the angle; once it snaps, the body coasts from a frozen
//! snapshot taken at the moment of the break.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::params::SimParams;
use super::trajectory::TrajectorySampler;
use crate::consts::*;
use crate::{polar_to_cartesian, project_oblique};

/// Direction the body travels around the pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationDirection {
    /// Angle increases step over step
    #[default]
    Clockwise,
    /// Angle decreases step over step
    CounterClockwise,
}

impl RotationDirection {
    /// +1 for clockwise, -1 for counter-clockwise
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            RotationDirection::Clockwise => 1.0,
            RotationDirection::CounterClockwise => -1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RotationDirection::Clockwise => "clockwise",
            RotationDirection::CounterClockwise => "counterclockwise",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "clockwise" | "cw" => Some(RotationDirection::Clockwise),
            "counterclockwise" | "counter-clockwise" | "ccw" => {
                Some(RotationDirection::CounterClockwise)
            }
            _ => None,
        }
    }
}

/// Which set of equations currently drives the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    /// Rope intact, uniform circular motion
    Normal,
    /// Rope snapped, straight-line motion (terminal until reset)
    Broken,
}

/// Kinematics frozen at the instant the rope snapped
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokenSnapshot {
    /// Body position in surface coordinates, advanced every broken step
    pub position: Vec2,
    /// Tangential velocity at the break (m/s, not projected)
    pub velocity: Vec2,
}

/// Notable simulation events, returned from `step`
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// Required centripetal force exceeded the rope's capacity
    RopeBroken {
        position: Vec2,
        velocity: Vec2,
        force: f32,
        max_tension: f32,
    },
}

/// The simulation model
///
/// Scalar parameters are public so parameter controls can assign them at any
/// time, mid-motion included. Nothing is validated: zero or negative inputs
/// give degenerate but finite output.
#[derive(Debug, Clone)]
pub struct SimulationModel {
    /// Body mass (kg)
    pub mass: f32,
    /// Angular speed (rad/s, >= 0)
    pub angular_velocity: f32,
    /// Rope length (m)
    pub radius: f32,
    /// Rope force capacity (N)
    pub max_tension: f32,
    pub rotation_direction: RotationDirection,
    /// Fixed pivot in surface coordinates
    pub center: Vec2,

    /// Angular position (radians, in [0, 2π))
    pub(super) angle: f32,
    pub(super) state: MotionState,
    /// Only meaningful while `state == Broken`
    pub(super) broken: BrokenSnapshot,
    pub(super) trajectory: TrajectorySampler,
    /// Steps taken since construction or the last reset
    pub(super) step_count: u64,
}

impl Default for SimulationModel {
    fn default() -> Self {
        Self::new(&SimParams::default())
    }
}

impl SimulationModel {
    /// Create a model at rest position (angle 0, rope intact)
    pub fn new(params: &SimParams) -> Self {
        Self {
            mass: params.mass,
            angular_velocity: params.angular_velocity,
            radius: params.radius,
            max_tension: params.max_tension,
            rotation_direction: params.rotation_direction,
            center: params.center,
            angle: 0.0,
            state: MotionState::Normal,
            broken: BrokenSnapshot::default(),
            trajectory: TrajectorySampler::new(
                params.max_trajectory_points,
                params.trajectory_interval,
            ),
            step_count: 0,
        }
    }

    /// Overwrite every externally controlled parameter from a record.
    /// Motion state and the trail are left alone.
    pub fn apply_params(&mut self, params: &SimParams) {
        self.mass = params.mass;
        self.angular_velocity = params.angular_velocity;
        self.radius = params.radius;
        self.max_tension = params.max_tension;
        self.rotation_direction = params.rotation_direction;
        self.center = params.center;
        self.trajectory.set_capacity(params.max_trajectory_points);
        self.trajectory.set_interval(params.trajectory_interval);
    }

    /// Return to the initial motion state.
    ///
    /// Clears angle, break snapshot and trail. Mass, speed, radius, tension
    /// and direction are NOT restored; see `Session::restore_defaults`.
    pub fn reset(&mut self) {
        self.angle = 0.0;
        self.state = MotionState::Normal;
        self.broken = BrokenSnapshot::default();
        self.trajectory.clear();
        self.step_count = 0;
    }

    /// Empty the trail without touching motion
    pub fn clear_trajectory(&mut self) {
        self.trajectory.clear();
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn state(&self) -> MotionState {
        self.state
    }

    #[inline]
    pub fn is_broken(&self) -> bool {
        self.state == MotionState::Broken
    }

    /// Snapshot taken at the break, `None` while the rope holds
    pub fn broken_snapshot(&self) -> Option<&BrokenSnapshot> {
        match self.state {
            MotionState::Broken => Some(&self.broken),
            MotionState::Normal => None,
        }
    }

    pub fn trajectory(&self) -> &TrajectorySampler {
        &self.trajectory
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// F = m ω² r (N)
    #[inline]
    pub fn centripetal_force(&self) -> f32 {
        self.mass * self.angular_velocity * self.angular_velocity * self.radius
    }

    /// a = ω² r (m/s²). Same as F / m without dividing by a possibly zero mass.
    #[inline]
    pub fn centripetal_acceleration(&self) -> f32 {
        self.angular_velocity * self.angular_velocity * self.radius
    }

    /// v = ω r (m/s)
    #[inline]
    pub fn linear_velocity(&self) -> f32 {
        self.angular_velocity * self.radius
    }

    /// Rope length in surface units
    #[inline]
    pub fn radius_px(&self) -> f32 {
        self.radius * PIXELS_PER_METER
    }

    /// True while the body is circling but not moving
    #[inline]
    pub fn is_at_rest(&self) -> bool {
        self.state == MotionState::Normal && self.angular_velocity == 0.0
    }

    /// Whether the rope would snap at the current parameters (strict `>`)
    #[inline]
    pub fn exceeds_tension(&self) -> bool {
        self.centripetal_force() > self.max_tension
    }

    /// Body position in surface coordinates
    pub fn block_position(&self) -> Vec2 {
        match self.state {
            MotionState::Normal => {
                self.center + project_oblique(polar_to_cartesian(self.radius_px(), self.angle))
            }
            MotionState::Broken => self.broken.position,
        }
    }

    /// Tangential velocity at the current angle (m/s, not projected)
    pub fn tangent_velocity(&self) -> Vec2 {
        let tangent = self.angle + std::f32::consts::FRAC_PI_2;
        polar_to_cartesian(self.linear_velocity(), tangent) * self.rotation_direction.sign()
    }

    /// Unit direction of travel on screen, or `None` if the body is not moving
    pub fn screen_direction(&self) -> Option<Vec2> {
        let velocity = match self.state {
            MotionState::Normal => self.tangent_velocity(),
            MotionState::Broken => self.broken.velocity,
        };
        project_oblique(velocity).try_normalize()
    }
}
