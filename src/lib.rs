//! Orbit Break - circular motion on a rope that can snap
//!
//! Core modules:
//! - `sim`: Fixed-step physics model (circular phase, rope break, trajectory trail)
//! - `renderer`: Draw surface abstraction, CPU raster, layered scene
//! - `driver`: Frame loop state (start/stop/pause/reset)
//! - `session`: One open simulation view and its action surface
//! - `platform`: Browser glue (Canvas2D surface, DOM controls)
//! - `settings`: Layer visibility and arrow tuning

pub mod driver;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use driver::AnimationDriver;
pub use error::{ConfigError, ExportError};
pub use session::Session;
pub use settings::{ArrowScale, ArrowTuning, LayerToggles, Settings};

use glam::Vec2;

/// Simulation and view constants
pub mod consts {
    /// Logical size of the render target
    pub const SURFACE_WIDTH: f32 = 600.0;
    pub const SURFACE_HEIGHT: f32 = 400.0;

    /// Vertical squash that fakes a tilted viewing plane
    pub const PROJECTION_SQUASH: f32 = 0.3;
    /// Surface units per physical meter
    pub const PIXELS_PER_METER: f32 = 20.0;
    /// Physical seconds advanced per step (one 60 Hz frame)
    pub const TIME_SCALE: f32 = 0.016;

    /// Trajectory trail defaults
    pub const DEFAULT_MAX_TRAJECTORY_POINTS: usize = 200;
    pub const DEFAULT_TRAJECTORY_INTERVAL: u32 = 3;

    /// Arrowhead geometry shared by every vector arrow
    pub const ARROW_HEAD_ANGLE: f32 = std::f32::consts::PI / 6.0;
    pub const ARROW_HEAD_LENGTH: f32 = 10.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negatives up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Apply the oblique-plane squash to a surface-space offset
#[inline]
pub fn project_oblique(v: Vec2) -> Vec2 {
    Vec2::new(v.x, v.y * consts::PROJECTION_SQUASH)
}
