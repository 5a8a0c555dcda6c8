//! Deterministic simulation module
//!
//! All physics lives here. This module must stay pure:
//! - Fixed timestep only (no wall-clock input)
//! - No rendering or platform dependencies
//! - Parameter edits take effect on the next step

pub mod params;
pub mod state;
pub mod tick;
pub mod trajectory;

pub use params::SimParams;
pub use state::{BrokenSnapshot, MotionState, RotationDirection, SimEvent, SimulationModel};
pub use trajectory::TrajectorySampler;
