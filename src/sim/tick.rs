//! Fixed timestep simulation step
//!
//! Advances the model by one `TIME_SCALE` of physical time. The step is not
//! scaled by wall-clock delta: call it once per frame at a steady cadence.

use super::state::{BrokenSnapshot, MotionState, SimEvent, SimulationModel};
use crate::consts::*;
use crate::{project_oblique, wrap_angle};

impl SimulationModel {
    /// Advance the simulation by one step
    ///
    /// Returns `Some(SimEvent::RopeBroken)` on the step where the rope snaps.
    /// A trajectory sample is taken after the update in every state.
    pub fn step(&mut self) -> Option<SimEvent> {
        let event = match self.state {
            MotionState::Normal => self.step_circular(),
            MotionState::Broken => {
                self.step_free();
                None
            }
        };

        self.step_count += 1;
        let pos = self.block_position();
        self.trajectory.observe(pos);

        event
    }

    fn step_circular(&mut self) -> Option<SimEvent> {
        if self.angular_velocity == 0.0 {
            return None;
        }

        if self.exceeds_tension() {
            return Some(self.break_rope());
        }

        let delta = self.angular_velocity * TIME_SCALE * self.rotation_direction.sign();
        self.angle = wrap_angle(self.angle + delta);
        None
    }

    /// Freeze position and tangential velocity, then switch to free motion.
    /// The angle is not advanced on the breaking step.
    fn break_rope(&mut self) -> SimEvent {
        let force = self.centripetal_force();
        let snapshot = BrokenSnapshot {
            position: self.block_position(),
            velocity: self.tangent_velocity(),
        };
        self.broken = snapshot;
        self.state = MotionState::Broken;

        log::info!(
            "Rope broke: F={:.2} N > {:.2} N at ({:.1}, {:.1})",
            force,
            self.max_tension,
            snapshot.position.x,
            snapshot.position.y
        );

        SimEvent::RopeBroken {
            position: snapshot.position,
            velocity: snapshot.velocity,
            force,
            max_tension: self.max_tension,
        }
    }

    /// Straight-line coast from the frozen snapshot, squashed like the orbit
    fn step_free(&mut self) {
        let displacement = self.broken.velocity * PIXELS_PER_METER * TIME_SCALE;
        self.broken.position += project_oblique(displacement);
    }
}
