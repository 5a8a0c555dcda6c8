//! Animation driver
//!
//! Frame loop state. The host (requestAnimationFrame, a headless loop) calls
//! `frame` once per display refresh; the driver decides whether to step and
//! always re-renders while running so a paused view stays responsive.

use crate::renderer::{Scene, Surface};
use crate::sim::{SimEvent, SimulationModel};

/// Start/stop/pause state for the step-then-render cycle
#[derive(Debug, Clone, Default)]
pub struct AnimationDriver {
    running: bool,
    paused: bool,
    /// Frames rendered since construction
    frames: u64,
    /// Steps taken since construction
    steps: u64,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin the frame loop. Returns false if it was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        log::info!("Animation started");
        true
    }

    /// Stop the loop. No further step or render happens until `start`.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Animation stopped after {} frames", self.frames);
        }
        self.running = false;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// While paused, frames render but do not step
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::info!("{}", if paused { "Paused" } else { "Resumed" });
        }
        self.paused = paused;
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Reset the model's motion state and unpause
    pub fn reset(&mut self, model: &mut SimulationModel) {
        model.reset();
        self.set_paused(false);
        log::info!("Simulation reset");
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Run one frame: step (unless paused), then render.
    ///
    /// Returns false and does nothing when stopped.
    pub fn frame(
        &mut self,
        model: &mut SimulationModel,
        scene: &Scene,
        surface: &mut dyn Surface,
    ) -> bool {
        if !self.running {
            return false;
        }

        if !self.paused {
            if let Some(SimEvent::RopeBroken { force, max_tension, .. }) = model.step() {
                log::info!(
                    "Frame {}: rope broke ({:.2} N needed, {:.2} N limit)",
                    self.frames,
                    force,
                    max_tension
                );
            }
            self.steps += 1;
        }

        scene.render(model, surface);
        self.frames += 1;
        log::trace!("Frame {} rendered (step {})", self.frames, self.steps);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::recording::RecordingSurface;
    use crate::sim::{MotionState, SimParams};

    fn fixture() -> (AnimationDriver, SimulationModel, Scene, RecordingSurface) {
        let model = SimulationModel::new(&SimParams {
            angular_velocity: 1.0,
            max_tension: 100.0,
            ..Default::default()
        });
        (AnimationDriver::new(), model, Scene::default(), RecordingSurface::new())
    }

    #[test]
    fn test_stopped_driver_does_nothing() {
        let (mut driver, mut model, scene, mut surface) = fixture();
        assert!(!driver.frame(&mut model, &scene, &mut surface));
        assert!(surface.is_empty());
        assert_eq!(model.step_count(), 0);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut driver = AnimationDriver::new();
        assert!(driver.start());
        assert!(!driver.start());
        assert!(driver.is_running());
        driver.stop();
        assert!(!driver.is_running());
        assert!(driver.start());
    }

    #[test]
    fn test_frame_steps_then_renders() {
        let (mut driver, mut model, scene, mut surface) = fixture();
        driver.start();
        for _ in 0..5 {
            assert!(driver.frame(&mut model, &scene, &mut surface));
        }
        assert_eq!(model.step_count(), 5);
        assert_eq!(driver.frames(), 5);
        assert_eq!(driver.steps(), 5);
        assert!(!surface.is_empty());
    }

    #[test]
    fn test_paused_renders_without_stepping() {
        let (mut driver, mut model, scene, mut surface) = fixture();
        driver.start();
        driver.frame(&mut model, &scene, &mut surface);
        let angle = model.angle();

        driver.set_paused(true);
        surface.commands.clear();
        for _ in 0..3 {
            driver.frame(&mut model, &scene, &mut surface);
        }
        assert_eq!(model.angle(), angle);
        assert_eq!(driver.frames(), 4);
        assert_eq!(driver.steps(), 1);
        assert!(!surface.is_empty());
    }

    #[test]
    fn test_stop_prevents_further_frames() {
        let (mut driver, mut model, scene, mut surface) = fixture();
        driver.start();
        driver.frame(&mut model, &scene, &mut surface);
        driver.stop();
        surface.commands.clear();
        assert!(!driver.frame(&mut model, &scene, &mut surface));
        assert!(surface.is_empty());
        assert_eq!(model.step_count(), 1);
    }

    #[test]
    fn test_reset_unpauses() {
        let (mut driver, mut model, scene, mut surface) = fixture();
        model.max_tension = 0.1;
        driver.start();
        driver.frame(&mut model, &scene, &mut surface);
        assert_eq!(model.state(), MotionState::Broken);

        driver.set_paused(true);
        driver.reset(&mut model);
        assert!(!driver.is_paused());
        assert_eq!(model.state(), MotionState::Normal);
        assert_eq!(model.angle(), 0.0);
        assert!(model.trajectory().is_empty());
    }
}
