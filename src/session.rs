//! Simulation session
//!
//! One open simulation view: the default-parameter record, the model, the
//! scene and the driver. Every UI action goes through here.

use crate::driver::AnimationDriver;
use crate::renderer::{LayerKind, Scene, Surface};
use crate::settings::Settings;
use crate::sim::{SimParams, SimulationModel};

/// Top-level owner of a running simulation
#[derive(Debug, Clone)]
pub struct Session {
    params: SimParams,
    settings: Settings,
    model: SimulationModel,
    scene: Scene,
    driver: AnimationDriver,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SimParams::default(), Settings::default())
    }
}

impl Session {
    pub fn new(params: SimParams, settings: Settings) -> Self {
        let model = SimulationModel::new(&params);
        let scene = Scene::new(&settings);
        log::info!(
            "Session created: m={} kg, ω={} rad/s, r={} m, limit={} N, {}",
            params.mass,
            params.angular_velocity,
            params.radius,
            params.max_tension,
            params.rotation_direction.as_str()
        );
        Self {
            params,
            settings,
            model,
            scene,
            driver: AnimationDriver::new(),
        }
    }

    pub fn model(&self) -> &SimulationModel {
        &self.model
    }

    /// Mutable model access for parameter controls
    pub fn model_mut(&mut self) -> &mut SimulationModel {
        &mut self.model
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace view settings and rebuild the scene
    pub fn set_settings(&mut self, settings: Settings) {
        self.scene.apply_settings(&settings);
        self.settings = settings;
    }

    /// Show or hide one layer, keeping the stored settings in step.
    /// Returns the previous visibility.
    pub fn set_layer_visible(&mut self, kind: LayerKind, visible: bool) -> bool {
        *kind.flag_mut(&mut self.settings.layers) = visible;
        self.scene.set_visible(kind, visible)
    }

    pub fn start(&mut self) -> bool {
        self.driver.start()
    }

    pub fn stop(&mut self) {
        self.driver.stop();
    }

    /// Back to angle 0 with the rope intact; parameters are kept
    pub fn reset(&mut self) {
        self.driver.reset(&mut self.model);
    }

    /// Re-apply the session's default parameters, then reset
    pub fn restore_defaults(&mut self) {
        self.model.apply_params(&self.params);
        self.driver.reset(&mut self.model);
        log::info!("Defaults restored");
    }

    pub fn clear_trajectory(&mut self) {
        self.model.clear_trajectory();
        log::debug!("Trajectory cleared");
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.driver.set_paused(paused);
    }

    /// Flip pause state, returning the new value
    pub fn toggle_pause(&mut self) -> bool {
        let paused = !self.driver.is_paused();
        self.driver.set_paused(paused);
        paused
    }

    /// Run one frame against `surface`
    pub fn frame(&mut self, surface: &mut dyn Surface) -> bool {
        self.driver.frame(&mut self.model, &self.scene, surface)
    }

    /// Redraw the current state without stepping, even when stopped
    pub fn redraw(&self, surface: &mut dyn Surface) {
        self.scene.render(&self.model, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::recording::RecordingSurface;
    use crate::sim::{MotionState, RotationDirection};

    #[test]
    fn test_reset_keeps_edited_parameters() {
        let mut session = Session::default();
        session.start();
        session.model_mut().mass = 7.0;
        let mut surface = RecordingSurface::new();
        session.frame(&mut surface);
        session.reset();
        assert_eq!(session.model().mass, 7.0);
        assert_eq!(session.model().angle(), 0.0);
    }

    #[test]
    fn test_restore_defaults_uses_same_record() {
        let params = SimParams {
            mass: 2.0,
            rotation_direction: RotationDirection::CounterClockwise,
            ..Default::default()
        };
        let mut session = Session::new(params.clone(), Settings::default());
        session.model_mut().mass = 9.0;
        session.model_mut().rotation_direction = RotationDirection::Clockwise;
        session.restore_defaults();
        assert_eq!(session.model().mass, params.mass);
        assert_eq!(session.model().rotation_direction, params.rotation_direction);
        assert_eq!(session.model().state(), MotionState::Normal);
    }

    #[test]
    fn test_break_then_reset_cycle() {
        let mut session = Session::default();
        session.start();
        let mut surface = RecordingSurface::new();
        session.model_mut().angular_velocity = 2.0;
        // F = 1 * 4 * 5 = 20 > 5
        session.frame(&mut surface);
        assert!(session.model().is_broken());
        for _ in 0..10 {
            session.frame(&mut surface);
        }
        assert!(session.model().is_broken());

        session.reset();
        assert_eq!(session.model().state(), MotionState::Normal);
        // Still over the limit, so the next frame breaks again
        session.frame(&mut surface);
        assert!(session.model().is_broken());
    }

    #[test]
    fn test_toggle_pause_and_clear() {
        let mut session = Session::default();
        session.start();
        let mut surface = RecordingSurface::new();
        for _ in 0..6 {
            session.frame(&mut surface);
        }
        assert_eq!(session.model().trajectory().len(), 2);
        session.clear_trajectory();
        assert!(session.model().trajectory().is_empty());

        assert!(session.toggle_pause());
        let angle = session.model().angle();
        session.frame(&mut surface);
        assert_eq!(session.model().angle(), angle);
        assert!(!session.toggle_pause());
    }

    #[test]
    fn test_restart_after_stop_resumes_frames() {
        let mut session = Session::default();
        let mut surface = RecordingSurface::new();
        assert!(session.start());
        session.frame(&mut surface);
        let angle = session.model().angle();

        session.stop();
        assert!(!session.frame(&mut surface));
        assert_eq!(session.model().angle(), angle);

        // A restored page starts the same session again
        assert!(session.start());
        assert!(session.frame(&mut surface));
        assert!(session.model().angle() > angle);
        assert_eq!(session.model().step_count(), 2);
    }

    #[test]
    fn test_redraw_when_stopped() {
        let session = Session::default();
        let mut surface = RecordingSurface::new();
        session.redraw(&mut surface);
        assert!(!surface.is_empty());
        assert_eq!(session.model().step_count(), 0);
    }

    #[test]
    fn test_settings_rebuild_scene() {
        let mut session = Session::default();
        let mut settings = Settings::default();
        settings.layers.rope = false;
        session.set_settings(settings);
        assert!(!session.scene().is_visible(LayerKind::Rope));
        assert!(!session.set_layer_visible(LayerKind::Rope, true));
        assert!(session.scene().is_visible(LayerKind::Rope));
    }

    #[test]
    fn test_layer_toggle_updates_settings() {
        let mut session = Session::default();
        assert!(session.set_layer_visible(LayerKind::VelocityArrow, false));
        assert!(!session.settings().layers.velocity_arrow);
        assert!(!session.scene().is_visible(LayerKind::VelocityArrow));

        // What gets persisted rebuilds the same scene
        let stored: Settings =
            serde_json::from_str(&serde_json::to_string(session.settings()).unwrap()).unwrap();
        let restored = Session::new(SimParams::default(), stored);
        assert!(!restored.scene().is_visible(LayerKind::VelocityArrow));
        assert!(restored.scene().is_visible(LayerKind::Rope));
    }
}
