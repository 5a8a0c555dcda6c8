//! Layered scene
//!
//! Holds the fixed back-to-front list of layers and renders a full frame.

use super::colors;
use super::layers::{Layer, LayerKind};
use super::Surface;
use crate::settings::Settings;
use crate::sim::SimulationModel;

/// A layer plus its visibility flag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLayer {
    pub layer: Layer,
    pub visible: bool,
}

/// Ordered list of draw layers
#[derive(Debug, Clone)]
pub struct Scene {
    layers: Vec<SceneLayer>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl Scene {
    /// Build every layer in draw order, visibility and arrow lengths from `settings`
    pub fn new(settings: &Settings) -> Self {
        let layers = LayerKind::DRAW_ORDER
            .iter()
            .map(|kind| SceneLayer {
                layer: Layer::for_kind(*kind, &settings.arrows),
                visible: kind.enabled_in(&settings.layers),
            })
            .collect();
        Self { layers }
    }

    /// Re-read visibility and arrow tuning without changing the order
    pub fn apply_settings(&mut self, settings: &Settings) {
        *self = Self::new(settings);
    }

    pub fn layers(&self) -> &[SceneLayer] {
        &self.layers
    }

    /// Show or hide one layer. Returns the previous visibility.
    pub fn set_visible(&mut self, kind: LayerKind, visible: bool) -> bool {
        let mut previous = false;
        for entry in self.layers.iter_mut().filter(|l| l.layer.kind() == kind) {
            previous = entry.visible;
            entry.visible = visible;
        }
        log::debug!("Layer {} visible={}", kind.as_str(), visible);
        previous
    }

    pub fn is_visible(&self, kind: LayerKind) -> bool {
        self.layers
            .iter()
            .any(|l| l.layer.kind() == kind && l.visible)
    }

    /// Clear and draw one full frame. The model is only read.
    pub fn render(&self, model: &SimulationModel, surface: &mut dyn Surface) {
        surface.clear(colors::BACKGROUND);
        for entry in self.layers.iter().filter(|l| l.visible) {
            entry.layer.render(model, surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::raster::Canvas;
    use crate::renderer::recording::{DrawCommand, RecordingSurface};
    use crate::settings::LayerToggles;
    use crate::sim::SimParams;

    fn moving_model() -> SimulationModel {
        SimulationModel::new(&SimParams {
            angular_velocity: 1.0,
            max_tension: 100.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_fixed_draw_order() {
        let scene = Scene::default();
        let kinds: Vec<LayerKind> = scene.layers().iter().map(|l| l.layer.kind()).collect();
        assert_eq!(kinds, LayerKind::DRAW_ORDER.to_vec());
        assert!(scene.layers().iter().all(|l| l.visible));
    }

    #[test]
    fn test_render_clears_first_and_body_precedes_arrows() {
        let scene = Scene::default();
        let mut surface = RecordingSurface::new();
        scene.render(&moving_model(), &mut surface);

        assert!(matches!(surface.commands[0], DrawCommand::Clear(_)));
        let body = surface
            .commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Rect(..)))
            .unwrap();
        let first_text = surface
            .commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Text(..)))
            .unwrap();
        assert!(body < first_text);
        assert_eq!(surface.texts().last().copied(), Some("Trajectory points: 0"));
    }

    #[test]
    fn test_hidden_layers_are_skipped() {
        let settings = Settings {
            layers: LayerToggles::default().without_vectors(),
            ..Default::default()
        };
        let mut scene = Scene::new(&settings);
        scene.set_visible(LayerKind::Status, false);

        let mut surface = RecordingSurface::new();
        scene.render(&moving_model(), &mut surface);
        assert!(surface.texts().is_empty());
        assert!(!scene.is_visible(LayerKind::VelocityArrow));
        assert!(scene.is_visible(LayerKind::Body));
    }

    #[test]
    fn test_set_visible_returns_previous() {
        let mut scene = Scene::default();
        assert!(scene.set_visible(LayerKind::Rope, false));
        assert!(!scene.set_visible(LayerKind::Rope, true));
    }

    #[test]
    fn test_render_does_not_touch_model() {
        let scene = Scene::default();
        let mut model = moving_model();
        for _ in 0..9 {
            model.step();
        }
        let angle = model.angle();
        let points = model.trajectory().len();
        let mut canvas = Canvas::new(600, 400);
        scene.render(&model, &mut canvas);
        scene.render(&model, &mut canvas);
        assert_eq!(model.angle(), angle);
        assert_eq!(model.trajectory().len(), points);
        assert_eq!(model.step_count(), 9);
    }

    #[test]
    fn test_body_pixels_on_canvas() {
        let scene = Scene::default();
        let model = moving_model();
        let mut canvas = Canvas::new(600, 400);
        scene.render(&model, &mut canvas);
        let pos = model.block_position();
        // Body square sits at (400, 200); sample a corner away from the arrows
        let px = canvas
            .pixel(pos.x as usize - 6, pos.y as usize - 6)
            .unwrap();
        let body = crate::renderer::colors::BODY.map(|c| (c * 255.0).round() as u8);
        assert_eq!(&px[..3], &body[..3]);
    }
}
