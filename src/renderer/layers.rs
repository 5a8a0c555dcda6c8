//! Scene layers
//!
//! Each layer is a pure function of the model plus its own static style. No
//! layer mutates the model or keeps state between frames.

use glam::Vec2;

use super::colors;
use super::shapes::{self, Arrow};
use super::{Rgba, Stroke, Surface};
use crate::consts::{ARROW_HEAD_LENGTH, PROJECTION_SQUASH};
use crate::settings::{ArrowScale, ArrowTuning, LayerToggles};
use crate::sim::{MotionState, RotationDirection, SimulationModel};

const PLANE_HALF_WIDTH: f32 = 260.0;
const ORBIT_SEGMENTS: u32 = 96;
const ORBIT_DASH: (f32, f32) = (6.0, 4.0);
const PIVOT_RADIUS: f32 = 4.0;
const ROPE_WIDTH: f32 = 2.0;
const TRAIL_WIDTH: f32 = 2.0;
const BODY_SIDE: f32 = 16.0;
const ARROW_WIDTH: f32 = 2.0;
const LABEL_PX: f32 = 14.0;
const LABEL_OFFSET: f32 = 6.0;
const STATUS_ORIGIN: Vec2 = Vec2::new(12.0, 22.0);
const STATUS_LINE_HEIGHT: f32 = 18.0;
const STATUS_PX: f32 = 14.0;

/// Identifies a layer independent of its configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Backdrop,
    OrbitGuide,
    Pivot,
    Rope,
    Trajectory,
    Body,
    CentripetalArrow,
    VelocityArrow,
    AngularArrow,
    Status,
}

impl LayerKind {
    /// Back-to-front. Arrows sit above the body and rope so labels stay legible.
    pub const DRAW_ORDER: [LayerKind; 10] = [
        LayerKind::Backdrop,
        LayerKind::OrbitGuide,
        LayerKind::Pivot,
        LayerKind::Rope,
        LayerKind::Trajectory,
        LayerKind::Body,
        LayerKind::CentripetalArrow,
        LayerKind::VelocityArrow,
        LayerKind::AngularArrow,
        LayerKind::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Backdrop => "backdrop",
            LayerKind::OrbitGuide => "orbit_guide",
            LayerKind::Pivot => "pivot",
            LayerKind::Rope => "rope",
            LayerKind::Trajectory => "trajectory",
            LayerKind::Body => "body",
            LayerKind::CentripetalArrow => "centripetal_arrow",
            LayerKind::VelocityArrow => "velocity_arrow",
            LayerKind::AngularArrow => "angular_arrow",
            LayerKind::Status => "status",
        }
    }

    /// Visibility flag for this layer in the settings
    pub fn enabled_in(&self, toggles: &LayerToggles) -> bool {
        match self {
            LayerKind::Backdrop => toggles.backdrop,
            LayerKind::OrbitGuide => toggles.orbit_guide,
            LayerKind::Pivot => toggles.pivot,
            LayerKind::Rope => toggles.rope,
            LayerKind::Trajectory => toggles.trajectory,
            LayerKind::Body => toggles.body,
            LayerKind::CentripetalArrow => toggles.centripetal_arrow,
            LayerKind::VelocityArrow => toggles.velocity_arrow,
            LayerKind::AngularArrow => toggles.angular_arrow,
            LayerKind::Status => toggles.status,
        }
    }

    /// Mutable visibility flag for this layer in the settings
    pub fn flag_mut<'a>(&self, toggles: &'a mut LayerToggles) -> &'a mut bool {
        match self {
            LayerKind::Backdrop => &mut toggles.backdrop,
            LayerKind::OrbitGuide => &mut toggles.orbit_guide,
            LayerKind::Pivot => &mut toggles.pivot,
            LayerKind::Rope => &mut toggles.rope,
            LayerKind::Trajectory => &mut toggles.trajectory,
            LayerKind::Body => &mut toggles.body,
            LayerKind::CentripetalArrow => &mut toggles.centripetal_arrow,
            LayerKind::VelocityArrow => &mut toggles.velocity_arrow,
            LayerKind::AngularArrow => &mut toggles.angular_arrow,
            LayerKind::Status => &mut toggles.status,
        }
    }
}

/// A draw layer and its static configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layer {
    Backdrop,
    OrbitGuide,
    Pivot,
    Rope,
    Trajectory,
    Body,
    CentripetalArrow(ArrowScale),
    VelocityArrow(ArrowScale),
    AngularArrow(ArrowScale),
    Status,
}

impl Layer {
    /// Build the layer for `kind` with arrow lengths from `arrows`
    pub fn for_kind(kind: LayerKind, arrows: &ArrowTuning) -> Self {
        match kind {
            LayerKind::Backdrop => Layer::Backdrop,
            LayerKind::OrbitGuide => Layer::OrbitGuide,
            LayerKind::Pivot => Layer::Pivot,
            LayerKind::Rope => Layer::Rope,
            LayerKind::Trajectory => Layer::Trajectory,
            LayerKind::Body => Layer::Body,
            LayerKind::CentripetalArrow => Layer::CentripetalArrow(arrows.centripetal),
            LayerKind::VelocityArrow => Layer::VelocityArrow(arrows.velocity),
            LayerKind::AngularArrow => Layer::AngularArrow(arrows.angular),
            LayerKind::Status => Layer::Status,
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Backdrop => LayerKind::Backdrop,
            Layer::OrbitGuide => LayerKind::OrbitGuide,
            Layer::Pivot => LayerKind::Pivot,
            Layer::Rope => LayerKind::Rope,
            Layer::Trajectory => LayerKind::Trajectory,
            Layer::Body => LayerKind::Body,
            Layer::CentripetalArrow(_) => LayerKind::CentripetalArrow,
            Layer::VelocityArrow(_) => LayerKind::VelocityArrow,
            Layer::AngularArrow(_) => LayerKind::AngularArrow,
            Layer::Status => LayerKind::Status,
        }
    }

    /// Draw this layer, or nothing if its preconditions are unmet
    pub fn render(&self, model: &SimulationModel, surface: &mut dyn Surface) {
        match self {
            Layer::Backdrop => draw_backdrop(model, surface),
            Layer::OrbitGuide => draw_orbit_guide(model, surface),
            Layer::Pivot => surface.fill_circle(model.center, PIVOT_RADIUS, colors::PIVOT),
            Layer::Rope => draw_rope(model, surface),
            Layer::Trajectory => draw_trajectory(model, surface),
            Layer::Body => draw_body(model, surface),
            Layer::CentripetalArrow(scale) => draw_centripetal_arrow(model, scale, surface),
            Layer::VelocityArrow(scale) => draw_velocity_arrow(model, scale, surface),
            Layer::AngularArrow(scale) => draw_angular_arrow(model, scale, surface),
            Layer::Status => draw_status(model, surface),
        }
    }
}

/// Shaft and both head strokes of an arrow, plus an optional label past the tip
pub fn draw_arrow(surface: &mut dyn Surface, arrow: &Arrow, color: Rgba, label: Option<&str>) {
    let stroke = Stroke::new(color, ARROW_WIDTH);
    for segment in arrow.strokes() {
        surface.stroke_polyline(&segment, &stroke);
    }
    if let Some(label) = label {
        let dir = (arrow.shaft[1] - arrow.shaft[0]).normalize_or_zero();
        let pos = arrow.tip() + dir * LABEL_OFFSET + Vec2::new(2.0, 4.0);
        surface.draw_text(label, pos, LABEL_PX, color);
    }
}

fn draw_backdrop(model: &SimulationModel, surface: &mut dyn Surface) {
    let quad = shapes::oblique_plane(model.center, PLANE_HALF_WIDTH);
    surface.fill_polygon(&quad, colors::PLANE_FILL);
    let outline = [quad[0], quad[1], quad[2], quad[3], quad[0]];
    surface.stroke_polyline(&outline, &Stroke::new(colors::PLANE_EDGE, 1.0));
}

fn draw_orbit_guide(model: &SimulationModel, surface: &mut dyn Surface) {
    if model.state() != MotionState::Normal {
        return;
    }
    let r = model.radius_px();
    if r <= 0.0 {
        return;
    }
    let outline = shapes::ellipse_outline(model.center, r, r * PROJECTION_SQUASH, ORBIT_SEGMENTS);
    let stroke = Stroke::new(colors::ORBIT_GUIDE, 1.0);
    for dash in shapes::dash_polyline(&outline, ORBIT_DASH.0, ORBIT_DASH.1) {
        surface.stroke_polyline(&dash, &stroke);
    }
}

fn draw_rope(model: &SimulationModel, surface: &mut dyn Surface) {
    if model.state() != MotionState::Normal {
        return;
    }
    let line = [model.center, model.block_position()];
    surface.stroke_polyline(&line, &Stroke::new(colors::ROPE, ROPE_WIDTH));
}

fn draw_trajectory(model: &SimulationModel, surface: &mut dyn Surface) {
    if model.trajectory().len() < 2 {
        return;
    }
    let points = model.trajectory().to_vec();
    surface.stroke_polyline(&points, &Stroke::new(colors::TRAJECTORY, TRAIL_WIDTH));
}

fn draw_body(model: &SimulationModel, surface: &mut dyn Surface) {
    let (min, size) = shapes::centered_square(model.block_position(), BODY_SIDE);
    surface.fill_rect(min, size, colors::BODY);
}

fn draw_centripetal_arrow(model: &SimulationModel, scale: &ArrowScale, surface: &mut dyn Surface) {
    if model.state() != MotionState::Normal || model.angular_velocity == 0.0 {
        return;
    }
    let body = model.block_position();
    let length = scale.length(model.centripetal_acceleration());
    // Zero radius leaves no direction toward the pivot
    if let Some(arrow) = shapes::arrow_along(body, model.center - body, length, ARROW_HEAD_LENGTH) {
        draw_arrow(surface, &arrow, colors::CENTRIPETAL, Some("a"));
    }
}

fn draw_velocity_arrow(model: &SimulationModel, scale: &ArrowScale, surface: &mut dyn Surface) {
    if model.is_at_rest() {
        return;
    }
    let Some(direction) = model.screen_direction() else {
        return;
    };
    let speed = match model.broken_snapshot() {
        Some(snapshot) => snapshot.velocity.length(),
        None => model.linear_velocity(),
    };
    let body = model.block_position();
    if let Some(arrow) = shapes::arrow_along(body, direction, scale.length(speed), ARROW_HEAD_LENGTH) {
        draw_arrow(surface, &arrow, colors::VELOCITY, Some("v"));
    }
}

/// Axial vector drawn straight up (counter-clockwise) or down (clockwise)
fn draw_angular_arrow(model: &SimulationModel, scale: &ArrowScale, surface: &mut dyn Surface) {
    if model.state() != MotionState::Normal || model.angular_velocity == 0.0 {
        return;
    }
    let up = match model.rotation_direction {
        RotationDirection::CounterClockwise => Vec2::NEG_Y,
        RotationDirection::Clockwise => Vec2::Y,
    };
    let length = scale.length(model.angular_velocity);
    if let Some(arrow) = shapes::arrow_along(model.center, up, length, ARROW_HEAD_LENGTH) {
        draw_arrow(surface, &arrow, colors::ANGULAR, Some("ω"));
    }
}

/// Status lines for the current model state
pub fn status_lines(model: &SimulationModel) -> Vec<(String, Rgba)> {
    let mut lines = Vec::with_capacity(4);
    match model.broken_snapshot() {
        None => {
            lines.push((
                format!(
                    "Centripetal force: {:.2} N (limit {:.2} N)",
                    model.centripetal_force(),
                    model.max_tension
                ),
                colors::TEXT,
            ));
            lines.push((
                format!("Linear speed: {:.2} m/s", model.linear_velocity()),
                colors::TEXT,
            ));
            lines.push((
                format!("Angular velocity: {:.2} rad/s", model.angular_velocity),
                colors::TEXT,
            ));
        }
        Some(snapshot) => {
            lines.push((
                format!("Rope broken! Tension limit {:.2} N exceeded", model.max_tension),
                colors::WARNING,
            ));
            lines.push((
                format!("Speed at break: {:.2} m/s", snapshot.velocity.length()),
                colors::TEXT,
            ));
        }
    }
    lines.push((
        format!("Trajectory points: {}", model.trajectory().len()),
        colors::TEXT,
    ));
    lines
}

fn draw_status(model: &SimulationModel, surface: &mut dyn Surface) {
    for (i, (line, color)) in status_lines(model).iter().enumerate() {
        let pos = STATUS_ORIGIN + Vec2::new(0.0, i as f32 * STATUS_LINE_HEIGHT);
        surface.draw_text(line, pos, STATUS_PX, *color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::recording::{DrawCommand, RecordingSurface};
    use crate::sim::SimParams;

    fn moving_model() -> SimulationModel {
        SimulationModel::new(&SimParams {
            mass: 1.0,
            angular_velocity: 1.0,
            radius: 5.0,
            max_tension: 100.0,
            ..Default::default()
        })
    }

    fn broken_model() -> SimulationModel {
        let mut model = SimulationModel::new(&SimParams {
            mass: 1.0,
            angular_velocity: 2.0,
            radius: 5.0,
            max_tension: 1.0,
            ..Default::default()
        });
        model.step();
        assert!(model.is_broken());
        model
    }

    fn render(layer: Layer, model: &SimulationModel) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        layer.render(model, &mut surface);
        surface
    }

    fn arrow_length(surface: &RecordingSurface, color: Rgba) -> f32 {
        let lines = surface.polylines_with(color);
        assert_eq!(lines.len(), 3, "shaft plus two head strokes");
        (lines[0][1] - lines[0][0]).length()
    }

    #[test]
    fn test_kind_round_trip() {
        let arrows = ArrowTuning::default();
        for kind in LayerKind::DRAW_ORDER {
            assert_eq!(Layer::for_kind(kind, &arrows).kind(), kind);
        }
    }

    #[test]
    fn test_flag_mut_matches_enabled_in() {
        let mut toggles = LayerToggles::default();
        for kind in LayerKind::DRAW_ORDER {
            *kind.flag_mut(&mut toggles) = false;
            assert!(!kind.enabled_in(&toggles), "{}", kind.as_str());
            *kind.flag_mut(&mut toggles) = true;
            assert!(kind.enabled_in(&toggles), "{}", kind.as_str());
        }
    }

    #[test]
    fn test_rope_and_orbit_only_while_normal() {
        let model = moving_model();
        assert!(!render(Layer::Rope, &model).is_empty());
        assert!(!render(Layer::OrbitGuide, &model).is_empty());

        let broken = broken_model();
        assert!(render(Layer::Rope, &broken).is_empty());
        assert!(render(Layer::OrbitGuide, &broken).is_empty());
        // Body and pivot still drawn
        assert!(!render(Layer::Body, &broken).is_empty());
        assert!(!render(Layer::Pivot, &broken).is_empty());
    }

    #[test]
    fn test_orbit_guide_is_dashed() {
        let surface = render(Layer::OrbitGuide, &moving_model());
        assert!(surface.commands.len() > 10);
    }

    #[test]
    fn test_body_square_centered() {
        let model = moving_model();
        let surface = render(Layer::Body, &model);
        match &surface.commands[0] {
            DrawCommand::Rect(min, size, _) => {
                assert_eq!(*size, Vec2::splat(BODY_SIDE));
                assert_eq!(*min + *size / 2.0, model.block_position());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_trajectory_needs_two_points() {
        let mut model = moving_model();
        assert!(render(Layer::Trajectory, &model).is_empty());
        for _ in 0..6 {
            model.step();
        }
        let surface = render(Layer::Trajectory, &model);
        assert_eq!(surface.polylines_with(colors::TRAJECTORY)[0].len(), 2);
    }

    #[test]
    fn test_arrows_hidden_at_rest() {
        let mut model = moving_model();
        model.angular_velocity = 0.0;
        let tuning = ArrowTuning::default();
        assert!(render(Layer::CentripetalArrow(tuning.centripetal), &model).is_empty());
        assert!(render(Layer::VelocityArrow(tuning.velocity), &model).is_empty());
        assert!(render(Layer::AngularArrow(tuning.angular), &model).is_empty());
    }

    #[test]
    fn test_centripetal_arrow_points_at_pivot() {
        let model = moving_model();
        let surface = render(Layer::CentripetalArrow(ArrowTuning::default().centripetal), &model);
        let shaft = surface.polylines_with(colors::CENTRIPETAL)[0];
        let toward = (model.center - model.block_position()).normalize();
        let dir = (shaft[1] - shaft[0]).normalize();
        assert!(dir.dot(toward) > 0.999);
        // a = 1 * 5 = 5 -> 30 + 10 * 5 = 80, clamped to 70
        assert!((arrow_length(&surface, colors::CENTRIPETAL) - 70.0).abs() < 1e-3);
        assert_eq!(surface.texts(), vec!["a"]);
    }

    #[test]
    fn test_centripetal_arrow_skipped_at_zero_radius() {
        let mut model = moving_model();
        model.radius = 0.0;
        let surface = render(Layer::CentripetalArrow(ArrowTuning::default().centripetal), &model);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_velocity_arrow_length_clamped() {
        let mut model = moving_model();
        let scale = ArrowTuning::default().velocity;
        // v = 5 -> 30 + 25 = 55
        let surface = render(Layer::VelocityArrow(scale), &model);
        assert!((arrow_length(&surface, colors::VELOCITY) - 55.0).abs() < 1e-3);

        model.angular_velocity = 2.0;
        model.radius = 10.0;
        let surface = render(Layer::VelocityArrow(scale), &model);
        assert!((arrow_length(&surface, colors::VELOCITY) - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_velocity_arrow_follows_frozen_direction() {
        let mut model = broken_model();
        let expected = model.screen_direction().unwrap();
        // Edits after the break must not change the arrow
        model.angular_velocity = 0.0;
        let surface = render(Layer::VelocityArrow(ArrowTuning::default().velocity), &model);
        let shaft = surface.polylines_with(colors::VELOCITY)[0];
        let dir = (shaft[1] - shaft[0]).normalize();
        assert!(dir.dot(expected) > 0.999);
    }

    #[test]
    fn test_angular_arrow_direction() {
        let mut model = moving_model();
        let scale = ArrowTuning::default().angular;
        let down = render(Layer::AngularArrow(scale), &model);
        let shaft = down.polylines_with(colors::ANGULAR)[0];
        assert!(shaft[1].y > shaft[0].y);

        model.rotation_direction = RotationDirection::CounterClockwise;
        let up = render(Layer::AngularArrow(scale), &model);
        let shaft = up.polylines_with(colors::ANGULAR)[0];
        assert!(shaft[1].y < shaft[0].y);
        assert_eq!(shaft[0], model.center);

        assert!(render(Layer::AngularArrow(scale), &broken_model()).is_empty());
    }

    #[test]
    fn test_status_text() {
        let model = moving_model();
        let surface = render(Layer::Status, &model);
        let texts = surface.texts();
        assert_eq!(texts.len(), 4);
        assert!(texts[0].contains("5.00 N"));
        assert!(texts[1].contains("5.00 m/s"));
        assert_eq!(texts[3], "Trajectory points: 0");

        let broken = broken_model();
        let lines = status_lines(&broken);
        assert!(lines[0].0.starts_with("Rope broken!"));
        assert_eq!(lines[0].1, colors::WARNING);
        assert!(lines[1].0.contains("10.00 m/s"));
    }
}
