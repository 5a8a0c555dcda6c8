//! Command-recording surface for layer tests

use glam::Vec2;

use super::{Rgba, Stroke, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    Polygon(Vec<Vec2>, Rgba),
    Polyline(Vec<Vec2>, Stroke),
    Circle(Vec2, f32, Rgba),
    Rect(Vec2, Vec2, Rgba),
    Text(String, Vec2),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text(t, _) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Polylines drawn in exactly this color
    pub fn polylines_with(&self, color: Rgba) -> Vec<&[Vec2]> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Polyline(pts, s) if s.color == color => Some(pts.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        self.commands.push(DrawCommand::Polygon(points.to_vec(), color));
    }

    fn stroke_polyline(&mut self, points: &[Vec2], stroke: &Stroke) {
        self.commands.push(DrawCommand::Polyline(points.to_vec(), *stroke));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle(center, radius, color));
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::Rect(min, size, color));
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, _px: f32, _color: Rgba) {
        self.commands.push(DrawCommand::Text(text.to_string(), pos));
    }
}
