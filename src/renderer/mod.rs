//! Rendering module
//!
//! Layers draw through the `Surface` trait, so the same scene renders into
//! the CPU raster (`raster::Canvas`) natively and into a Canvas2D context in
//! the browser.

pub mod layers;
pub mod raster;
pub mod scene;
pub mod sdf;
pub mod shapes;

#[cfg(test)]
pub(crate) mod recording;

pub use layers::LayerKind;
pub use raster::Canvas;
pub use scene::Scene;

use glam::Vec2;

/// Straight RGBA color, components in 0..=1
pub type Rgba = [f32; 4];

/// Line style for outlines and polylines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
}

impl Stroke {
    pub const fn new(color: Rgba, width: f32) -> Self {
        Self { color, width }
    }
}

/// A 2D raster drawing target
///
/// Coordinates are surface units, origin top-left, y down.
pub trait Surface {
    /// Fill the whole surface
    fn clear(&mut self, color: Rgba);

    /// Fill a simple (non self-intersecting) polygon
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);

    /// Stroke an open polyline. Fewer than two points draws nothing.
    fn stroke_polyline(&mut self, points: &[Vec2], stroke: &Stroke);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Axis-aligned rectangle from its top-left corner
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        let points = [
            min,
            Vec2::new(min.x + size.x, min.y),
            min + size,
            Vec2::new(min.x, min.y + size.y),
        ];
        self.fill_polygon(&points, color);
    }

    /// Left-aligned text with its baseline at `pos`
    fn draw_text(&mut self, text: &str, pos: Vec2, px: f32, color: Rgba);
}

/// Colors for scene elements
pub mod colors {
    use super::Rgba;

    pub const BACKGROUND: Rgba = [0.96, 0.97, 0.99, 1.0];
    pub const PLANE_FILL: Rgba = [0.80, 0.86, 0.93, 1.0];
    pub const PLANE_EDGE: Rgba = [0.55, 0.63, 0.74, 1.0];
    pub const ORBIT_GUIDE: Rgba = [0.45, 0.50, 0.58, 0.8];
    pub const PIVOT: Rgba = [0.15, 0.15, 0.18, 1.0];
    pub const ROPE: Rgba = [0.40, 0.28, 0.16, 1.0];
    pub const TRAJECTORY: Rgba = [0.20, 0.45, 0.95, 0.5];
    pub const BODY: Rgba = [0.85, 0.22, 0.20, 1.0];
    pub const CENTRIPETAL: Rgba = [0.10, 0.60, 0.25, 1.0];
    pub const VELOCITY: Rgba = [0.10, 0.35, 0.85, 1.0];
    pub const ANGULAR: Rgba = [0.60, 0.20, 0.75, 1.0];
    pub const TEXT: Rgba = [0.10, 0.10, 0.12, 1.0];
    pub const WARNING: Rgba = [0.80, 0.10, 0.10, 1.0];
}
