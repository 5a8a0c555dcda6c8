//! CPU raster surface
//!
//! An RGBA8 pixel buffer with signed-distance anti-aliasing. Used for the
//! headless runner, PNG export and tests. Text is recorded, not rasterised.

use std::path::Path;

use glam::Vec2;

use super::sdf::{coverage, inside_polygon, sd_circle, sd_segment};
use super::{Rgba, Stroke, Surface};
use crate::error::ExportError;

/// A text draw request kept for inspection or later compositing
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub pos: Vec2,
    pub px: f32,
    pub color: Rgba,
}

/// Pixel-space bounding box, inclusive on both ends
#[derive(Debug, Clone, Copy)]
struct PixelBounds {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl PixelBounds {
    fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }
}

/// RGBA8 raster canvas, one pixel per surface unit
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    text_runs: Vec<TextRun>,
    /// Reused per-stroke coverage buffer
    scratch: Vec<f32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width * height * 4],
            text_runs: Vec::new(),
            scratch: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA8 rows, top to bottom
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at a pixel, `None` if out of bounds
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Text drawn since the last clear
    pub fn text_runs(&self) -> &[TextRun] {
        &self.text_runs
    }

    /// Encode the current frame as PNG
    pub fn save_png(&self, path: &Path) -> Result<(), ExportError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        image::save_buffer(
            path,
            &self.pixels,
            self.width as u32,
            self.height as u32,
            image::ExtendedColorType::Rgba8,
        )?;
        log::debug!("Frame written to {}", path.display());
        Ok(())
    }

    /// Clip a float box (already padded) to pixel bounds
    fn bounds(&self, min: Vec2, max: Vec2) -> Option<PixelBounds> {
        if self.width == 0 || self.height == 0 || !min.is_finite() || !max.is_finite() {
            return None;
        }
        if max.x < 0.0 || max.y < 0.0 {
            return None;
        }
        let min_x = min.x.floor().max(0.0) as usize;
        let min_y = min.y.floor().max(0.0) as usize;
        let max_x = (max.x.ceil() as usize).min(self.width - 1);
        let max_y = (max.y.ceil() as usize).min(self.height - 1);
        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some(PixelBounds {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Source-over blend of `color` at `alpha` coverage
    fn blend(&mut self, x: usize, y: usize, color: Rgba, cover: f32) {
        let a = (color[3] * cover).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let i = (y * self.width + x) * 4;
        for c in 0..3 {
            let dst = self.pixels[i + c] as f32 / 255.0;
            let out = color[c].clamp(0.0, 1.0) * a + dst * (1.0 - a);
            self.pixels[i + c] = (out * 255.0).round() as u8;
        }
        let dst_a = self.pixels[i + 3] as f32 / 255.0;
        self.pixels[i + 3] = ((a + dst_a * (1.0 - a)) * 255.0).round() as u8;
    }

    /// Shade every pixel in `bounds` from a signed-distance function
    fn shade<F>(&mut self, bounds: PixelBounds, color: Rgba, sdf: F)
    where
        F: Fn(Vec2) -> f32,
    {
        for y in bounds.min_y..=bounds.max_y {
            for x in bounds.min_x..=bounds.max_x {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let cover = coverage(sdf(p));
                if cover > 0.0 {
                    self.blend(x, y, color, cover);
                }
            }
        }
    }
}

impl Surface for Canvas {
    fn clear(&mut self, color: Rgba) {
        let rgba = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        self.text_runs.clear();
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        let min = points.iter().copied().fold(Vec2::INFINITY, Vec2::min) - Vec2::ONE;
        let max = points.iter().copied().fold(Vec2::NEG_INFINITY, Vec2::max) + Vec2::ONE;
        let Some(bounds) = self.bounds(min, max) else {
            return;
        };

        self.shade(bounds, color, |p| {
            let n = points.len();
            let edge = (0..n)
                .map(|i| sd_segment(p, points[i], points[(i + 1) % n], 0.0))
                .fold(f32::INFINITY, f32::min);
            if inside_polygon(p, points) { -edge } else { edge }
        });
    }

    fn stroke_polyline(&mut self, points: &[Vec2], stroke: &Stroke) {
        if points.len() < 2 || stroke.width <= 0.0 {
            return;
        }
        let half = stroke.width / 2.0;
        let pad = Vec2::splat(half + 1.0);
        let min = points.iter().copied().fold(Vec2::INFINITY, Vec2::min) - pad;
        let max = points.iter().copied().fold(Vec2::NEG_INFINITY, Vec2::max) + pad;
        let Some(bounds) = self.bounds(min, max) else {
            return;
        };

        // Max coverage over all segments, so joints are not blended twice
        let w = bounds.width();
        let h = bounds.max_y - bounds.min_y + 1;
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        scratch.resize(w * h, 0.0);

        for seg in points.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            let Some(sb) = self.bounds(a.min(b) - pad, a.max(b) + pad) else {
                continue;
            };
            for y in sb.min_y.max(bounds.min_y)..=sb.max_y.min(bounds.max_y) {
                for x in sb.min_x.max(bounds.min_x)..=sb.max_x.min(bounds.max_x) {
                    let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    let cover = coverage(sd_segment(p, a, b, half));
                    let slot = &mut scratch[(y - bounds.min_y) * w + (x - bounds.min_x)];
                    *slot = slot.max(cover);
                }
            }
        }

        for y in bounds.min_y..=bounds.max_y {
            for x in bounds.min_x..=bounds.max_x {
                let cover = scratch[(y - bounds.min_y) * w + (x - bounds.min_x)];
                if cover > 0.0 {
                    self.blend(x, y, stroke.color, cover);
                }
            }
        }
        self.scratch = scratch;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let pad = Vec2::splat(radius + 1.0);
        let Some(bounds) = self.bounds(center - pad, center + pad) else {
            return;
        };
        self.shade(bounds, color, |p| sd_circle(p, center, radius));
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let max = min + size;
        let Some(bounds) = self.bounds(min - Vec2::ONE, max + Vec2::ONE) else {
            return;
        };
        let center = min + size / 2.0;
        let half = size / 2.0;
        // Box SDF
        self.shade(bounds, color, |p| {
            let d = (p - center).abs() - half;
            d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0)
        });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, px: f32, color: Rgba) {
        self.text_runs.push(TextRun {
            text: text.to_string(),
            pos,
            px,
            color,
        });
    }
}
