//! Shape generation for 2D primitives
//!
//! Everything here returns plain point lists; surfaces only ever see solid
//! polygons and polylines.

use glam::Vec2;
use std::f32::consts::TAU;

use crate::consts::{ARROW_HEAD_ANGLE, PROJECTION_SQUASH};

/// Shaft plus the two head strokes of a vector arrow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub shaft: [Vec2; 2],
    pub head_left: [Vec2; 2],
    pub head_right: [Vec2; 2],
}

impl Arrow {
    /// The three strokes in draw order
    pub fn strokes(&self) -> [[Vec2; 2]; 3] {
        [self.shaft, self.head_left, self.head_right]
    }

    pub fn tip(&self) -> Vec2 {
        self.shaft[1]
    }
}

/// Arrow from `from` to `to` with heads swept back by `ARROW_HEAD_ANGLE`.
/// Returns `None` for a zero-length arrow (no direction to point in).
pub fn arrow(from: Vec2, to: Vec2, head_length: f32) -> Option<Arrow> {
    let delta = to - from;
    if delta.length_squared() == 0.0 || !delta.is_finite() {
        return None;
    }
    let angle = delta.y.atan2(delta.x);
    let head = |offset: f32| {
        let a = angle + offset;
        to - Vec2::new(a.cos(), a.sin()) * head_length
    };
    Some(Arrow {
        shaft: [from, to],
        head_left: [to, head(-ARROW_HEAD_ANGLE)],
        head_right: [to, head(ARROW_HEAD_ANGLE)],
    })
}

/// Arrow of a given length along a direction.
/// Returns `None` if `direction` has no length.
pub fn arrow_along(from: Vec2, direction: Vec2, length: f32, head_length: f32) -> Option<Arrow> {
    let dir = direction.try_normalize()?;
    arrow(from, from + dir * length, head_length)
}

/// Closed outline of an axis-aligned ellipse (first point repeated at the end)
pub fn ellipse_outline(center: Vec2, rx: f32, ry: f32, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * TAU;
            center + Vec2::new(rx * theta.cos(), ry * theta.sin())
        })
        .collect()
}

/// Split a polyline into dashes of `on` length separated by `off` gaps
pub fn dash_polyline(points: &[Vec2], on: f32, off: f32) -> Vec<Vec<Vec2>> {
    if points.len() < 2 || on <= 0.0 {
        return Vec::new();
    }
    let off = off.max(0.0);

    let mut dashes = Vec::new();
    let mut current: Vec<Vec2> = vec![points[0]];
    let mut drawing = true;
    let mut remaining = on;

    for pair in points.windows(2) {
        let (mut a, b) = (pair[0], pair[1]);
        let mut seg_len = (b - a).length();
        if seg_len == 0.0 {
            continue;
        }
        let dir = (b - a) / seg_len;

        while seg_len > remaining {
            let split = a + dir * remaining;
            if drawing {
                current.push(split);
                dashes.push(std::mem::take(&mut current));
            } else {
                current = vec![split];
            }
            seg_len -= remaining;
            a = split;
            drawing = !drawing;
            remaining = if drawing { on } else { off };
        }

        remaining -= seg_len;
        if drawing {
            current.push(b);
        } else {
            current = vec![b];
        }
    }

    if drawing && current.len() >= 2 {
        dashes.push(current);
    }
    dashes
}

/// Oblique quadrilateral standing in for the tilted plane of motion
///
/// `half_width` is the horizontal half extent; depth and skew follow from it.
pub fn oblique_plane(center: Vec2, half_width: f32) -> [Vec2; 4] {
    let half_depth = half_width * PROJECTION_SQUASH * 1.2;
    let skew = half_width * 0.16;
    [
        center + Vec2::new(-half_width + skew, -half_depth),
        center + Vec2::new(half_width + skew, -half_depth),
        center + Vec2::new(half_width - skew, half_depth),
        center + Vec2::new(-half_width - skew, half_depth),
    ]
}

/// Axis-aligned square centered on `center`, as (top-left, size)
pub fn centered_square(center: Vec2, side: f32) -> (Vec2, Vec2) {
    let half = Vec2::splat(side / 2.0);
    (center - half, Vec2::splat(side))
}
