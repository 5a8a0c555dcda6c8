//! Signed distance helpers for rasterisation
//!
//! The CPU canvas shades each pixel from its distance to the shape, which
//! gives one-pixel anti-aliasing for free.

use glam::Vec2;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to a segment thickened to `half_width` (a capsule)
pub fn sd_segment(p: Vec2, a: Vec2, b: Vec2, half_width: f32) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq > 0.0 {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (p - (a + ab * t)).length() - half_width
}

/// Even-odd point-in-polygon test
pub fn inside_polygon(p: Vec2, points: &[Vec2]) -> bool {
    let mut inside = false;
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (points[i], points[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = pj.x + (p.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Pixel coverage for a signed distance (1 inside, 0 outside, linear over one pixel)
#[inline]
pub fn coverage(distance: f32) -> f32 {
    (0.5 - distance).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sd_segment() {
        let a = Vec2::ZERO;
        let b = Vec2::new(10.0, 0.0);
        assert!((sd_segment(Vec2::new(5.0, 3.0), a, b, 1.0) - 2.0).abs() < 1e-5);
        // Past the end cap
        assert!((sd_segment(Vec2::new(13.0, 4.0), a, b, 0.0) - 5.0).abs() < 1e-5);
        // Degenerate segment behaves like a circle
        assert!((sd_segment(Vec2::new(3.0, 4.0), a, a, 1.0) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_inside_polygon() {
        let square = [
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(inside_polygon(Vec2::new(5.0, 5.0), &square));
        assert!(!inside_polygon(Vec2::new(15.0, 5.0), &square));
        assert!(!inside_polygon(Vec2::new(5.0, 5.0), &square[..2]));
    }

    #[test]
    fn test_coverage() {
        assert_eq!(coverage(-3.0), 1.0);
        assert_eq!(coverage(3.0), 0.0);
        assert!((coverage(0.0) - 0.5).abs() < 1e-6);
        assert!((sd_circle(Vec2::new(3.0, 4.0), Vec2::ZERO, 2.0) - 3.0).abs() < 1e-6);
    }
}
