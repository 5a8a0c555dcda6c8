//! Platform abstraction layer
//!
//! Browser glue lives in `web` (wasm32 only):
//! - Canvas2D drawing surface
//! - DOM parameter controls and action buttons

#[cfg(target_arch = "wasm32")]
pub mod web;

/// CSS `rgba()` string for a straight RGBA color
pub fn css_color(color: crate::renderer::Rgba) -> String {
    let [r, g, b, a] = color.map(|c| c.clamp(0.0, 1.0));
    format!(
        "rgba({}, {}, {}, {:.3})",
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
        a
    )
}
