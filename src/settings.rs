//! View settings and preferences
//!
//! Layer visibility and vector-arrow tuning. Persisted as JSON: a file on
//! native, LocalStorage in the browser.

use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use crate::error::ConfigError;

/// Length mapping for one vector arrow: `clamp(min + gain * magnitude, min, max)`
///
/// Purely visual tuning, there is no physical meaning to the numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowScale {
    /// Shortest drawn length (surface units)
    pub min: f32,
    /// Longest drawn length (surface units)
    pub max: f32,
    /// Surface units per unit of the underlying magnitude
    pub gain: f32,
}

impl ArrowScale {
    pub const fn new(min: f32, max: f32, gain: f32) -> Self {
        Self { min, max, gain }
    }

    /// Drawn length for a magnitude. Monotonic in `magnitude`, always in [min, max].
    pub fn length(&self, magnitude: f32) -> f32 {
        let raw = self.min + self.gain * magnitude.abs();
        if raw.is_nan() {
            return self.min;
        }
        raw.clamp(self.min, self.max.max(self.min))
    }
}

/// Arrow tuning for every vector overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowTuning {
    /// Centripetal acceleration (magnitude = F / m)
    pub centripetal: ArrowScale,
    /// Linear velocity (magnitude = m/s)
    pub velocity: ArrowScale,
    /// Angular velocity (magnitude = rad/s)
    pub angular: ArrowScale,
}

impl Default for ArrowTuning {
    fn default() -> Self {
        Self {
            centripetal: ArrowScale::new(30.0, 70.0, 10.0),
            velocity: ArrowScale::new(30.0, 80.0, 5.0),
            angular: ArrowScale::new(30.0, 60.0, 15.0),
        }
    }
}

/// Per-layer visibility flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerToggles {
    pub backdrop: bool,
    pub orbit_guide: bool,
    pub pivot: bool,
    pub rope: bool,
    pub trajectory: bool,
    pub body: bool,
    pub centripetal_arrow: bool,
    pub velocity_arrow: bool,
    pub angular_arrow: bool,
    pub status: bool,
}

impl Default for LayerToggles {
    fn default() -> Self {
        Self {
            backdrop: true,
            orbit_guide: true,
            pivot: true,
            rope: true,
            trajectory: true,
            body: true,
            centripetal_arrow: true,
            velocity_arrow: true,
            angular_arrow: true,
            status: true,
        }
    }
}

impl LayerToggles {
    /// Hide all three vector arrows at once
    pub fn without_vectors(mut self) -> Self {
        self.centripetal_arrow = false;
        self.velocity_arrow = false;
        self.angular_arrow = false;
        self
    }
}

/// View settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which layers are drawn
    pub layers: LayerToggles,
    /// Vector arrow lengths
    pub arrows: ArrowTuning,
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "orbit_break_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
