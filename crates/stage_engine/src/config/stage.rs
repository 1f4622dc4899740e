//! Stage, camera and overlay configuration

use serde::{Serialize, Deserialize};

use super::Config;
use crate::animation::Easing;
use crate::foundation::math::Color;

/// # Stage Configuration
///
/// Top-level tuning for a [`Stage`](crate::stage::Stage). Every field has a
/// default, so config files only need to list what they override.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Camera defaults
    pub camera: CameraConfig,
    /// Cinematic bar and fade overlay settings
    pub overlays: OverlayConfig,
}

impl Config for StageConfig {}

/// # Camera Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Viewport width assumed for follow limits until the first draw
    pub viewport_width: f32,
    /// Viewport height assumed for follow limits until the first draw
    pub viewport_height: f32,
    /// Focus duration used by `FocusOptions::default()` (seconds)
    pub focus_duration: f32,
    /// Focus easing used by `FocusOptions::default()`
    pub focus_easing: Easing,
    /// Smallest zoom the camera accepts
    pub min_zoom: f32,
    /// Largest zoom the camera accepts
    pub max_zoom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            focus_duration: 1.0,
            focus_easing: Easing::EaseInOutQuad,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl CameraConfig {
    /// Clamp a zoom factor into the configured range
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        if zoom.is_finite() {
            zoom.clamp(self.min_zoom, self.max_zoom)
        } else {
            1.0
        }
    }
}

/// # Overlay Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Height of each cinematic bar as a fraction of the surface height
    pub bar_height: f32,
    /// Cinematic bar color (RGBA)
    pub bar_color: [f32; 4],
    /// Fade-to-black tint color (RGBA); alpha is driven by the fade
    pub fade_color: [f32; 4],
    /// Default duration for showing/hiding the bars (seconds)
    pub bars_duration: f32,
    /// Default duration for fading out/in (seconds)
    pub fade_duration: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            bar_height: 0.12,
            bar_color: [0.0, 0.0, 0.0, 1.0],
            fade_color: [0.0, 0.0, 0.0, 1.0],
            bars_duration: 0.5,
            fade_duration: 1.0,
        }
    }
}

impl OverlayConfig {
    /// Bar color as a math color
    pub fn bar_color(&self) -> Color {
        Color::from(self.bar_color)
    }

    /// Fade color as a math color
    pub fn fade_color(&self) -> Color {
        Color::from(self.fade_color)
    }
}
