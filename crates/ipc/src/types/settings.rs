//! Lighting and turntable tweak settings.

use serde::{Deserialize, Serialize};

/// Upper bound of both light intensity sliders
pub const MAX_LIGHT_INTENSITY: f32 = 3.0;

/// Upper bound of the turntable speed slider (radians per frame)
pub const MAX_ROTATION_SPEED: f32 = 0.1;

/// Values driven by the debug tweak panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TweakSettings {
    /// Ambient light intensity (0.0-3.0)
    pub ambient_intensity: f32,
    /// Key light intensity (0.0-3.0)
    pub directional_intensity: f32,
    /// Model turntable speed in radians per frame (0.0-0.1)
    pub rotation_speed: f32,
}

impl Default for TweakSettings {
    fn default() -> Self {
        Self {
            ambient_intensity: 1.9,
            directional_intensity: 1.3,
            rotation_speed: 0.01,
        }
    }
}

impl TweakSettings {
    /// Clamp every value into its slider range. NaN falls back to the default.
    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        let clamp = |value: f32, max: f32, fallback: f32| {
            if value.is_nan() {
                fallback
            } else {
                value.clamp(0.0, max)
            }
        };
        Self {
            ambient_intensity: clamp(
                self.ambient_intensity,
                MAX_LIGHT_INTENSITY,
                defaults.ambient_intensity,
            ),
            directional_intensity: clamp(
                self.directional_intensity,
                MAX_LIGHT_INTENSITY,
                defaults.directional_intensity,
            ),
            rotation_speed: clamp(self.rotation_speed, MAX_ROTATION_SPEED, defaults.rotation_speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_ranges() {
        let tweaks = TweakSettings {
            ambient_intensity: 5.0,
            directional_intensity: -1.0,
            rotation_speed: f32::NAN,
        }
        .clamped();
        assert_eq!(tweaks.ambient_intensity, MAX_LIGHT_INTENSITY);
        assert_eq!(tweaks.directional_intensity, 0.0);
        assert_eq!(tweaks.rotation_speed, TweakSettings::default().rotation_speed);
    }

    #[test]
    fn test_defaults_within_ranges() {
        let defaults = TweakSettings::default();
        assert_eq!(defaults.clamped(), defaults);
    }
}
