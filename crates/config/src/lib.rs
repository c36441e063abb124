//! Shared configuration for Atelier
//!
//! This crate is the single source of truth for window dimensions and for the
//! stage layout: where the product model, the display stand and the camera
//! sit in the scene.

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default window width in pixels
pub const DEFAULT_WIDTH: u32 = 1280;

/// Default window height in pixels
pub const DEFAULT_HEIGHT: u32 = 720;

/// Default product model, relative to the asset directory
pub const DEFAULT_MODEL_PATH: &str = "models/shoe.glb";

/// Display configuration for window and rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct DisplayConfig {
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl DisplayConfig {
    /// Create a new display config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, used for the camera projection
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Placement of the product model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPlacement {
    /// glTF/GLB asset path
    pub path: String,
    pub translation: [f32; 3],
    /// Rotation about the vertical axis in degrees
    pub yaw_degrees: f32,
    /// Uniform scale
    pub scale: f32,
}

impl Default for ModelPlacement {
    fn default() -> Self {
        Self {
            path: DEFAULT_MODEL_PATH.to_string(),
            translation: [0.05, 0.10, -0.04],
            yaw_degrees: -65.0,
            scale: 3.0,
        }
    }
}

impl ModelPlacement {
    pub fn yaw_radians(&self) -> f32 {
        self.yaw_degrees.to_radians()
    }
}

/// The cylinder the model stands on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandConfig {
    pub radius: f32,
    pub height: f32,
    /// Radial segments of the cylinder mesh
    pub resolution: u32,
    pub translation: [f32; 3],
    /// `#rrggbb`
    pub color: String,
    /// `#rrggbb`
    pub emissive: String,
    pub emissive_strength: f32,
    pub metallic: f32,
    pub roughness: f32,
}

impl Default for StandConfig {
    fn default() -> Self {
        Self {
            radius: 1.3,
            height: 0.2,
            resolution: 80,
            translation: [0.0, -0.3, -0.7],
            color: "#d357fe".to_string(),
            emissive: "#ffa57d".to_string(),
            emissive_strength: 0.2,
            metallic: 0.4,
            roughness: 0.1,
        }
    }
}

/// Perspective camera framing the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.65, 1.0],
            look_at: [0.0, 0.0, 0.0],
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraConfig {
    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }
}

/// Key light placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyLightConfig {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
}

impl Default for KeyLightConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 10.0, 1.0],
            look_at: [0.0, 0.0, 0.0],
        }
    }
}

/// Layout of everything on stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct StageLayout {
    pub model: ModelPlacement,
    pub stand: StandConfig,
    pub camera: CameraConfig,
    pub key_light: KeyLightConfig,
}

impl StageLayout {
    /// Use a different product model, keeping the default placement
    pub fn with_model_path(mut self, path: impl Into<String>) -> Self {
        self.model.path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DisplayConfig::default();
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.height, DEFAULT_HEIGHT);
    }

    #[test]
    fn test_aspect_ratio() {
        let config = DisplayConfig::new(1920, 1080);
        assert!((config.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_height_aspect() {
        assert_eq!(DisplayConfig::new(800, 0).aspect_ratio(), 1.0);
    }

    #[test]
    fn test_default_stage_layout() {
        let layout = StageLayout::default();
        assert_eq!(layout.model.path, DEFAULT_MODEL_PATH);
        assert_eq!(layout.model.translation, [0.05, 0.10, -0.04]);
        assert!((layout.model.yaw_radians() + 65f32.to_radians()).abs() < 1e-6);
        assert_eq!(layout.stand.radius, 1.3);
        assert_eq!(layout.camera.fov_degrees, 60.0);
    }

    #[test]
    fn test_partial_layout_json_uses_defaults() {
        let layout: StageLayout =
            serde_json::from_str(r#"{"model":{"path":"models/boot.glb","translation":[0,0,0],"yaw_degrees":0,"scale":1}}"#)
                .unwrap();
        assert_eq!(layout.model.path, "models/boot.glb");
        assert_eq!(layout.stand, StandConfig::default());
        assert_eq!(layout.camera, CameraConfig::default());
    }

    #[test]
    fn test_with_model_path() {
        let layout = StageLayout::default().with_model_path("models/sneaker.glb");
        assert_eq!(layout.model.path, "models/sneaker.glb");
        assert_eq!(layout.model.scale, 3.0);
    }
}
