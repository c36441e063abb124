//! Fixed perspective camera framing the stage

use atelier_config::{CameraConfig, DisplayConfig, StageLayout};
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Spawn the camera described by the stage layout
pub(crate) fn spawn_camera(commands: &mut Commands, layout: &StageLayout, display: &DisplayConfig) {
    let camera = &layout.camera;
    commands.spawn((
        Camera3d::default(),
        Projection::from(perspective(camera, display.aspect_ratio())),
        Transform::from_translation(Vec3::from_array(camera.position))
            .looking_at(Vec3::from_array(camera.look_at), Vec3::Y),
        Tonemapping::Reinhard,
        MainCamera,
    ));
}

/// Projection for the first frame; Bevy follows window resizes after that
fn perspective(camera: &CameraConfig, aspect_ratio: f32) -> PerspectiveProjection {
    PerspectiveProjection {
        fov: camera.fov_radians(),
        aspect_ratio,
        near: camera.near,
        far: camera.far,
        ..default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_uses_window_aspect() {
        let camera = CameraConfig::default();
        let projection = perspective(&camera, DisplayConfig::new(1920, 1080).aspect_ratio());
        assert!((projection.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
        assert!((projection.fov - camera.fov_radians()).abs() < 1e-6);
        assert_eq!(projection.near, camera.near);
    }
}
