//! Conversions between Bevy types and configurator types.
//!
//! The configurator crate carries its own glam; values cross over as plain
//! arrays so the two never need to agree on a glam version.

use bevy::prelude::*;
use configurator::glam as core;
use configurator::{CameraProjection, Rgb};

pub fn mat4_from_transform(transform: &GlobalTransform) -> core::Mat4 {
    core::Mat4::from_cols_array(&Mat4::from(transform.affine()).to_cols_array())
}

/// Camera placement plus its clip-from-view matrix
pub fn camera_projection(camera_transform: &GlobalTransform, clip_from_view: Mat4) -> CameraProjection {
    CameraProjection::new(
        mat4_from_transform(camera_transform).inverse(),
        core::Mat4::from_cols_array(&clip_from_view.to_cols_array()),
    )
}

pub fn vec2_from_bevy(v: Vec2) -> core::Vec2 {
    core::Vec2::from_array(v.to_array())
}

pub fn positions_from_arrays(positions: &[[f32; 3]]) -> Vec<core::Vec3> {
    positions.iter().copied().map(core::Vec3::from_array).collect()
}

pub fn color_to_rgb(color: Color) -> Rgb {
    let srgba = color.to_srgba();
    Rgb::from_unit([srgba.red, srgba.green, srgba.blue])
}

pub fn rgb_to_color(rgb: Rgb, opacity: f32) -> Color {
    let [r, g, b] = rgb.to_unit();
    Color::srgba(r, g, b, opacity)
}

/// Parse `#rrggbb`, falling back to white with a warning
pub fn hex_to_color(hex: &str) -> Color {
    match Rgb::from_hex(hex) {
        Ok(rgb) => rgb_to_color(rgb, 1.0),
        Err(err) => {
            warn!("{}, using white", err);
            Color::WHITE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_round_trip_keeps_hex() {
        let rgb = Rgb::from_hex("#d357fe").unwrap();
        assert_eq!(color_to_rgb(rgb_to_color(rgb, 0.8)), rgb);
    }

    #[test]
    fn test_opacity_goes_to_alpha() {
        let color = rgb_to_color(Rgb::WHITE, 0.8).to_srgba();
        assert!((color.alpha - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_hex_is_white() {
        assert_eq!(hex_to_color("not-a-color"), Color::WHITE);
    }

    #[test]
    fn test_camera_projection_matches_bevy_camera() {
        let transform = GlobalTransform::from(
            Transform::from_xyz(0.0, 0.65, 1.0).looking_at(Vec3::new(0.0, 0.65, 0.0), Vec3::Y),
        );
        let projection = camera_projection(
            &transform,
            Mat4::perspective_infinite_reverse_rh(45f32.to_radians(), 16.0 / 9.0, 0.1),
        );
        let ray = projection
            .viewport_to_ray(core::Vec2::new(640.0, 360.0), core::Vec2::new(1280.0, 720.0))
            .unwrap();
        assert!((ray.direction - core::Vec3::NEG_Z).length() < 1e-4);
        assert!((ray.origin - core::Vec3::new(0.0, 0.65, 0.9)).length() < 1e-3);
    }
}
