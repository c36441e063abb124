//! Click-to-select for configurator parts
//!
//! The cursor, the viewport and the camera's view and projection go to the
//! configurator session, which unprojects the ray and hit tests it against
//! [`PartRayCaster`].

use bevy::input::mouse::MouseButton;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use configurator::HitResult;

use crate::camera::MainCamera;
use crate::convert::{camera_projection, vec2_from_bevy};
use crate::parts::PartRayCaster;
use crate::{Configurator, ConfiguratorSet};

pub struct PickingPlugin;

impl Plugin for PickingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            handle_click_picking.in_set(ConfiguratorSet::Interact),
        );
    }
}

/// Pick the part under the cursor on left click
fn handle_click_picking(
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    caster: Res<PartRayCaster>,
    mut configurator: ResMut<Configurator>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };

    pick_at_viewport(cursor_pos, &camera_query, &caster, &mut configurator);
}

/// Hit test a viewport position and transition the selection
pub(crate) fn pick_at_viewport(
    cursor_pos: Vec2,
    camera_query: &Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    caster: &PartRayCaster,
    configurator: &mut Configurator,
) -> HitResult {
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return HitResult::NoHit;
    };
    let Some(viewport) = camera.logical_viewport_rect() else {
        return HitResult::NoHit;
    };

    let hit = configurator.session.pick_at(
        vec2_from_bevy(cursor_pos - viewport.min),
        vec2_from_bevy(viewport.size()),
        &camera_projection(camera_transform, camera.clip_from_view()),
        &caster.0,
    );
    match &hit {
        HitResult::Hit { part, distance } => {
            debug!("Picked {} at distance {:.3}", part, distance);
        }
        HitResult::NoHit => debug!("Pick at {:?} hit nothing", cursor_pos),
    }
    hit
}
