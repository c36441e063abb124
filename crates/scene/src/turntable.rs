//! Optional turntable spin of the product model

use bevy::prelude::*;

use crate::lighting::SceneLighting;
use crate::stage::ShoeModel;

/// Turntable state. Speed comes from the tweak settings.
#[derive(Resource, Default)]
pub struct Turntable {
    pub enabled: bool,
}

impl Turntable {
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }
}

pub struct TurntablePlugin;

impl Plugin for TurntablePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Turntable>()
            .add_systems(Update, spin_model);
    }
}

/// Rotate the model about its vertical axis by the configured step per frame
fn spin_model(
    turntable: Res<Turntable>,
    lighting: Res<SceneLighting>,
    mut models: Query<&mut Transform, With<ShoeModel>>,
) {
    if !turntable.enabled {
        return;
    }
    let step = lighting.settings.rotation_speed;
    if step == 0.0 {
        return;
    }
    for mut transform in models.iter_mut() {
        transform.rotate_y(step);
    }
}
