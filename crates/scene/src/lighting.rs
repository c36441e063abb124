//! Ambient plus key light, driven by the tweak settings

use atelier_config::StageLayout;
use atelier_ipc::TweakSettings;
use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;

/// Ambient brightness per unit of tweak intensity
const AMBIENT_BRIGHTNESS_PER_UNIT: f32 = 250.0;

/// Key light illuminance (lux) per unit of tweak intensity
const KEY_ILLUMINANCE_PER_UNIT: f32 = 4_000.0;

/// Marker component for the key directional light
#[derive(Component)]
pub struct KeyLight;

/// Resource for current lighting and turntable tweaks
#[derive(Resource)]
pub struct SceneLighting {
    /// Current tweak values
    pub settings: TweakSettings,
    /// Flag indicating settings have changed and need to be applied
    pub dirty: bool,
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self {
            settings: TweakSettings::default(),
            dirty: true, // Apply on first frame
        }
    }
}

impl SceneLighting {
    /// Update settings (clamped to their ranges) and mark as dirty
    pub fn update(&mut self, settings: TweakSettings) {
        self.settings = settings.clamped();
        self.dirty = true;
    }
}

/// Plugin for tweakable scene lighting
pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneLighting>()
            .init_resource::<StageLayout>()
            .add_systems(Startup, setup_lighting)
            .add_systems(Update, update_lighting);
    }
}

/// Spawn the key light and the ambient light
fn setup_lighting(
    mut commands: Commands,
    lighting: Res<SceneLighting>,
    layout: Res<StageLayout>,
) {
    let key_light = &layout.key_light;

    commands.spawn((
        DirectionalLight {
            illuminance: lighting.settings.directional_intensity * KEY_ILLUMINANCE_PER_UNIT,
            color: Color::WHITE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(Vec3::from_array(key_light.position))
            .looking_at(Vec3::from_array(key_light.look_at), Vec3::Y),
        KeyLight,
    ));

    // Global ambient light is a resource, not an entity
    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: lighting.settings.ambient_intensity * AMBIENT_BRIGHTNESS_PER_UNIT,
        ..default()
    });

    info!("Scene lighting initialized");
}

/// Update lighting when settings change
fn update_lighting(
    mut lighting: ResMut<SceneLighting>,
    mut key_query: Query<&mut DirectionalLight, With<KeyLight>>,
    mut ambient_light: ResMut<GlobalAmbientLight>,
) {
    if !lighting.dirty {
        return;
    }

    let settings = lighting.settings;
    for mut light in key_query.iter_mut() {
        light.illuminance = settings.directional_intensity * KEY_ILLUMINANCE_PER_UNIT;
    }
    ambient_light.brightness = settings.ambient_intensity * AMBIENT_BRIGHTNESS_PER_UNIT;

    lighting.dirty = false;
    debug!(
        "Scene lighting updated: ambient={} key={}",
        settings.ambient_intensity, settings.directional_intensity
    );
}
