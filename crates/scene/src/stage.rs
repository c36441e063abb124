//! Stage setup: product model, display stand and camera

use atelier_config::{DisplayConfig, StageLayout};
use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::camera::spawn_camera;
use crate::convert::hex_to_color;
use crate::{Configurator, ConfiguratorSet};

/// Marker for the root of the loaded product model
#[derive(Component)]
pub struct ShoeModel;

/// Marker for the display stand mesh
#[derive(Component)]
pub struct StandMesh;

/// Tracks the product model asset until it loads or fails
#[derive(Resource)]
pub struct ModelLoad {
    pub path: String,
    pub handle: Handle<Scene>,
    /// Set once a failure has been reported
    pub failed: bool,
}

pub struct StageLayoutPlugin;

impl Plugin for StageLayoutPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StageLayout>()
            .init_resource::<DisplayConfig>()
            .add_systems(Startup, setup_stage)
            .add_systems(
                Update,
                watch_model_load
                    .run_if(resource_exists::<ModelLoad>)
                    .in_set(ConfiguratorSet::Register),
            );
    }
}

fn setup_stage(
    mut commands: Commands,
    layout: Res<StageLayout>,
    display: Res<DisplayConfig>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    spawn_camera(&mut commands, &layout, &display);

    let model = &layout.model;
    let handle = asset_server.load(GltfAssetLabel::Scene(0).from_asset(model.path.clone()));
    commands.spawn((
        SceneRoot(handle.clone()),
        Transform::from_translation(Vec3::from_array(model.translation))
            .with_rotation(Quat::from_rotation_y(model.yaw_radians()))
            .with_scale(Vec3::splat(model.scale)),
        ShoeModel,
        Name::new("Shoe"),
    ));
    commands.insert_resource(ModelLoad {
        path: model.path.clone(),
        handle,
        failed: false,
    });

    let stand = &layout.stand;
    let emissive = hex_to_color(&stand.emissive).to_linear() * stand.emissive_strength;
    commands.spawn((
        Mesh3d(
            meshes.add(
                Cylinder::new(stand.radius, stand.height)
                    .mesh()
                    .resolution(stand.resolution),
            ),
        ),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: hex_to_color(&stand.color),
            emissive,
            metallic: stand.metallic,
            perceptual_roughness: stand.roughness,
            ..default()
        })),
        Transform::from_translation(Vec3::from_array(stand.translation)),
        StandMesh,
        Name::new("Stand"),
    ));

    info!("Stage initialized, loading model {}", model.path);
}

/// Report a failed model load to the session once. The model stays absent.
fn watch_model_load(
    asset_server: Res<AssetServer>,
    mut model_load: ResMut<ModelLoad>,
    mut configurator: ResMut<Configurator>,
) {
    if model_load.failed {
        return;
    }
    if let LoadState::Failed(err) = asset_server.load_state(&model_load.handle) {
        model_load.failed = true;
        configurator
            .session
            .asset_failed(&model_load.path, &err.to_string());
    }
}
