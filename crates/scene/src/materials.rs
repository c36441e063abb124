//! Upload of configurator material state to Bevy materials
//!
//! The session marks a part's material dirty whenever color, fabric or
//! highlight changes. Once per frame the dirty set is drained and written
//! into the part's own [`StandardMaterial`].

use std::collections::HashMap;

use atelier_ipc::{EngineToUi, PartMaterialInfo};
use bevy::prelude::*;
use configurator::MaterialState;

use crate::convert::rgb_to_color;
use crate::parts::PartEntities;
use crate::{Configurator, ConfiguratorSet, OutboundUiMessages};

/// Texture maps the part had before any fabric was applied
#[derive(Component, Clone, Default)]
pub struct OriginalMaps {
    pub base_color_texture: Option<Handle<Image>>,
    pub normal_map_texture: Option<Handle<Image>>,
}

impl OriginalMaps {
    pub fn from_material(material: &StandardMaterial) -> Self {
        Self {
            base_color_texture: material.base_color_texture.clone(),
            normal_map_texture: material.normal_map_texture.clone(),
        }
    }
}

/// Loaded fabric images, keyed by asset path
#[derive(Resource, Default)]
pub struct FabricTextures {
    handles: HashMap<String, Handle<Image>>,
}

impl FabricTextures {
    /// Get the image for a path, starting the load on first use
    pub fn get_or_load(&mut self, path: &str, asset_server: &AssetServer) -> Handle<Image> {
        self.handles
            .entry(path.to_string())
            .or_insert_with(|| asset_server.load(path.to_string()))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

pub struct MaterialSyncPlugin;

impl Plugin for MaterialSyncPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FabricTextures>().add_systems(
            Update,
            sync_part_materials.in_set(ConfiguratorSet::Sync),
        );
    }
}

/// Write dirty material state into the parts' materials
fn sync_part_materials(
    mut configurator: ResMut<Configurator>,
    entities: Res<PartEntities>,
    parts: Query<(&MeshMaterial3d<StandardMaterial>, Option<&OriginalMaps>)>,
    asset_server: Res<AssetServer>,
    mut fabrics: ResMut<FabricTextures>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    let dirty = configurator.session.take_dirty_materials();
    if dirty.is_empty() {
        return;
    }

    for (id, state) in dirty {
        let Some(entity) = entities.entity(&id) else {
            debug!("Dirty material for detached part {}", id);
            continue;
        };
        let Ok((material_handle, originals)) = parts.get(entity) else {
            continue;
        };
        let Some(material) = materials.get_mut(&material_handle.0) else {
            continue;
        };

        apply_state(material, &state, originals);
        if let Some(texture) = &state.texture {
            material.base_color_texture = Some(fabrics.get_or_load(&texture.path, &asset_server));
            material.normal_map_texture = configurator
                .session
                .catalog()
                .fabric(&texture.swatch_id)
                .ok()
                .and_then(|swatch| swatch.normal_map_path.as_deref())
                .map(|path| fabrics.get_or_load(path, &asset_server));
        }

        outbound.send(EngineToUi::MaterialUpdated {
            part_id: id.to_string(),
            material: material_info(&state),
        });
    }
}

/// Color, opacity and blending. Without a fabric the original maps come back.
fn apply_state(
    material: &mut StandardMaterial,
    state: &MaterialState,
    originals: Option<&OriginalMaps>,
) {
    material.base_color = rgb_to_color(state.base_color, state.opacity);
    material.alpha_mode = if state.transparent {
        AlphaMode::Blend
    } else {
        AlphaMode::Opaque
    };

    if state.texture.is_none() {
        let originals = originals.cloned().unwrap_or_default();
        material.base_color_texture = originals.base_color_texture;
        material.normal_map_texture = originals.normal_map_texture;
    }
}

fn material_info(state: &MaterialState) -> PartMaterialInfo {
    PartMaterialInfo {
        base_color: state.base_color.to_hex(),
        fabric: state.texture.as_ref().map(|t| t.swatch_id.clone()),
        opacity: state.opacity,
        highlighted: state.highlighted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configurator::{Rgb, TextureRef};

    fn highlighted_state() -> MaterialState {
        let mut state = MaterialState::new(Rgb::from_hex("#d357fe").unwrap());
        state.opacity = 0.8;
        state.highlighted = true;
        state.transparent = true;
        state
    }

    #[test]
    fn test_highlight_uses_blend_and_alpha() {
        let mut material = StandardMaterial::default();
        apply_state(&mut material, &highlighted_state(), None);
        assert!(matches!(material.alpha_mode, AlphaMode::Blend));
        assert!((material.base_color.to_srgba().alpha - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_opaque_state_restores_original_maps() {
        let original = Handle::<Image>::default();
        let originals = OriginalMaps {
            base_color_texture: Some(original.clone()),
            normal_map_texture: None,
        };
        let mut material = StandardMaterial {
            alpha_mode: AlphaMode::Blend,
            ..default()
        };
        apply_state(&mut material, &MaterialState::new(Rgb::WHITE), Some(&originals));
        assert!(matches!(material.alpha_mode, AlphaMode::Opaque));
        assert_eq!(material.base_color_texture, Some(original));
    }

    #[test]
    fn test_material_info_reports_fabric_swatch() {
        let mut state = highlighted_state();
        state.texture = Some(TextureRef {
            swatch_id: "leather".to_string(),
            path: "fabrics/leather.jpg".to_string(),
        });
        let info = material_info(&state);
        assert_eq!(info.base_color, "#d357fe");
        assert_eq!(info.fabric.as_deref(), Some("leather"));
        assert!(info.highlighted);
    }
}
