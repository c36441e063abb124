//! Registration of loaded meshes as configurator parts
//!
//! Every mesh under the [`ShoeModel`] root, plus the [`StandMesh`], is
//! registered with the session once its mesh and material assets are
//! available. Each part gets its own material so painting one part never
//! bleeds into another part that shared the glTF material.

use std::collections::{HashMap, HashSet};

use bevy::mesh::Indices;
use bevy::prelude::*;
use configurator::{
    GeometryRef, MaterialState, MeshRayCaster, PartId, RaycastMesh, SceneGraph, SelectablePart,
};

use crate::convert::{color_to_rgb, mat4_from_transform, positions_from_arrays};
use crate::materials::OriginalMaps;
use crate::stage::{ShoeModel, StandMesh};
use crate::{Configurator, ConfiguratorSet};

/// Component linking an entity to its registered part
#[derive(Component, Debug, Clone)]
pub struct PickablePart {
    pub id: PartId,
    pub geometry: GeometryRef,
}

/// Marker for mesh entities already considered for registration
#[derive(Component)]
pub struct PartVisited;

/// Resource for generating unique geometry handles
#[derive(Resource, Default)]
pub struct GeometryIdGenerator {
    next_id: u64,
}

impl GeometryIdGenerator {
    /// Generate the next unique geometry handle
    pub fn next(&mut self) -> GeometryRef {
        let id = self.next_id;
        self.next_id += 1;
        GeometryRef(id)
    }
}

/// Entity lookup for registered parts
#[derive(Resource, Default)]
pub struct PartEntities {
    by_part: HashMap<PartId, Entity>,
}

impl PartEntities {
    pub fn entity(&self, id: &PartId) -> Option<Entity> {
        self.by_part.get(id).copied()
    }

    pub fn part_for(&self, entity: Entity) -> Option<&PartId> {
        self.by_part
            .iter()
            .find_map(|(id, e)| (*e == entity).then_some(id))
    }

    pub fn len(&self) -> usize {
        self.by_part.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_part.is_empty()
    }
}

/// CPU-side triangle data of every registered part, in world space
#[derive(Resource, Default)]
pub struct PartRayCaster(pub MeshRayCaster);

/// [`SceneGraph`] backed by ECS commands.
///
/// Attaching tags the entity with [`PickablePart`]; detaching removes the
/// tag. Entities waiting for attachment are keyed by geometry.
struct StageGraph<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    entities: &'a mut PartEntities,
    pending: HashMap<GeometryRef, Entity>,
}

impl SceneGraph for StageGraph<'_, '_, '_> {
    fn attach(&mut self, part: &SelectablePart) {
        let Some(entity) = self.pending.remove(&part.geometry) else {
            warn!("No entity for part {} ({:?})", part.id, part.geometry);
            return;
        };
        self.commands.entity(entity).insert(PickablePart {
            id: part.id.clone(),
            geometry: part.geometry,
        });
        self.entities.by_part.insert(part.id.clone(), entity);
    }

    fn detach(&mut self, part: &SelectablePart) {
        let Some(entity) = self.entities.by_part.remove(&part.id) else {
            return;
        };
        if let Ok(mut entity_commands) = self.commands.get_entity(entity) {
            entity_commands.try_remove::<PickablePart>();
        }
    }
}

pub struct PartsPlugin;

impl Plugin for PartsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GeometryIdGenerator>()
            .init_resource::<PartEntities>()
            .init_resource::<PartRayCaster>()
            .add_systems(
                Update,
                (register_loaded_parts, forget_despawned_parts, sync_part_transforms)
                    .chain()
                    .in_set(ConfiguratorSet::Register),
            );
    }
}

/// Register meshes whose assets have arrived
#[allow(clippy::too_many_arguments)]
fn register_loaded_parts(
    mut commands: Commands,
    candidates: Query<
        (
            Entity,
            &Mesh3d,
            &MeshMaterial3d<StandardMaterial>,
            &GlobalTransform,
            Has<StandMesh>,
        ),
        Without<PartVisited>,
    >,
    parents: Query<&ChildOf>,
    names: Query<&Name>,
    models: Query<(), With<ShoeModel>>,
    meshes: Res<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut ids: ResMut<GeometryIdGenerator>,
    mut caster: ResMut<PartRayCaster>,
    mut entities: ResMut<PartEntities>,
    mut configurator: ResMut<Configurator>,
) {
    let mut loaded = Vec::new();
    let mut pending = HashMap::new();
    let mut taken: HashSet<PartId> = HashSet::new();

    for (entity, mesh_handle, material_handle, transform, is_stand) in candidates.iter() {
        let in_model = parents
            .iter_ancestors(entity)
            .any(|ancestor| models.contains(ancestor));
        if !is_stand && !in_model {
            commands.entity(entity).insert(PartVisited);
            continue;
        }

        // Wait for both assets
        let Some(mesh) = meshes.get(&mesh_handle.0) else {
            continue;
        };
        let Some(source) = materials.get(&material_handle.0).cloned() else {
            continue;
        };
        commands.entity(entity).insert(PartVisited);

        let Some(raycast_mesh) = raycast_mesh_from(mesh) else {
            warn!("Mesh on {:?} has no usable positions, skipping", entity);
            continue;
        };

        let geometry = ids.next();
        let base_name = part_name(entity, &parents, &names)
            .unwrap_or_else(|| format!("part-{}", geometry.0));
        let id = unique_part_id(base_name, geometry, |id| {
            taken.contains(id) || configurator.session.registry().contains(id)
        });
        taken.insert(id.clone());

        let state = MaterialState::new(color_to_rgb(source.base_color));
        let originals = OriginalMaps::from_material(&source);
        let owned_material = materials.add(source);
        commands
            .entity(entity)
            .insert((MeshMaterial3d(owned_material), originals));

        caster
            .0
            .insert(geometry, raycast_mesh, mat4_from_transform(transform));
        pending.insert(geometry, entity);

        let part = if is_stand {
            SelectablePart::stand(id, geometry)
        } else {
            SelectablePart::mesh(id, geometry)
        };
        loaded.push(part.with_material(state));
    }

    if loaded.is_empty() {
        return;
    }

    let mut graph = StageGraph {
        commands: &mut commands,
        entities: &mut entities,
        pending,
    };
    configurator.session.parts_loaded(loaded, &mut graph);

    // Parts the registry refused keep no raycast data
    let StageGraph { pending, .. } = graph;
    for (geometry, entity) in pending {
        debug!("Part on {:?} was not registered", entity);
        caster.0.remove(geometry);
    }
}

/// Unregister parts whose entity went away (e.g. the model was despawned)
fn forget_despawned_parts(
    mut commands: Commands,
    mut removed: RemovedComponents<PickablePart>,
    mut entities: ResMut<PartEntities>,
    mut caster: ResMut<PartRayCaster>,
    mut configurator: ResMut<Configurator>,
) {
    let gone: Vec<PartId> = removed
        .read()
        .filter_map(|entity| entities.part_for(entity).cloned())
        .collect();

    for id in gone {
        if let Ok(part) = configurator.session.registry().find(&id) {
            caster.0.remove(part.geometry);
        }
        let mut graph = StageGraph {
            commands: &mut commands,
            entities: &mut entities,
            pending: HashMap::new(),
        };
        configurator.session.remove_part(&id, &mut graph);
    }
}

/// Keep raycast transforms in step with the rendered transforms
fn sync_part_transforms(
    mut caster: ResMut<PartRayCaster>,
    parts: Query<
        (&PickablePart, &GlobalTransform),
        Or<(Changed<GlobalTransform>, Added<PickablePart>)>,
    >,
) {
    for (part, transform) in parts.iter() {
        caster
            .0
            .set_transform(part.geometry, mat4_from_transform(transform));
    }
}

/// Extract a triangle list from a render mesh. Non-indexed meshes are read
/// as consecutive triangles.
fn raycast_mesh_from(mesh: &Mesh) -> Option<RaycastMesh> {
    let positions = mesh.attribute(Mesh::ATTRIBUTE_POSITION)?.as_float3()?;
    let indices: Vec<u32> = match mesh.indices() {
        Some(Indices::U16(idx)) => idx.iter().map(|&i| i as u32).collect(),
        Some(Indices::U32(idx)) => idx.clone(),
        None => (0..positions.len() as u32).collect(),
    };
    Some(RaycastMesh::new(positions_from_arrays(positions), indices))
}

/// Name of the entity, or of its closest named ancestor
fn part_name(entity: Entity, parents: &Query<&ChildOf>, names: &Query<&Name>) -> Option<String> {
    std::iter::once(entity)
        .chain(parents.iter_ancestors(entity))
        .find_map(|e| names.get(e).ok())
        .map(|name| name.as_str().to_string())
}

/// glTF primitives of one mesh share a name; suffix the geometry handle on
/// collision
fn unique_part_id(
    base: String,
    geometry: GeometryRef,
    is_taken: impl Fn(&PartId) -> bool,
) -> PartId {
    let id = PartId::new(base);
    if !is_taken(&id) {
        return id;
    }
    PartId::new(format!("{}#{}", id, geometry.0))
}
