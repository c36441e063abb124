//! Bevy scene layer for Atelier
//!
//! Stages the product model, display stand, camera and lights, feeds loaded
//! meshes into the configurator session and mirrors the session's material
//! state back onto Bevy materials.

use bevy::prelude::*;
use atelier_ipc::{EngineToUi, UiToEngine};
use configurator::ConfiguratorSession;

mod camera;
mod convert;
mod lighting;
mod materials;
mod parts;
mod picking;
mod stage;
mod turntable;
mod ui_bridge;

pub use camera::MainCamera;
pub use lighting::{KeyLight, LightingPlugin, SceneLighting};
pub use materials::{FabricTextures, MaterialSyncPlugin, OriginalMaps};
pub use parts::{GeometryIdGenerator, PartEntities, PartRayCaster, PartVisited, PartsPlugin, PickablePart};
pub use picking::PickingPlugin;
pub use stage::{ModelLoad, ShoeModel, StageLayoutPlugin, StandMesh};
pub use turntable::{Turntable, TurntablePlugin};
pub use ui_bridge::UiBridgePlugin;

/// The configurator session, owned by the ECS world
#[derive(Resource, Default)]
pub struct Configurator {
    pub session: ConfiguratorSession,
}

impl Configurator {
    pub fn new(session: ConfiguratorSession) -> Self {
        Self { session }
    }
}

/// Resource for queuing messages to send to the UI
/// The host (app crate) drains this and delivers the messages
#[derive(Resource, Default)]
pub struct OutboundUiMessages {
    pub messages: Vec<EngineToUi>,
}

impl OutboundUiMessages {
    /// Queue a message to be sent to the UI
    pub fn send(&mut self, msg: EngineToUi) {
        self.messages.push(msg);
    }

    /// Take all queued messages, leaving the queue empty
    pub fn drain(&mut self) -> Vec<EngineToUi> {
        std::mem::take(&mut self.messages)
    }
}

/// Resource for messages posted by the UI, processed once per frame
#[derive(Resource, Default)]
pub struct InboundUiMessages {
    pub messages: Vec<UiToEngine>,
}

impl InboundUiMessages {
    pub fn push(&mut self, msg: UiToEngine) {
        self.messages.push(msg);
    }

    pub fn drain(&mut self) -> Vec<UiToEngine> {
        std::mem::take(&mut self.messages)
    }
}

/// System sets for ordering the configurator frame
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfiguratorSet {
    /// Loaded meshes become parts
    Register,
    /// Pointer and UI events mutate the session
    Interact,
    /// Session state flows out to materials and the UI
    Sync,
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Configurator>()
            .init_resource::<OutboundUiMessages>()
            .init_resource::<InboundUiMessages>()
            .configure_sets(
                Update,
                (
                    ConfiguratorSet::Register,
                    ConfiguratorSet::Interact,
                    ConfiguratorSet::Sync,
                )
                    .chain(),
            );

        app.add_plugins(StageLayoutPlugin);
        app.add_plugins(LightingPlugin);
        app.add_plugins(PartsPlugin);
        app.add_plugins(PickingPlugin);
        app.add_plugins(MaterialSyncPlugin);
        app.add_plugins(TurntablePlugin);
        app.add_plugins(UiBridgePlugin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_ipc::TweakSettings;

    #[test]
    fn test_outbound_drain_empties_queue() {
        let mut outbound = OutboundUiMessages::default();
        outbound.send(EngineToUi::SelectionChanged { selected_id: None });
        outbound.send(EngineToUi::Warning {
            code: "no_selection".to_string(),
            message: "No part selected".to_string(),
        });
        assert_eq!(outbound.drain().len(), 2);
        assert!(outbound.drain().is_empty());
    }

    #[test]
    fn test_inbound_preserves_order() {
        let mut inbound = InboundUiMessages::default();
        inbound.push(UiToEngine::PlaceOrder);
        inbound.push(UiToEngine::UpdateTweaks(TweakSettings::default()));
        let drained = inbound.drain();
        assert_eq!(drained[0], UiToEngine::PlaceOrder);
        assert!(inbound.drain().is_empty());
    }
}
