//! UI message handling
//!
//! Inbound [`UiToEngine`] messages are dispatched to the configurator
//! session; session events are translated into outbound [`EngineToUi`]
//! messages.

use atelier_ipc::{CatalogInfo, EngineToUi, OrderSummaryInfo, SwatchInfo, UiToEngine};
use bevy::prelude::*;
use configurator::{OrderSummary, SessionEvent, SwatchCatalog};

use crate::camera::MainCamera;
use crate::lighting::SceneLighting;
use crate::parts::PartRayCaster;
use crate::picking::pick_at_viewport;
use crate::{Configurator, ConfiguratorSet, InboundUiMessages, OutboundUiMessages};

pub struct UiBridgePlugin;

impl Plugin for UiBridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostStartup, send_initial_state)
            .add_systems(
                Update,
                (
                    process_ui_messages.in_set(ConfiguratorSet::Interact),
                    forward_session_events.in_set(ConfiguratorSet::Sync),
                ),
            );
    }
}

fn send_initial_state(
    configurator: Res<Configurator>,
    lighting: Res<SceneLighting>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    outbound.send(EngineToUi::Initialize {
        catalog: catalog_info(configurator.session.catalog()),
        tweaks: lighting.settings,
    });
}

/// Dispatch UI messages to the session
fn process_ui_messages(
    mut inbound: ResMut<InboundUiMessages>,
    mut configurator: ResMut<Configurator>,
    mut lighting: ResMut<SceneLighting>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    caster: Res<PartRayCaster>,
) {
    for msg in inbound.drain() {
        match msg {
            UiToEngine::PickAt { x, y } => {
                pick_at_viewport(Vec2::new(x, y), &camera_query, &caster, &mut configurator);
            }
            UiToEngine::ChooseColorSwatch { color } => {
                configurator.session.choose_color_swatch(&color);
            }
            UiToEngine::PaintPart { color } => {
                configurator.session.paint_selected(&color);
            }
            UiToEngine::ChooseFabricSwatch { fabric } => {
                configurator.session.choose_fabric_swatch(&fabric);
            }
            UiToEngine::RemoveFabric => {
                configurator.session.remove_fabric();
            }
            UiToEngine::SetPersonalization { text } => {
                configurator.session.set_personalization(&text);
            }
            UiToEngine::PlaceOrder => {
                configurator.session.place_order();
            }
            UiToEngine::UpdateTweaks(tweaks) => {
                lighting.update(tweaks);
            }
        }
    }
}

/// Translate session events into UI messages
fn forward_session_events(
    mut configurator: ResMut<Configurator>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    for event in configurator.session.take_events() {
        outbound.send(event_to_ui(event));
    }
}

pub(crate) fn event_to_ui(event: SessionEvent) -> EngineToUi {
    match event {
        SessionEvent::PartsRegistered(ids) => EngineToUi::PartsLoaded {
            part_ids: ids.iter().map(ToString::to_string).collect(),
        },
        SessionEvent::SelectionChanged { current, .. } => EngineToUi::SelectionChanged {
            selected_id: Some(current.to_string()),
        },
        SessionEvent::Deselected { .. } => EngineToUi::SelectionChanged { selected_id: None },
        SessionEvent::OrderPlaced(summary) => EngineToUi::OrderPlaced {
            summary: summary_info(&summary),
        },
        SessionEvent::Warning { code, message } => EngineToUi::Warning {
            code: code.to_string(),
            message,
        },
    }
}

pub(crate) fn summary_info(summary: &OrderSummary) -> OrderSummaryInfo {
    OrderSummaryInfo {
        color: summary.color_choice().to_string(),
        fabric: summary.fabric_choice().to_string(),
        initials: summary.personalization_text().to_string(),
    }
}

pub(crate) fn catalog_info(catalog: &SwatchCatalog) -> CatalogInfo {
    CatalogInfo {
        colors: catalog
            .colors
            .iter()
            .map(|swatch| SwatchInfo {
                name: swatch.name.clone(),
                value: swatch.color.to_hex(),
                preview_path: None,
            })
            .collect(),
        fabrics: catalog
            .fabrics
            .iter()
            .map(|swatch| SwatchInfo {
                name: swatch.name.clone(),
                value: swatch.id.clone(),
                preview_path: Some(swatch.texture_path.clone()),
            })
            .collect(),
    }
}
