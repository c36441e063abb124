//! Delivers outbound UI messages to the log
//!
//! The desktop build has no web UI; every message is written as JSON and the
//! order confirmation is printed once as readable lines.

use atelier_ipc::EngineToUi;
use atelier_scene::{ConfiguratorSet, OutboundUiMessages};
use bevy::prelude::*;

pub struct UiLogPlugin;

impl Plugin for UiLogPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, deliver_ui_messages.after(ConfiguratorSet::Sync));
    }
}

fn deliver_ui_messages(mut outbound: ResMut<OutboundUiMessages>) {
    for msg in outbound.drain() {
        match msg.to_json() {
            Ok(json) => debug!("-> ui {}", json),
            Err(err) => warn!("Failed to serialize UI message: {}", err),
        }

        match &msg {
            EngineToUi::OrderPlaced { summary } => {
                info!("Order placed");
                for line in summary.lines() {
                    info!("  {}", line);
                }
            }
            EngineToUi::SelectionChanged {
                selected_id: Some(id),
            } => info!("Selected {}", id),
            EngineToUi::SelectionChanged { selected_id: None } => info!("Selection cleared"),
            EngineToUi::Warning { code, message } => warn!("[{}] {}", code, message),
            _ => {}
        }
    }
}
