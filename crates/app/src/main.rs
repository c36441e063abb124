//! Atelier - interactive shoe configurator

use atelier_config::DisplayConfig;
use atelier_scene::{Configurator, ScenePlugin};
use bevy::prelude::*;
use bevy::window::WindowResolution;
use configurator::{ConfiguratorSession, HitTestResolver};

mod config;
mod hotkeys;
mod ui_log;

use config::AtelierConfig;

fn main() {
    // Parse configuration from environment
    let config = AtelierConfig::from_env();
    let layout = config.stage_layout();
    let session = ConfiguratorSession::new(config.swatch_catalog(), HitTestResolver::default());

    // Display configuration - single source of truth for window size
    let display_config = DisplayConfig::default();

    let window_config = Window {
        title: "Atelier".into(),
        resolution: WindowResolution::new(display_config.width, display_config.height),
        present_mode: bevy::window::PresentMode::AutoVsync,
        ..default()
    };

    let mut app = App::new();

    app.insert_resource(config)
        .insert_resource(display_config)
        .insert_resource(layout)
        .insert_resource(Configurator::new(session));

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(window_config),
                ..default()
            })
            .set(bevy::log::LogPlugin {
                level: bevy::log::Level::INFO,
                filter: "wgpu=error,naga=warn,configurator=debug,atelier_scene=debug".to_string(),
                ..default()
            }),
    );

    app.add_plugins(ScenePlugin)
        .add_plugins(hotkeys::HotkeyPlugin)
        .add_plugins(ui_log::UiLogPlugin)
        .run();
}
