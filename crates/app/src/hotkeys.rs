//! Keyboard shortcuts standing in for the swatch UI
//!
//! - 1-9: color swatch
//! - Shift+1-9: fabric swatch
//! - Backspace: remove fabric from the selected part
//! - Tab: start/stop typing initials
//! - Enter: place order
//! - Space: toggle turntable

use atelier_ipc::UiToEngine;
use atelier_scene::{Configurator, InboundUiMessages, Turntable};
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

const DIGIT_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Initials being typed
#[derive(Resource, Default)]
pub struct InitialsEntry {
    pub active: bool,
    pub text: String,
}

impl InitialsEntry {
    /// Apply one key press. Returns true if the text changed.
    fn edit(&mut self, key: &Key) -> bool {
        match key {
            Key::Character(chars) => {
                self.text.push_str(chars);
                true
            }
            Key::Backspace => self.text.pop().is_some(),
            _ => false,
        }
    }
}

pub struct HotkeyPlugin;

impl Plugin for HotkeyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InitialsEntry>().add_systems(
            Update,
            (handle_initials_entry, handle_swatch_hotkeys)
                .chain()
                .before(atelier_scene::ConfiguratorSet::Interact),
        );
    }
}

fn handle_swatch_hotkeys(
    key_input: Res<ButtonInput<KeyCode>>,
    entry: Res<InitialsEntry>,
    configurator: Res<Configurator>,
    mut turntable: ResMut<Turntable>,
    mut inbound: ResMut<InboundUiMessages>,
) {
    // Keys belong to the text field while typing
    if entry.active {
        return;
    }

    let shift = key_input.pressed(KeyCode::ShiftLeft) || key_input.pressed(KeyCode::ShiftRight);
    let catalog = configurator.session.catalog();

    for (index, key) in DIGIT_KEYS.iter().enumerate() {
        if !key_input.just_pressed(*key) {
            continue;
        }
        if shift {
            if let Some(fabric) = catalog.fabrics.get(index) {
                inbound.push(UiToEngine::ChooseFabricSwatch {
                    fabric: fabric.id.clone(),
                });
            }
        } else if let Some(color) = catalog.colors.get(index) {
            inbound.push(UiToEngine::ChooseColorSwatch {
                color: color.color.to_hex(),
            });
        }
    }

    if key_input.just_pressed(KeyCode::Backspace) {
        inbound.push(UiToEngine::RemoveFabric);
    }
    if key_input.just_pressed(KeyCode::Enter) {
        inbound.push(UiToEngine::PlaceOrder);
    }
    if key_input.just_pressed(KeyCode::Space) {
        let enabled = turntable.toggle();
        info!("Turntable {}", if enabled { "on" } else { "off" });
    }
}

fn handle_initials_entry(
    key_input: Res<ButtonInput<KeyCode>>,
    mut key_events: MessageReader<KeyboardInput>,
    mut entry: ResMut<InitialsEntry>,
    mut inbound: ResMut<InboundUiMessages>,
) {
    if key_input.just_pressed(KeyCode::Tab) {
        entry.active = !entry.active;
        key_events.clear();
        info!(
            "Initials entry {}",
            if entry.active { "started" } else { "finished" }
        );
        return;
    }
    if !entry.active {
        key_events.clear();
        return;
    }

    let mut changed = false;
    for event in key_events.read() {
        if event.state.is_pressed() && event.key_code != KeyCode::Enter {
            changed |= entry.edit(&event.logical_key);
        }
    }
    if changed {
        inbound.push(UiToEngine::SetPersonalization {
            text: entry.text.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials_editing() {
        let mut entry = InitialsEntry::default();
        assert!(entry.edit(&Key::Character("J".into())));
        assert!(entry.edit(&Key::Character("D".into())));
        assert_eq!(entry.text, "JD");
        assert!(entry.edit(&Key::Backspace));
        assert_eq!(entry.text, "J");
        assert!(!entry.edit(&Key::Shift));
    }

    #[test]
    fn test_backspace_on_empty_is_no_change() {
        let mut entry = InitialsEntry::default();
        assert!(!entry.edit(&Key::Backspace));
    }
}
