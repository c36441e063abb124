//! Single-part selection state machine.
//!
//! States are [`SelectionState::Idle`] and [`SelectionState::Selected`]. A hit
//! moves the highlight to the struck part; a miss keeps the last selection so
//! later color and fabric choices still target it.

use tracing::{debug, warn};

use crate::error::ConfiguratorError;
use crate::registry::PartRegistry;
use crate::types::PartId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    /// Non-owning reference into the registry
    Selected(PartId),
}

impl SelectionState {
    pub fn current(&self) -> Option<&PartId> {
        match self {
            SelectionState::Selected(id) => Some(id),
            SelectionState::Idle => None,
        }
    }
}

/// Effect of a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// Highlight moved to `current`
    Selected {
        previous: Option<PartId>,
        current: PartId,
    },
    /// The struck part was already selected
    Unchanged(PartId),
    /// Pointer missed every part; the selection is kept
    Kept(Option<PartId>),
}

#[derive(Debug, Default)]
pub struct SelectionMachine {
    state: SelectionState,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn current(&self) -> Option<&PartId> {
        self.state.current()
    }

    /// Transition on a successful hit.
    ///
    /// Fails without touching any state when the part is unknown or its
    /// material has not loaded.
    pub fn on_hit(
        &mut self,
        part: &PartId,
        registry: &mut PartRegistry,
    ) -> Result<SelectionChange, ConfiguratorError> {
        if registry.find(part)?.material.is_none() {
            return Err(ConfiguratorError::AssetPending(part.clone()));
        }

        if self.current() == Some(part) {
            // Re-apply; a no-op unless something else cleared the highlight
            set_highlight(registry, part, true);
            return Ok(SelectionChange::Unchanged(part.clone()));
        }

        let previous = match std::mem::take(&mut self.state) {
            SelectionState::Selected(previous) => {
                set_highlight(registry, &previous, false);
                Some(previous)
            }
            SelectionState::Idle => None,
        };
        set_highlight(registry, part, true);
        self.state = SelectionState::Selected(part.clone());

        debug!("Selection: {:?} -> {}", previous, part);
        Ok(SelectionChange::Selected {
            previous,
            current: part.clone(),
        })
    }

    /// Transition on a miss. The state is unchanged.
    pub fn on_miss(&self) -> SelectionChange {
        SelectionChange::Kept(self.current().cloned())
    }

    /// Deselect, clearing the highlight. Returns the previously selected part.
    pub fn clear(&mut self, registry: &mut PartRegistry) -> Option<PartId> {
        match std::mem::take(&mut self.state) {
            SelectionState::Selected(previous) => {
                set_highlight(registry, &previous, false);
                Some(previous)
            }
            SelectionState::Idle => None,
        }
    }
}

fn set_highlight(registry: &mut PartRegistry, id: &PartId, on: bool) {
    match registry.find_mut(id) {
        Ok(part) => {
            if let Some(material) = part.material.as_mut() {
                material.set_highlight(on);
            }
        }
        Err(_) => warn!("Cannot update highlight: part {} is no longer registered", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{HIGHLIGHT_OPACITY, OPAQUE};
    use crate::registry::RecordingScene;
    use crate::types::{GeometryRef, SelectablePart};

    fn registry() -> PartRegistry {
        let mut scene = RecordingScene::default();
        let mut registry = PartRegistry::new();
        for (i, name) in ["sole", "upper", "tongue"].into_iter().enumerate() {
            registry.register(SelectablePart::mesh(name, GeometryRef(i as u64)), &mut scene);
        }
        registry.register(
            SelectablePart::mesh("laces", GeometryRef(3)).without_material(),
            &mut scene,
        );
        registry
    }

    fn highlighted(registry: &PartRegistry) -> Vec<&str> {
        registry
            .all()
            .iter()
            .filter(|p| p.is_highlighted())
            .map(|p| p.id.as_str())
            .collect()
    }

    #[test]
    fn test_starts_idle() {
        let machine = SelectionMachine::new();
        assert_eq!(machine.state(), &SelectionState::Idle);
        assert_eq!(machine.on_miss(), SelectionChange::Kept(None));
    }

    #[test]
    fn test_single_highlight_follows_latest_hit() {
        let mut registry = registry();
        let mut machine = SelectionMachine::new();

        for name in ["upper", "sole", "tongue", "sole", "sole", "upper"] {
            machine.on_hit(&name.into(), &mut registry).unwrap();
            assert_eq!(highlighted(&registry), [name]);
            assert_eq!(machine.current().map(PartId::as_str), Some(name));
        }
    }

    #[test]
    fn test_transition_sets_and_clears_highlight_fields() {
        let mut registry = registry();
        let mut machine = SelectionMachine::new();

        let first = machine.on_hit(&"upper".into(), &mut registry).unwrap();
        assert_eq!(
            first,
            SelectionChange::Selected {
                previous: None,
                current: "upper".into()
            }
        );
        let upper = registry.find(&"upper".into()).unwrap().material.clone().unwrap();
        assert_eq!(upper.opacity, HIGHLIGHT_OPACITY);
        assert!(upper.highlighted && upper.transparent);

        let second = machine.on_hit(&"sole".into(), &mut registry).unwrap();
        assert_eq!(
            second,
            SelectionChange::Selected {
                previous: Some("upper".into()),
                current: "sole".into()
            }
        );
        let upper = registry.find(&"upper".into()).unwrap().material.clone().unwrap();
        assert_eq!(upper.opacity, OPAQUE);
        assert!(!upper.highlighted);
    }

    #[test]
    fn test_reselect_is_idempotent() {
        let mut registry = registry();
        let mut machine = SelectionMachine::new();
        machine.on_hit(&"upper".into(), &mut registry).unwrap();
        registry.take_dirty();

        let change = machine.on_hit(&"upper".into(), &mut registry).unwrap();
        assert_eq!(change, SelectionChange::Unchanged("upper".into()));
        assert!(!registry.has_dirty());
    }

    #[test]
    fn test_miss_keeps_selection() {
        let mut registry = registry();
        let mut machine = SelectionMachine::new();
        machine.on_hit(&"tongue".into(), &mut registry).unwrap();

        assert_eq!(machine.on_miss(), SelectionChange::Kept(Some("tongue".into())));
        assert_eq!(highlighted(&registry), ["tongue"]);
    }

    #[test]
    fn test_pending_material_aborts_transition() {
        let mut registry = registry();
        let mut machine = SelectionMachine::new();
        machine.on_hit(&"sole".into(), &mut registry).unwrap();

        let err = machine.on_hit(&"laces".into(), &mut registry).unwrap_err();
        assert!(matches!(err, ConfiguratorError::AssetPending(_)));
        assert_eq!(machine.current().map(PartId::as_str), Some("sole"));
        assert_eq!(highlighted(&registry), ["sole"]);

        let err = machine.on_hit(&"heel".into(), &mut registry).unwrap_err();
        assert!(matches!(err, ConfiguratorError::NotFound { .. }));
        assert_eq!(machine.current().map(PartId::as_str), Some("sole"));
    }

    #[test]
    fn test_clear_drops_highlight() {
        let mut registry = registry();
        let mut machine = SelectionMachine::new();
        machine.on_hit(&"upper".into(), &mut registry).unwrap();

        assert_eq!(machine.clear(&mut registry), Some("upper".into()));
        assert!(highlighted(&registry).is_empty());
        assert_eq!(machine.clear(&mut registry), None);
        assert_eq!(machine.state(), &SelectionState::Idle);
    }
}
