//! Registry of selectable parts.
//!
//! The registry exclusively owns every [`SelectablePart`] for the lifetime of
//! the loaded model. Membership changes go through a [`SceneGraph`] so that a
//! part is in the registry exactly when it is attached to the scene.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::ConfiguratorError;
use crate::types::{MaterialState, PartId, SelectablePart};

/// Scene graph attach/detach, provided by the renderer.
pub trait SceneGraph {
    fn attach(&mut self, part: &SelectablePart);
    fn detach(&mut self, part: &SelectablePart);
}

/// Result of [`PartRegistry::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered,
    /// A part with the same id already exists; nothing changed
    Duplicate,
}

#[derive(Debug, Default)]
pub struct PartRegistry {
    /// Parts in registration order (hit-test tie-break order)
    parts: Vec<SelectablePart>,
    index: HashMap<PartId, usize>,
}

impl PartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a part to the scene and append it.
    ///
    /// Registering an id twice is a benign no-op.
    pub fn register(&mut self, part: SelectablePart, scene: &mut dyn SceneGraph) -> RegisterOutcome {
        if self.index.contains_key(&part.id) {
            warn!("Part {} is already registered, ignoring duplicate", part.id);
            return RegisterOutcome::Duplicate;
        }

        scene.attach(&part);
        debug!(
            "Registered part {} ({:?}, pickable={}, paintable={})",
            part.id, part.kind, part.pickable, part.paintable
        );
        self.index.insert(part.id.clone(), self.parts.len());
        self.parts.push(part);
        RegisterOutcome::Registered
    }

    /// Detach a part from the scene and remove it.
    pub fn unregister(
        &mut self,
        id: &PartId,
        scene: &mut dyn SceneGraph,
    ) -> Result<SelectablePart, ConfiguratorError> {
        let position = self
            .index
            .remove(id)
            .ok_or_else(|| ConfiguratorError::part_not_found(id))?;
        let part = self.parts.remove(position);
        scene.detach(&part);

        // Later parts shifted down by one
        for (offset, later) in self.parts[position..].iter().enumerate() {
            self.index.insert(later.id.clone(), position + offset);
        }
        debug!("Unregistered part {}", part.id);
        Ok(part)
    }

    /// All parts in registration order
    pub fn all(&self) -> &[SelectablePart] {
        &self.parts
    }

    /// Hit-test candidates in registration order
    pub fn candidates(&self) -> impl Iterator<Item = &SelectablePart> {
        self.parts.iter().filter(|part| part.pickable)
    }

    pub fn find(&self, id: &PartId) -> Result<&SelectablePart, ConfiguratorError> {
        self.index
            .get(id)
            .map(|&i| &self.parts[i])
            .ok_or_else(|| ConfiguratorError::part_not_found(id))
    }

    pub fn find_mut(&mut self, id: &PartId) -> Result<&mut SelectablePart, ConfiguratorError> {
        match self.index.get(id) {
            Some(&i) => Ok(&mut self.parts[i]),
            None => Err(ConfiguratorError::part_not_found(id)),
        }
    }

    pub fn contains(&self, id: &PartId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Materials changed since the last call, for upload to the renderer.
    /// Clears the dirty flags.
    pub fn take_dirty(&mut self) -> Vec<(PartId, MaterialState)> {
        let mut dirty = Vec::new();
        for part in &mut self.parts {
            if let Some(material) = part.material.as_mut().filter(|m| m.is_dirty()) {
                material.clear_dirty();
                dirty.push((part.id.clone(), material.clone()));
            }
        }
        dirty
    }

    /// Check if any material awaits upload
    pub fn has_dirty(&self) -> bool {
        self.parts
            .iter()
            .any(|part| part.material.as_ref().is_some_and(|m| m.is_dirty()))
    }
}

/// Scene graph for hosts that attach nodes themselves; membership is only
/// recorded.
#[derive(Debug, Default)]
pub struct RecordingScene {
    pub attached: Vec<PartId>,
}

impl SceneGraph for RecordingScene {
    fn attach(&mut self, part: &SelectablePart) {
        self.attached.push(part.id.clone());
    }

    fn detach(&mut self, part: &SelectablePart) {
        self.attached.retain(|id| id != &part.id);
    }
}
