//! Color and fabric application to the selected part.
//!
//! These functions only write `base_color` and `texture`. Highlight state
//! belongs to the selection machine.

use tracing::debug;

use crate::error::ConfiguratorError;
use crate::registry::PartRegistry;
use crate::types::{MaterialState, PartId, Rgb, TextureRef};

/// Whether an apply call changed the material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Changed,
    /// The material already had this value
    Unchanged,
}

impl From<bool> for ApplyOutcome {
    fn from(changed: bool) -> Self {
        if changed {
            ApplyOutcome::Changed
        } else {
            ApplyOutcome::Unchanged
        }
    }
}

/// Set the selected part's base color.
pub fn apply_color(
    selected: Option<&PartId>,
    registry: &mut PartRegistry,
    color: Rgb,
) -> Result<ApplyOutcome, ConfiguratorError> {
    let (id, material) = paintable_material(selected, registry)?;
    let outcome = ApplyOutcome::from(material.set_base_color(color));
    debug!("apply_color: {} -> {} ({:?})", id, color, outcome);
    Ok(outcome)
}

/// Set the selected part's fabric texture.
pub fn apply_fabric(
    selected: Option<&PartId>,
    registry: &mut PartRegistry,
    texture: TextureRef,
) -> Result<ApplyOutcome, ConfiguratorError> {
    let (id, material) = paintable_material(selected, registry)?;
    let swatch = texture.swatch_id.clone();
    let outcome = ApplyOutcome::from(material.set_texture(Some(texture)));
    debug!("apply_fabric: {} -> {} ({:?})", id, swatch, outcome);
    Ok(outcome)
}

/// Remove the selected part's fabric texture, leaving the plain base color.
pub fn clear_fabric(
    selected: Option<&PartId>,
    registry: &mut PartRegistry,
) -> Result<ApplyOutcome, ConfiguratorError> {
    let (_, material) = paintable_material(selected, registry)?;
    Ok(ApplyOutcome::from(material.set_texture(None)))
}

fn paintable_material<'a>(
    selected: Option<&'a PartId>,
    registry: &'a mut PartRegistry,
) -> Result<(&'a PartId, &'a mut MaterialState), ConfiguratorError> {
    let id = selected.ok_or(ConfiguratorError::NoSelection)?;
    let part = registry.find_mut(id)?;
    if !part.paintable {
        return Err(ConfiguratorError::NotPaintable(id.clone()));
    }
    let material = part
        .material
        .as_mut()
        .ok_or_else(|| ConfiguratorError::AssetPending(id.clone()))?;
    Ok((id, material))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RecordingScene;
    use crate::selection::SelectionMachine;
    use crate::types::{GeometryRef, SelectablePart};

    fn velvet() -> TextureRef {
        TextureRef {
            swatch_id: "velvet".to_string(),
            path: "fabrics/velvet.jpg".to_string(),
        }
    }

    fn registry() -> PartRegistry {
        let mut scene = RecordingScene::default();
        let mut registry = PartRegistry::new();
        registry.register(SelectablePart::mesh("sole", GeometryRef(0)), &mut scene);
        registry.register(SelectablePart::mesh("upper", GeometryRef(1)), &mut scene);
        registry.register(SelectablePart::stand("stand", GeometryRef(2)), &mut scene);
        registry.take_dirty();
        registry
    }

    fn material<'a>(registry: &'a PartRegistry, id: &str) -> &'a MaterialState {
        registry.find(&id.into()).unwrap().material.as_ref().unwrap()
    }

    #[test]
    fn test_apply_color_is_idempotent() {
        let mut registry = registry();
        let upper: PartId = "upper".into();
        let navy = Rgb::from_hex("#112233").unwrap();

        assert_eq!(apply_color(Some(&upper), &mut registry, navy).unwrap(), ApplyOutcome::Changed);
        let once = material(&registry, "upper").clone();

        assert_eq!(apply_color(Some(&upper), &mut registry, navy).unwrap(), ApplyOutcome::Unchanged);
        assert_eq!(material(&registry, "upper"), &once);
        assert_eq!(once.base_color, navy);
    }

    #[test]
    fn test_apply_fabric_and_clear() {
        let mut registry = registry();
        let sole: PartId = "sole".into();

        assert_eq!(apply_fabric(Some(&sole), &mut registry, velvet()).unwrap(), ApplyOutcome::Changed);
        assert_eq!(material(&registry, "sole").texture, Some(velvet()));
        assert_eq!(apply_fabric(Some(&sole), &mut registry, velvet()).unwrap(), ApplyOutcome::Unchanged);

        assert_eq!(clear_fabric(Some(&sole), &mut registry).unwrap(), ApplyOutcome::Changed);
        assert_eq!(material(&registry, "sole").texture, None);
    }

    #[test]
    fn test_no_selection_mutates_nothing() {
        let mut registry = registry();

        let err = apply_fabric(None, &mut registry, velvet()).unwrap_err();
        assert!(matches!(err, ConfiguratorError::NoSelection));
        let err = apply_color(None, &mut registry, Rgb::new(1, 2, 3)).unwrap_err();
        assert!(matches!(err, ConfiguratorError::NoSelection));
        assert!(!registry.has_dirty());
    }

    #[test]
    fn test_stand_rejects_paint() {
        let mut registry = registry();
        let stand: PartId = "stand".into();
        let err = apply_color(Some(&stand), &mut registry, Rgb::new(1, 2, 3)).unwrap_err();
        assert!(matches!(err, ConfiguratorError::NotPaintable(_)));
        assert_eq!(material(&registry, "stand").base_color, Rgb::WHITE);
    }

    #[test]
    fn test_apply_leaves_highlight_alone() {
        let mut registry = registry();
        let mut selection = SelectionMachine::new();
        selection.on_hit(&"upper".into(), &mut registry).unwrap();
        let before = material(&registry, "upper").clone();

        apply_color(selection.current(), &mut registry, Rgb::new(9, 9, 9)).unwrap();
        apply_fabric(selection.current(), &mut registry, velvet()).unwrap();

        let after = material(&registry, "upper");
        assert_eq!(after.opacity, before.opacity);
        assert_eq!(after.highlighted, before.highlighted);
        assert_eq!(after.transparent, before.transparent);
    }
}
