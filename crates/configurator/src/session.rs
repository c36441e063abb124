//! Configurator session: the event-driven entry point.
//!
//! The session owns the registry, the selection machine, the order
//! configuration and the catalog, and exposes one method per UI event. Every
//! handler runs to completion. Recoverable errors are logged, recorded as
//! warnings and turned into no-ops; nothing propagates to the caller.

use std::collections::VecDeque;

use glam::Vec2;
use tracing::{debug, info, warn};

use crate::appearance::{self, ApplyOutcome};
use crate::catalog::SwatchCatalog;
use crate::constants::MAX_RECORDED_WARNINGS;
use crate::error::ConfiguratorError;
use crate::hit_test::{HitResult, HitTestResolver};
use crate::order::{OrderConfiguration, OrderSummary};
use crate::raycast::{CameraProjection, Ray, RayCaster};
use crate::registry::{PartRegistry, RegisterOutcome, SceneGraph};
use crate::selection::{SelectionChange, SelectionMachine, SelectionState};
use crate::types::{MaterialState, PartId, Rgb, SelectablePart};

/// Notifications for the UI, drained with [`ConfiguratorSession::take_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PartsRegistered(Vec<PartId>),
    SelectionChanged {
        previous: Option<PartId>,
        current: PartId,
    },
    /// The selected part was removed; the selection is idle.
    Deselected {
        previous: PartId,
    },
    /// One-shot order confirmation
    OrderPlaced(OrderSummary),
    Warning {
        code: &'static str,
        message: String,
    },
}

#[derive(Debug)]
pub struct ConfiguratorSession {
    registry: PartRegistry,
    selection: SelectionMachine,
    resolver: HitTestResolver,
    order: OrderConfiguration,
    catalog: SwatchCatalog,
    events: Vec<SessionEvent>,
    warnings: VecDeque<ConfiguratorError>,
}

impl Default for ConfiguratorSession {
    fn default() -> Self {
        Self::new(SwatchCatalog::builtin(), HitTestResolver::default())
    }
}

impl ConfiguratorSession {
    pub fn new(catalog: SwatchCatalog, resolver: HitTestResolver) -> Self {
        Self {
            registry: PartRegistry::new(),
            selection: SelectionMachine::new(),
            resolver,
            order: OrderConfiguration::new(),
            catalog,
            events: Vec::new(),
            warnings: VecDeque::new(),
        }
    }

    pub fn registry(&self) -> &PartRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn selected_part(&self) -> Option<&PartId> {
        self.selection.current()
    }

    pub fn catalog(&self) -> &SwatchCatalog {
        &self.catalog
    }

    pub fn order(&self) -> &OrderConfiguration {
        &self.order
    }

    /// Asset completion callback: register the parts of a loaded model.
    /// Returns the number of newly registered parts.
    pub fn parts_loaded(
        &mut self,
        parts: impl IntoIterator<Item = SelectablePart>,
        scene: &mut dyn SceneGraph,
    ) -> usize {
        let mut registered = Vec::new();
        for part in parts {
            let id = part.id.clone();
            if self.registry.register(part, scene) == RegisterOutcome::Registered {
                registered.push(id);
            }
        }

        let count = registered.len();
        if count > 0 {
            info!("Registered {} selectable parts", count);
            self.events.push(SessionEvent::PartsRegistered(registered));
        }
        count
    }

    /// Asset failure callback. The model stays absent; there is no retry.
    pub fn asset_failed(&mut self, path: &str, reason: &str) {
        warn!("Failed to load asset {}: {}", path, reason);
    }

    /// Remove a part from the scene and the registry, deselecting it first if
    /// needed.
    pub fn remove_part(&mut self, id: &PartId, scene: &mut dyn SceneGraph) {
        if self.selection.current() == Some(id) {
            if let Some(previous) = self.selection.clear(&mut self.registry) {
                debug!("Removed part {} was selected, selection is now idle", previous);
                self.events.push(SessionEvent::Deselected { previous });
            }
        }
        if let Err(err) = self.registry.unregister(id, scene) {
            self.record_warning("remove_part", err);
        }
    }

    /// Hit test a world-space ray and transition the selection.
    pub fn pick(&mut self, ray: &Ray, caster: &dyn RayCaster) -> HitResult {
        let hit = self.resolver.resolve(ray, &self.registry, caster);
        self.apply_hit(&hit);
        hit
    }

    /// Hit test a viewport pixel and transition the selection.
    pub fn pick_at(
        &mut self,
        cursor: Vec2,
        viewport_size: Vec2,
        camera: &CameraProjection,
        caster: &dyn RayCaster,
    ) -> HitResult {
        match camera.viewport_to_ray(cursor, viewport_size) {
            Some(ray) => self.pick(&ray, caster),
            None => {
                debug!("Pick ignored: degenerate viewport {:?}", viewport_size);
                HitResult::NoHit
            }
        }
    }

    fn apply_hit(&mut self, hit: &HitResult) {
        let Some(part) = hit.part() else {
            let change = self.selection.on_miss();
            debug!("Pick missed, selection kept: {:?}", change);
            return;
        };

        match self.selection.on_hit(part, &mut self.registry) {
            Ok(SelectionChange::Selected { previous, current }) => {
                self.events
                    .push(SessionEvent::SelectionChanged { previous, current });
            }
            Ok(_) => {}
            Err(err) => self.record_warning("pick", err),
        }
    }

    /// Palette swatch click: record the choice for the order and paint the
    /// selected part, if any.
    ///
    /// The choice is recorded even when nothing is selected.
    pub fn choose_color_swatch(&mut self, value: &str) -> Option<ApplyOutcome> {
        let color = match self.catalog.color(value) {
            Ok(swatch) => swatch.color,
            Err(err) => {
                self.record_warning("choose_color_swatch", err);
                return None;
            }
        };
        self.order.record_color(color.to_hex());

        let result = appearance::apply_color(self.selection.current(), &mut self.registry, color);
        self.settle("choose_color_swatch", result)
    }

    /// Ad-hoc coloring of the selected part. Does not touch the order.
    pub fn paint_selected(&mut self, hex: &str) -> Option<ApplyOutcome> {
        let result = Rgb::from_hex(hex).and_then(|color| {
            appearance::apply_color(self.selection.current(), &mut self.registry, color)
        });
        self.settle("paint_selected", result)
    }

    /// Fabric swatch click: record the choice and apply the texture to the
    /// selected part, if any.
    pub fn choose_fabric_swatch(&mut self, value: &str) -> Option<ApplyOutcome> {
        let (swatch_id, texture) = match self.catalog.fabric(value) {
            Ok(swatch) => (swatch.id.clone(), swatch.texture_ref()),
            Err(err) => {
                self.record_warning("choose_fabric_swatch", err);
                return None;
            }
        };
        self.order.record_fabric(swatch_id);

        let result = appearance::apply_fabric(self.selection.current(), &mut self.registry, texture);
        self.settle("choose_fabric_swatch", result)
    }

    /// Strip the fabric texture from the selected part. The order keeps its
    /// last fabric choice.
    pub fn remove_fabric(&mut self) -> Option<ApplyOutcome> {
        let result = appearance::clear_fabric(self.selection.current(), &mut self.registry);
        self.settle("remove_fabric", result)
    }

    pub fn set_personalization(&mut self, text: &str) {
        self.order.set_personalization(text);
    }

    /// Snapshot the order and queue the one-shot confirmation.
    pub fn place_order(&mut self) -> OrderSummary {
        let summary = self.order.snapshot();
        info!(
            "Order placed: color={}, fabric={}, initials={}",
            summary.color_choice(),
            summary.fabric_choice(),
            summary.personalization_text()
        );
        self.events.push(SessionEvent::OrderPlaced(summary.clone()));
        summary
    }

    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Materials to upload to the renderer this frame
    pub fn take_dirty_materials(&mut self) -> Vec<(PartId, MaterialState)> {
        self.registry.take_dirty()
    }

    /// Most recent warnings, oldest first
    pub fn warnings(&self) -> impl Iterator<Item = &ConfiguratorError> {
        self.warnings.iter()
    }

    fn settle(
        &mut self,
        context: &str,
        result: Result<ApplyOutcome, ConfiguratorError>,
    ) -> Option<ApplyOutcome> {
        match result {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                self.record_warning(context, err);
                None
            }
        }
    }

    fn record_warning(&mut self, context: &str, err: ConfiguratorError) {
        warn!("{}: {}", context, err);
        self.events.push(SessionEvent::Warning {
            code: err.code(),
            message: err.to_string(),
        });
        if self.warnings.len() == MAX_RECORDED_WARNINGS {
            self.warnings.pop_front();
        }
        self.warnings.push_back(err);
    }
}
