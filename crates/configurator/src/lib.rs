//! Atelier configurator engine - part selection and configuration state
//!
//! This crate holds the interaction core of the product configurator and
//! does not depend on Bevy:
//! - [`registry`] - Selectable parts and their material state
//! - [`raycast`] - Rays, camera unprojection, ray-mesh intersection
//! - [`hit_test`] - Nearest-part resolution for a pointer event
//! - [`selection`] - Single-selection state machine with highlighting
//! - [`appearance`] - Color and fabric application to the selected part
//! - [`order`] - Order configuration and immutable summaries
//! - [`catalog`] - Static color and fabric swatches
//! - [`session`] - Event-driven entry point tying the above together

pub mod appearance;
pub mod catalog;
pub mod constants;
pub mod error;
pub mod order;
pub mod raycast;
pub mod registry;
pub mod selection;
pub mod session;
pub mod types;

pub use appearance::ApplyOutcome;
pub use catalog::{ColorSwatch, FabricSwatch, SwatchCatalog};
pub use error::{ConfiguratorError, LookupKind};
pub use hit_test::{HitResult, HitTestResolver};
pub use order::{OrderConfiguration, OrderSummary};
pub use raycast::{Aabb, CameraProjection, MeshRayCaster, Ray, RayCaster, RaycastMesh};
pub use registry::{PartRegistry, RecordingScene, RegisterOutcome, SceneGraph};
pub use selection::{SelectionChange, SelectionMachine, SelectionState};
pub use session::{ConfiguratorSession, SessionEvent};
pub use types::*;

pub use glam;
