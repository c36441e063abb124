//! IPC message protocol for Atelier
//!
//! Defines the messages exchanged between the configurator engine and the
//! swatch/order UI.

mod error;
mod messages;
mod types;

pub use error::IpcError;
pub use messages::{EngineToUi, UiToEngine};
pub use types::*;
