//! Type definitions for IPC messages.

mod catalog;
mod material;
mod order;
mod settings;

pub use catalog::*;
pub use material::*;
pub use order::*;
pub use settings::*;
