//! Material-related types for IPC messages.

use serde::{Deserialize, Serialize};

/// Appearance of a part as shown to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartMaterialInfo {
    /// `#rrggbb`
    pub base_color: String,
    /// Fabric swatch id, if a texture is applied
    pub fabric: Option<String>,
    pub opacity: f32,
    pub highlighted: bool,
}
