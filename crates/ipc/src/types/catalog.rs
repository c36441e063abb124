//! Swatch catalog types for populating the UI palettes.

use serde::{Deserialize, Serialize};

/// A single swatch button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwatchInfo {
    pub name: String,
    /// Value the UI sends back when the swatch is clicked (hex color or
    /// fabric id)
    pub value: String,
    /// Preview image, fabrics only
    pub preview_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogInfo {
    pub colors: Vec<SwatchInfo>,
    pub fabrics: Vec<SwatchInfo>,
}
