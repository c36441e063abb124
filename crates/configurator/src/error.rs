//! Error types for configurator operations.
//!
//! None of these are fatal. The session logs them and turns the triggering
//! interaction into a no-op.

use std::fmt;

use thiserror::Error;

use crate::types::PartId;

/// What kind of entity a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Part,
    ColorSwatch,
    FabricSwatch,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LookupKind::Part => "part",
            LookupKind::ColorSwatch => "color swatch",
            LookupKind::FabricSwatch => "fabric swatch",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum ConfiguratorError {
    #[error("Unknown {kind}: {id}")]
    NotFound { kind: LookupKind, id: String },

    #[error("No part is selected")]
    NoSelection,

    #[error("Material for part {0} has not loaded yet")]
    AssetPending(PartId),

    #[error("Part {0} does not accept color or fabric changes")]
    NotPaintable(PartId),

    #[error("Invalid color value: {0:?}")]
    InvalidColor(String),

    #[error("Failed to parse swatch catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

impl ConfiguratorError {
    pub fn part_not_found(id: &PartId) -> Self {
        Self::NotFound {
            kind: LookupKind::Part,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code, forwarded to the UI with warnings.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::NoSelection => "no_selection",
            Self::AssetPending(_) => "asset_pending",
            Self::NotPaintable(_) => "not_paintable",
            Self::InvalidColor(_) => "invalid_color",
            Self::Catalog(_) => "catalog",
        }
    }
}
