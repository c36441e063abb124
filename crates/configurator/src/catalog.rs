//! Static swatch catalog: the color palette and the fabric swatches.

use serde::{Deserialize, Serialize};

use crate::error::{ConfiguratorError, LookupKind};
use crate::types::{Rgb, TextureRef};

/// A palette entry. The UI declares it by its hex value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSwatch {
    pub name: String,
    pub color: Rgb,
}

/// A fabric entry with its texture paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricSwatch {
    pub id: String,
    pub name: String,
    pub texture_path: String,
    #[serde(default)]
    pub normal_map_path: Option<String>,
}

impl FabricSwatch {
    pub fn texture_ref(&self) -> TextureRef {
        TextureRef {
            swatch_id: self.id.clone(),
            path: self.texture_path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwatchCatalog {
    pub colors: Vec<ColorSwatch>,
    pub fabrics: Vec<FabricSwatch>,
}

impl Default for SwatchCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SwatchCatalog {
    /// The catalog shipped with the shoe model.
    pub fn builtin() -> Self {
        let color = |name: &str, r, g, b| ColorSwatch {
            name: name.to_string(),
            color: Rgb::new(r, g, b),
        };
        let fabric = |id: &str, name: &str, normal: Option<&str>| FabricSwatch {
            id: id.to_string(),
            name: name.to_string(),
            texture_path: format!("fabrics/{id}.jpg"),
            normal_map_path: normal.map(str::to_string),
        };

        Self {
            colors: vec![
                color("White", 0xff, 0xff, 0xff),
                color("Black", 0x1b, 0x1b, 0x1b),
                color("Orchid", 0xd3, 0x57, 0xfe),
                color("Peach", 0xff, 0xa5, 0x7d),
                color("Crimson", 0xc0, 0x39, 0x2b),
                color("Navy", 0x11, 0x22, 0x33),
                color("Forest", 0x2d, 0x6a, 0x4f),
            ],
            fabrics: vec![
                fabric("leather", "Leather", Some("fabrics/leatherNorm.jpg")),
                fabric("suede", "Suede", None),
                fabric("canvas", "Canvas", None),
                fabric("velvet", "Velvet", None),
                fabric("denim", "Denim", None),
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfiguratorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Find a palette swatch by its declared hex value.
    pub fn color(&self, value: &str) -> Result<&ColorSwatch, ConfiguratorError> {
        let not_found = || ConfiguratorError::NotFound {
            kind: LookupKind::ColorSwatch,
            id: value.to_string(),
        };
        let wanted = Rgb::from_hex(value).map_err(|_| not_found())?;
        self.colors
            .iter()
            .find(|swatch| swatch.color == wanted)
            .ok_or_else(not_found)
    }

    /// Find a fabric swatch by id or by texture path.
    pub fn fabric(&self, value: &str) -> Result<&FabricSwatch, ConfiguratorError> {
        self.fabrics
            .iter()
            .find(|swatch| swatch.id == value || swatch.texture_path == value)
            .ok_or_else(|| ConfiguratorError::NotFound {
                kind: LookupKind::FabricSwatch,
                id: value.to_string(),
            })
    }
}
