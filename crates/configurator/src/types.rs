use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{HIGHLIGHT_OPACITY, OPAQUE};
use crate::error::ConfiguratorError;

/// Stable identifier of a selectable part, derived from the mesh name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(String);

impl PartId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PartId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque handle to a render-ready mesh owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeometryRef(pub u64);

/// sRGB color with 8 bits per channel.
///
/// Serialized as a `#rrggbb` string, which is also the form swatches declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or the `#rgb` shorthand. The leading `#` is optional.
    pub fn from_hex(value: &str) -> Result<Self, ConfiguratorError> {
        let invalid = || ConfiguratorError::InvalidColor(value.to_string());
        let digits = value.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // #abc expands to #aabbcc
                let expand = |i: usize| channel(&digits[i..=i]).map(|v| v * 17);
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels as 0.0-1.0 sRGB floats.
    pub fn to_unit(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Build from 0.0-1.0 sRGB floats, clamping out-of-range channels.
    pub fn from_unit(rgb: [f32; 3]) -> Self {
        let quantize = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(quantize(rgb[0]), quantize(rgb[1]), quantize(rgb[2]))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ConfiguratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfiguratorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// Handle to a fabric texture sampler, resolved by the asset loader.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureRef {
    /// Fabric swatch this texture came from
    pub swatch_id: String,
    /// Static asset path of the color texture
    pub path: String,
}

/// Appearance record of a single part.
///
/// Highlight fields (`opacity`, `highlighted`, `transparent`) belong to the
/// selection machine; `base_color` and `texture` belong to the appearance
/// applicator. Every effective change marks the record dirty so the renderer
/// re-uploads it on the next frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialState {
    pub base_color: Rgb,
    pub texture: Option<TextureRef>,
    pub opacity: f32,
    pub highlighted: bool,
    pub transparent: bool,
    #[serde(skip)]
    dirty: bool,
}

impl Default for MaterialState {
    fn default() -> Self {
        Self::new(Rgb::WHITE)
    }
}

impl MaterialState {
    /// New opaque, unhighlighted material. Starts dirty so the first frame
    /// uploads it.
    pub fn new(base_color: Rgb) -> Self {
        Self {
            base_color,
            texture: None,
            opacity: OPAQUE,
            highlighted: false,
            transparent: false,
            dirty: true,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Returns true if anything changed.
    pub fn set_base_color(&mut self, color: Rgb) -> bool {
        if self.base_color == color {
            return false;
        }
        self.base_color = color;
        self.dirty = true;
        true
    }

    /// Returns true if anything changed.
    pub fn set_texture(&mut self, texture: Option<TextureRef>) -> bool {
        if self.texture == texture {
            return false;
        }
        self.texture = texture;
        self.dirty = true;
        true
    }

    /// Switch the selection highlight on or off. Returns true if anything
    /// changed.
    pub(crate) fn set_highlight(&mut self, on: bool) -> bool {
        let opacity = if on { HIGHLIGHT_OPACITY } else { OPAQUE };
        if self.highlighted == on && self.transparent == on && self.opacity == opacity {
            return false;
        }
        self.highlighted = on;
        self.transparent = on;
        self.opacity = opacity;
        self.dirty = true;
        true
    }
}

/// What a registered scene node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartKind {
    /// A named sub-mesh of the product model
    Mesh,
    /// Decorative display object (the pedestal)
    Stand,
}

/// A scene node registered for picking.
///
/// Capabilities are tagged explicitly at registration instead of being
/// inferred from the node type.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectablePart {
    pub id: PartId,
    pub geometry: GeometryRef,
    pub kind: PartKind,
    /// Included in the hit-test candidate set
    pub pickable: bool,
    /// Accepts color and fabric changes
    pub paintable: bool,
    /// `None` while the material has not arrived from the asset loader
    pub material: Option<MaterialState>,
}

impl SelectablePart {
    /// A product sub-mesh: pickable and paintable.
    pub fn mesh(id: impl Into<PartId>, geometry: GeometryRef) -> Self {
        Self {
            id: id.into(),
            geometry,
            kind: PartKind::Mesh,
            pickable: true,
            paintable: true,
            material: Some(MaterialState::default()),
        }
    }

    /// A display stand: pickable, but its appearance is fixed.
    pub fn stand(id: impl Into<PartId>, geometry: GeometryRef) -> Self {
        Self {
            id: id.into(),
            geometry,
            kind: PartKind::Stand,
            pickable: true,
            paintable: false,
            material: Some(MaterialState::default()),
        }
    }

    pub fn with_material(mut self, material: MaterialState) -> Self {
        self.material = Some(material);
        self
    }

    /// Mark the material as not yet available.
    pub fn without_material(mut self) -> Self {
        self.material = None;
        self
    }

    pub fn is_highlighted(&self) -> bool {
        self.material.as_ref().is_some_and(|m| m.highlighted)
    }
}
