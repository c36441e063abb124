//! Main IPC message enums for communication between the engine and the UI.

use serde::{Deserialize, Serialize};

use crate::error::IpcError;
use crate::types::{CatalogInfo, OrderSummaryInfo, PartMaterialInfo, TweakSettings};

/// Messages from the engine to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EngineToUi {
    /// Initial state sync when UI loads
    Initialize {
        catalog: CatalogInfo,
        tweaks: TweakSettings,
    },

    /// Model parts finished loading and can be picked
    PartsLoaded { part_ids: Vec<String> },

    /// The selected part changed
    SelectionChanged { selected_id: Option<String> },

    /// A part's appearance was uploaded to the renderer
    MaterialUpdated {
        part_id: String,
        material: PartMaterialInfo,
    },

    /// Order confirmation, shown once
    OrderPlaced { summary: OrderSummaryInfo },

    /// Non-fatal problem with the last interaction
    Warning { code: String, message: String },
}

/// Messages from the UI to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToEngine {
    /// Pick the part under a viewport pixel
    PickAt { x: f32, y: f32 },

    /// Palette swatch clicked (declared hex value)
    ChooseColorSwatch { color: String },

    /// Free color picker applied to the selected part
    PaintPart { color: String },

    /// Fabric swatch clicked (declared id or texture path)
    ChooseFabricSwatch { fabric: String },

    /// Remove the fabric from the selected part
    RemoveFabric,

    /// Personalization text field changed
    SetPersonalization { text: String },

    /// "Place order" button
    PlaceOrder,

    /// Tweak panel changed
    UpdateTweaks(TweakSettings),
}

impl EngineToUi {
    pub fn to_json(&self) -> Result<String, IpcError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl UiToEngine {
    /// Parse a message posted by the UI.
    pub fn from_json(json: &str) -> Result<Self, IpcError> {
        if json.trim().is_empty() {
            return Err(IpcError::InvalidFormat("empty message".to_string()));
        }
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ui_messages() {
        let pick = UiToEngine::from_json(r#"{"type":"PickAt","data":{"x":12.5,"y":40.0}}"#).unwrap();
        assert_eq!(pick, UiToEngine::PickAt { x: 12.5, y: 40.0 });

        let swatch =
            UiToEngine::from_json(r##"{"type":"ChooseColorSwatch","data":{"color":"#d357fe"}}"##)
                .unwrap();
        assert_eq!(
            swatch,
            UiToEngine::ChooseColorSwatch {
                color: "#d357fe".to_string()
            }
        );

        let order = UiToEngine::from_json(r#"{"type":"PlaceOrder"}"#).unwrap();
        assert_eq!(order, UiToEngine::PlaceOrder);
    }

    #[test]
    fn test_reject_malformed_messages() {
        assert!(matches!(
            UiToEngine::from_json("  "),
            Err(IpcError::InvalidFormat(_))
        ));
        assert!(matches!(
            UiToEngine::from_json(r#"{"type":"Explode"}"#),
            Err(IpcError::Serialize(_))
        ));
    }

    #[test]
    fn test_order_placed_shape() {
        let message = EngineToUi::OrderPlaced {
            summary: OrderSummaryInfo {
                color: "#d357fe".to_string(),
                fabric: "Default Fabric".to_string(),
                initials: "None".to_string(),
            },
        };
        let value: serde_json::Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "OrderPlaced");
        assert_eq!(value["data"]["summary"]["color"], "#d357fe");
        assert_eq!(value["data"]["summary"]["initials"], "None");
    }
}
