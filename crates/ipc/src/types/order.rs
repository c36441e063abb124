//! Order summary types for IPC messages.

use serde::{Deserialize, Serialize};

/// Placed order, rendered by the UI as three lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummaryInfo {
    pub color: String,
    pub fabric: String,
    pub initials: String,
}

impl OrderSummaryInfo {
    /// Lines for the confirmation panel
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Color: {}", self.color),
            format!("Fabric: {}", self.fabric),
            format!("Initials: {}", self.initials),
        ]
    }
}
