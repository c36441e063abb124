//! Order aggregation.
//!
//! The configuration mirrors the last palette and fabric swatches the user
//! clicked. It is tracked independently of what is painted on the model, so
//! the two can diverge (a palette pick with nothing selected still counts).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_COLOR_LABEL, DEFAULT_FABRIC_LABEL, DEFAULT_PERSONALIZATION_LABEL};

/// Mutable session-wide choices. Never rolled back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderConfiguration {
    color_choice: Option<String>,
    fabric_choice: Option<String>,
    personalization: String,
}

impl OrderConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_color(&mut self, color: impl Into<String>) {
        self.color_choice = Some(color.into());
    }

    pub fn record_fabric(&mut self, fabric: impl Into<String>) {
        self.fabric_choice = Some(fabric.into());
    }

    /// Replace the personalization text. Surrounding whitespace is dropped.
    pub fn set_personalization(&mut self, text: &str) {
        self.personalization = text.trim().to_string();
    }

    pub fn color_choice(&self) -> Option<&str> {
        self.color_choice.as_deref()
    }

    pub fn fabric_choice(&self) -> Option<&str> {
        self.fabric_choice.as_deref()
    }

    pub fn personalization(&self) -> &str {
        &self.personalization
    }

    /// Read the current choices into an immutable summary. Unset fields
    /// resolve to their default labels.
    pub fn snapshot(&self) -> OrderSummary {
        OrderSummary {
            color_choice: self
                .color_choice
                .clone()
                .unwrap_or_else(|| DEFAULT_COLOR_LABEL.to_string()),
            fabric_choice: self
                .fabric_choice
                .clone()
                .unwrap_or_else(|| DEFAULT_FABRIC_LABEL.to_string()),
            personalization_text: if self.personalization.is_empty() {
                DEFAULT_PERSONALIZATION_LABEL.to_string()
            } else {
                self.personalization.clone()
            },
        }
    }
}

/// Immutable copy of the order configuration at "place order" time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    color_choice: String,
    fabric_choice: String,
    personalization_text: String,
}

impl OrderSummary {
    pub fn color_choice(&self) -> &str {
        &self.color_choice
    }

    pub fn fabric_choice(&self) -> &str {
        &self.fabric_choice
    }

    pub fn personalization_text(&self) -> &str {
        &self.personalization_text
    }

    /// The three user-visible summary lines.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Color: {}", self.color_choice),
            format!("Fabric: {}", self.fabric_choice),
            format!("Initials: {}", self.personalization_text),
        ]
    }
}

impl fmt::Display for OrderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}
