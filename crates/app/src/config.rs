//! Application configuration from the environment

use std::path::PathBuf;

use atelier_config::StageLayout;
use bevy::prelude::*;
use configurator::SwatchCatalog;

/// Environment variable overriding the product model path
pub const MODEL_ENV: &str = "ATELIER_MODEL";

/// Environment variable pointing at a swatch catalog JSON file
pub const CATALOG_ENV: &str = "ATELIER_CATALOG";

/// Application configuration resource
#[derive(Resource, Clone, Debug, Default)]
pub struct AtelierConfig {
    pub model_path: Option<String>,
    pub catalog_path: Option<PathBuf>,
}

impl AtelierConfig {
    /// Parse from ATELIER_MODEL and ATELIER_CATALOG
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(MODEL_ENV).ok(),
            std::env::var(CATALOG_ENV).ok(),
        )
    }

    fn from_vars(model: Option<String>, catalog: Option<String>) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            model_path: non_empty(model),
            catalog_path: non_empty(catalog).map(PathBuf::from),
        }
    }

    /// Stage layout with the model override applied
    pub fn stage_layout(&self) -> StageLayout {
        match &self.model_path {
            Some(path) => StageLayout::default().with_model_path(path.clone()),
            None => StageLayout::default(),
        }
    }

    /// The configured catalog, or the built-in one if none is configured or
    /// it cannot be read
    pub fn swatch_catalog(&self) -> SwatchCatalog {
        let Some(path) = &self.catalog_path else {
            return SwatchCatalog::builtin();
        };

        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                warn!("Cannot read catalog {}: {}, using built-in swatches", path.display(), err);
                return SwatchCatalog::builtin();
            }
        };

        match SwatchCatalog::from_json(&json) {
            Ok(catalog) => {
                info!(
                    "Loaded catalog {} ({} colors, {} fabrics)",
                    path.display(),
                    catalog.colors.len(),
                    catalog.fabrics.len()
                );
                catalog
            }
            Err(err) => {
                warn!("Invalid catalog {}: {}, using built-in swatches", path.display(), err);
                SwatchCatalog::builtin()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_vars_are_ignored() {
        let config = AtelierConfig::from_vars(Some("  ".to_string()), None);
        assert!(config.model_path.is_none());
        assert!(config.catalog_path.is_none());
        assert_eq!(config.stage_layout(), StageLayout::default());
    }

    #[test]
    fn test_model_override() {
        let config = AtelierConfig::from_vars(Some("models/boot.glb".to_string()), None);
        assert_eq!(config.stage_layout().model.path, "models/boot.glb");
    }

    #[test]
    fn test_missing_catalog_falls_back_to_builtin() {
        let config = AtelierConfig::from_vars(None, Some("/nonexistent/catalog.json".to_string()));
        assert_eq!(config.swatch_catalog(), SwatchCatalog::builtin());
    }
}
