//! Catalog assistant configuration.
//!
//! Provides the TOML configuration (model, generation settings, document,
//! UI strings, logging) with validation, and the secret store that supplies
//! the access password and API key. All config sections use defaults so
//! partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use catalog_config::{load_config, secrets};
//!
//! let config = load_config(None).expect("failed to load config");
//! let credentials = secrets::load_credentials(None).expect("missing secrets");
//! println!("model: {}", config.model.name);
//! # drop(credentials);
//! ```

pub mod schema;
pub mod secrets;
pub mod toml_loader;
pub mod validation;

pub use schema::{CatalogConfig, CONFIG_SCHEMA_VERSION};
pub use secrets::load_credentials;

use catalog_common::ConfigError;
use std::path::Path;

/// Load config from `path`, or from the platform default location when
/// `path` is `None` (creating a commented default file there if needed).
pub fn load_config(path: Option<&Path>) -> Result<CatalogConfig, ConfigError> {
    match path {
        Some(p) => toml_loader::load_from_path(p),
        None => toml_loader::load_default(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &CatalogConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&CatalogConfig::default());
        assert!(json.contains("\"model\""));
        assert!(json.contains("\"generation\""));
        assert!(json.contains("\"document\""));
        assert!(json.contains("\"ui\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn explicit_missing_path_is_file_not_found() {
        let result = load_config(Some(Path::new("/tmp/nonexistent_catalog_override.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
