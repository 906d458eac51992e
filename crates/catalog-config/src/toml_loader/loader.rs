//! Reads `config.toml`. Secrets are never part of this file; see `secrets`.

use crate::schema::CatalogConfig;
use crate::validation;
use catalog_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Parse the config at `path`.
///
/// Omitted keys keep their defaults, so an empty file yields the stock
/// assistant. Out-of-range values are reported as a warning and kept.
pub fn load_from_path(path: &Path) -> Result<CatalogConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "cannot read {}: {e}",
                path.display()
            )));
        }
    };

    let config: CatalogConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!("{e}; keeping values from {}", path.display());
    }

    info!(
        model = %config.model.name,
        document = %config.document.path.display(),
        "loaded config from {}",
        path.display()
    );
    Ok(config)
}

/// Load `<config dir>/catalog/config.toml`, writing the template on first run.
pub fn load_default() -> Result<CatalogConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(CatalogConfig::default())
        }
        other => other,
    }
}
