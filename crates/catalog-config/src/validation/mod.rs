//! Full configuration validation.
//!
//! Validates numeric ranges, the document MIME type and the URLs. Each
//! section has its own validator; this orchestrator runs them all and
//! collects errors into a single `ConfigError`.

mod helpers;
mod sections;


use crate::schema::CatalogConfig;
use catalog_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CatalogConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_model(&mut errors, config);
    sections::validate_generation(&mut errors, config);
    sections::validate_document(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
