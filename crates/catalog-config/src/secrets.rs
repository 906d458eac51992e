//! Secret store: the access password and the Gemini API key.
//!
//! Secrets are kept out of `config.toml`. They come from a separate
//! `secrets.toml` (same layout as a Streamlit secrets file):
//!
//! ```toml
//! PASSWORD = "..."
//! GOOGLE_API_KEY = "..."
//! ```
//!
//! Resolution order for each key:
//! 1. `CATALOG_PASSWORD` / `GOOGLE_API_KEY` environment variables
//! 2. the secrets file

use std::path::{Path, PathBuf};

use catalog_common::{ConfigError, Credentials};
use serde::Deserialize;
use tracing::{debug, info};

use crate::toml_loader::config_dir;

pub const PASSWORD_KEY: &str = "PASSWORD";
pub const API_KEY_KEY: &str = "GOOGLE_API_KEY";
pub const PASSWORD_ENV: &str = "CATALOG_PASSWORD";
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Default, Deserialize)]
struct SecretsFile {
    #[serde(rename = "PASSWORD")]
    password: Option<String>,
    #[serde(rename = "GOOGLE_API_KEY")]
    api_key: Option<String>,
}

/// Default secrets file location: `<config dir>/catalog/secrets.toml`.
pub fn default_secrets_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("secrets.toml"))
}

/// Load credentials from the process environment and the secrets file.
///
/// `path` overrides the default location. A missing file is not an error as
/// long as the environment supplies both keys.
pub fn load_credentials(path: Option<&Path>) -> Result<Credentials, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_secrets_path()?,
    };
    let file = read_secrets_file(&path)?;
    resolve(file, |key| std::env::var(key).ok())
}

fn read_secrets_file(path: &Path) -> Result<SecretsFile, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let file: SecretsFile = toml::from_str(&content).map_err(|e| {
                ConfigError::ParseError(format!("failed to parse {}: {e}", path.display()))
            })?;
            info!("loaded secrets from {}", path.display());
            Ok(file)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no secrets file at {}", path.display());
            Ok(SecretsFile::default())
        }
        Err(e) => Err(ConfigError::ParseError(format!(
            "failed to read {}: {e}",
            path.display()
        ))),
    }
}

fn resolve(
    file: SecretsFile,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Credentials, ConfigError> {
    let password = pick(env(PASSWORD_ENV), file.password).ok_or_else(|| {
        ConfigError::SecretMissing(format!("{PASSWORD_KEY} (or ${PASSWORD_ENV})"))
    })?;
    let api_key = pick(env(API_KEY_ENV), file.api_key)
        .ok_or_else(|| ConfigError::SecretMissing(format!("{API_KEY_KEY} (or ${API_KEY_ENV})")))?;
    Ok(Credentials::new(password, api_key))
}

/// First non-blank value wins.
fn pick(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .filter(|v| !v.trim().is_empty())
        .or_else(|| fallback.filter(|v| !v.trim().is_empty()))
}
