//! Configuration schema types for the catalog assistant.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the values the assistant shipped with.

mod document;
mod generation;
mod model;
mod system;
mod ui;

pub use document::*;
pub use generation::*;
pub use model::*;
pub use system::*;
pub use ui::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CatalogConfig {
    pub model: ModelConfig,
    pub generation: GenerationConfig,
    pub document: DocumentConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
