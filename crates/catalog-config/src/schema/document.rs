use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The single reference document uploaded to the model service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Relative paths resolve against the working directory.
    pub path: PathBuf,
    pub mime_type: String,
    /// Name shown in the Files API listing.
    pub display_name: String,
    /// Delay between file-state polls while the service processes the upload.
    pub poll_interval_ms: u64,
    /// Give up waiting for `ACTIVE` after this many polls.
    pub max_polls: u32,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("CATALOGO REDFIL ACTUALIZADO-2.pdf"),
            mime_type: "application/pdf".into(),
            display_name: "Catalogo Redfil".into(),
            poll_interval_ms: 1000,
            max_polls: 30,
        }
    }
}
