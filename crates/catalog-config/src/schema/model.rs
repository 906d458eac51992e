use serde::{Deserialize, Serialize};

/// Which Gemini model to call and how to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    /// Root of the Generative Language API, without version segment.
    pub api_base: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Render answers incrementally via `streamGenerateContent`.
    pub stream: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gemini-1.5-flash".into(),
            api_base: "https://generativelanguage.googleapis.com".into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
            stream: true,
        }
    }
}
