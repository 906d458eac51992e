use serde::{Deserialize, Serialize};

/// Instruction that pins the model to the attached catalog.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "Eres un experto en autopartes. \
Tu única fuente de verdad es el archivo PDF adjunto. Responde consultas sobre \
códigos de filtros, aplicaciones vehiculares y medidas. Si no encuentras el \
dato en el archivo, di 'No figura en el catálogo'.";

/// Fixed sampling parameters sent with every question.
///
/// These are deployment settings, not something the chat user can change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Kept low so answers stick to catalog data (0.0-2.0).
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub system_instruction: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 8192,
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.into(),
        }
    }
}
