//! Document-grounded chat engine for the catalog assistant.
//!
//! Provides:
//! - The `ModelService` contract and its Gemini implementation
//!   (Files API upload, blocking and SSE-streamed generation)
//! - `AccessGate`, the per-session password check
//! - `DocumentRegistrar`, a single-flight upload cache
//! - `ConversationSession` and `ChatSession`, per-user state
//! - `QueryDispatcher` and the `CatalogAssistant` facade

pub mod assistant;
pub mod dispatcher;
pub mod gate;
pub mod gemini;
pub mod registrar;
pub mod session;
pub mod streaming;
pub mod token_tracker;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

pub use assistant::CatalogAssistant;
pub use dispatcher::QueryDispatcher;
pub use gate::{AccessGate, GateState};
pub use gemini::{GeminiClient, GeminiConfig};
pub use registrar::DocumentRegistrar;
pub use session::{ChatSession, ConversationSession};
pub use token_tracker::TokenTracker;

/// Callback receiving answer text as it streams in.
pub type ChunkSink = Box<dyn Fn(String) + Send + Sync>;

/// The remote model service: document upload plus answer generation.
#[async_trait]
pub trait ModelService: Send + Sync {
    /// Register a local file with the service and return its handle.
    async fn upload_document(&self, source: &DocumentSource) -> Result<DocumentHandle, AiError>;

    async fn generate_answer(&self, request: &AnswerRequest<'_>) -> Result<AiResponse, AiError>;

    async fn generate_answer_streaming(
        &self,
        request: &AnswerRequest<'_>,
        on_chunk: ChunkSink,
    ) -> Result<AiResponse, AiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One transcript message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Local file to register with the model service.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    pub path: PathBuf,
    pub mime_type: String,
    pub display_name: String,
}

impl DocumentSource {
    pub fn new(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        Self {
            path,
            mime_type: mime_type.into(),
            display_name,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Server-side reference to an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DocumentHandle {
    name: String,
    uri: String,
    mime_type: String,
}

impl DocumentHandle {
    pub fn new(
        name: impl Into<String>,
        uri: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Resource name, e.g. `files/abc123`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

/// Sampling parameters and system instruction sent with every question.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub system_instruction: String,
}

/// Everything one generation request carries: the document, the latest
/// prompt, and the fixed settings. Earlier turns are never included.
#[derive(Debug, Clone, Copy)]
pub struct AnswerRequest<'a> {
    pub document: &'a DocumentHandle,
    pub prompt: &'a str,
    pub generation: &'a GenerationSettings,
}

#[derive(Debug, Clone, Default)]
pub struct AiResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Transport-level failures talking to the model service.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// User-facing failures, one per chat operation.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("incorrect password")]
    WrongPassword,
    #[error("access gate is locked")]
    Locked,
    #[error("document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),
    #[error("failed to upload document: {0}")]
    UploadFailed(#[source] AiError),
    #[error("query failed: {0}")]
    QueryFailed(#[source] AiError),
}
