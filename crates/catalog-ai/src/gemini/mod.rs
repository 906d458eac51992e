//! Google Gemini API client.
//!
//! Implements `ModelService` against the Generative Language API: the
//! resumable Files API for the catalog upload, `generateContent` for
//! blocking answers and `streamGenerateContent` (SSE) for streamed ones.

mod api;
mod client;
mod config;
mod files;


pub use client::GeminiClient;
pub use config::GeminiConfig;
pub use files::FileState;
