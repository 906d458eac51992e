//! CatalogAssistant: gate check, document registration and dispatch in one
//! call, shared by every session of the process.

use std::sync::Arc;

use crate::dispatcher::QueryDispatcher;
use crate::registrar::DocumentRegistrar;
use crate::session::ChatSession;
use crate::{
    ChatError, ChunkSink, DocumentHandle, DocumentSource, GenerationSettings, ModelService, Turn,
};

/// Process-wide assistant. Wrap in `Arc` to serve several sessions.
pub struct CatalogAssistant {
    registrar: DocumentRegistrar,
    dispatcher: QueryDispatcher,
}

impl CatalogAssistant {
    pub fn new(
        service: Arc<dyn ModelService>,
        source: DocumentSource,
        generation: GenerationSettings,
    ) -> Self {
        Self {
            registrar: DocumentRegistrar::new(service.clone(), source),
            dispatcher: QueryDispatcher::new(service, generation),
        }
    }

    /// Resolve the document handle ahead of the first question.
    pub async fn prepare(&self) -> Result<DocumentHandle, ChatError> {
        self.registrar.document_handle().await
    }

    /// Answer `prompt` within `session`. Nothing is appended to the
    /// transcript unless the gate is open and the document is registered.
    pub async fn ask(
        &self,
        session: &mut ChatSession,
        prompt: impl Into<String>,
    ) -> Result<Turn, ChatError> {
        session.gate().ensure_unlocked()?;
        let document = self.registrar.document_handle().await?;
        self.dispatcher
            .ask(&document, session.conversation_mut(), prompt)
            .await
    }

    pub async fn ask_streaming(
        &self,
        session: &mut ChatSession,
        prompt: impl Into<String>,
        on_chunk: ChunkSink,
    ) -> Result<Turn, ChatError> {
        session.gate().ensure_unlocked()?;
        let document = self.registrar.document_handle().await?;
        self.dispatcher
            .ask_streaming(&document, session.conversation_mut(), prompt, on_chunk)
            .await
    }

    pub fn registrar(&self) -> &DocumentRegistrar {
        &self.registrar
    }

    pub fn dispatcher(&self) -> &QueryDispatcher {
        &self.dispatcher
    }
}
