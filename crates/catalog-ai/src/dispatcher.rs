//! Sends one question about the document to the model and records the
//! exchange in the transcript.

use std::sync::{Arc, Mutex, MutexGuard};

use catalog_common::RequestId;
use tracing::{debug, info, warn, Instrument};

use crate::session::ConversationSession;
use crate::token_tracker::TokenTracker;
use crate::{
    AiError, AiResponse, AnswerRequest, ChatError, ChunkSink, DocumentHandle, GenerationSettings,
    ModelService, TokenUsage, Turn,
};

/// Issues single-attempt generation requests with fixed settings.
///
/// Only the document and the latest prompt are sent; earlier turns are
/// never replayed to the model.
pub struct QueryDispatcher {
    service: Arc<dyn ModelService>,
    generation: GenerationSettings,
    tracker: Mutex<TokenTracker>,
}

impl QueryDispatcher {
    pub fn new(service: Arc<dyn ModelService>, generation: GenerationSettings) -> Self {
        Self {
            service,
            generation,
            tracker: Mutex::new(TokenTracker::new()),
        }
    }

    /// Ask a question and wait for the full answer.
    ///
    /// Appends the user turn, then the assistant turn on success. On failure
    /// the user turn stays in the transcript on its own.
    pub async fn ask(
        &self,
        document: &DocumentHandle,
        conversation: &mut ConversationSession,
        prompt: impl Into<String>,
    ) -> Result<Turn, ChatError> {
        self.dispatch(document, conversation, prompt.into(), None)
            .await
    }

    /// Like [`ask`](Self::ask), delivering answer text to `on_chunk` as it
    /// arrives. The returned turn holds the concatenated answer.
    pub async fn ask_streaming(
        &self,
        document: &DocumentHandle,
        conversation: &mut ConversationSession,
        prompt: impl Into<String>,
        on_chunk: ChunkSink,
    ) -> Result<Turn, ChatError> {
        self.dispatch(document, conversation, prompt.into(), Some(on_chunk))
            .await
    }

    async fn dispatch(
        &self,
        document: &DocumentHandle,
        conversation: &mut ConversationSession,
        prompt: String,
        on_chunk: Option<ChunkSink>,
    ) -> Result<Turn, ChatError> {
        let request_id = RequestId::new();
        let span = tracing::info_span!("query", id = %request_id, file = %document.name());

        async move {
            conversation.append(Turn::user(prompt.as_str()));
            debug!(prompt_len = prompt.len(), history = conversation.len(), "dispatching");

            let request = AnswerRequest {
                document,
                prompt: &prompt,
                generation: &self.generation,
            };
            let result: Result<AiResponse, AiError> = match on_chunk {
                Some(sink) => self.service.generate_answer_streaming(&request, sink).await,
                None => self.service.generate_answer(&request).await,
            };

            match result {
                Ok(response) => {
                    self.record_usage(&response);
                    info!(
                        input_tokens = response.usage.input_tokens,
                        output_tokens = response.usage.output_tokens,
                        finish = response.finish_reason.as_deref().unwrap_or("-"),
                        "answer received"
                    );
                    let turn = Turn::assistant(response.content);
                    conversation.append(turn.clone());
                    Ok(turn)
                }
                Err(e) => {
                    warn!("query failed: {e}");
                    Err(ChatError::QueryFailed(e))
                }
            }
        }
        .instrument(span)
        .await
    }

    fn record_usage(&self, response: &AiResponse) {
        self.tracker().record(&response.usage);
    }

    /// Token usage summed over every answered question.
    pub fn usage(&self) -> TokenUsage {
        self.tracker().total()
    }

    /// Number of questions answered successfully.
    pub fn answered(&self) -> u64 {
        self.tracker().call_count()
    }

    fn tracker(&self) -> MutexGuard<'_, TokenTracker> {
        self.tracker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn generation(&self) -> &GenerationSettings {
        &self.generation
    }
}
