//! Shared fixtures: a recording `ModelService` and a temporary catalog file.
#![allow(dead_code)]

pub mod http;

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use catalog_ai::{
    AiError, AiResponse, AnswerRequest, ChatSession, ChunkSink, DocumentHandle, DocumentSource,
    GenerationSettings, ModelService, TokenUsage,
};
use catalog_common::Credentials;

pub const PASSWORD: &str = "redfil123";
pub const DEFAULT_ANSWER: &str = "El Chevrolet Corsa usa el filtro de aire AP-1234.";

/// What the service saw for one generation call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub document: DocumentHandle,
    pub prompt: String,
    pub generation: GenerationSettings,
    pub streaming: bool,
}

/// Scripted model service that counts uploads and records requests.
#[derive(Default)]
pub struct MockModelService {
    uploads: AtomicUsize,
    upload_failures: AtomicUsize,
    upload_delay: Duration,
    answers: Mutex<VecDeque<Result<String, AiError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockModelService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold each upload open for `delay` so concurrent callers overlap.
    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = delay;
        self
    }

    /// Fail the next `n` uploads with a network error.
    pub fn fail_uploads(self, n: usize) -> Self {
        self.upload_failures.store(n, Ordering::SeqCst);
        self
    }

    pub fn push_answer(&self, text: &str) {
        self.answers.lock().unwrap().push_back(Ok(text.to_string()));
    }

    pub fn push_failure(&self) {
        self.answers.lock().unwrap().push_back(Err(AiError::NetworkError(
            "simulated network error".into(),
        )));
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_answer(&self, request: &AnswerRequest<'_>, streaming: bool) -> Result<String, AiError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            document: request.document.clone(),
            prompt: request.prompt.to_string(),
            generation: request.generation.clone(),
            streaming,
        });
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_ANSWER.to_string()))
    }
}

#[async_trait]
impl ModelService for MockModelService {
    async fn upload_document(&self, source: &DocumentSource) -> Result<DocumentHandle, AiError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.upload_delay.is_zero() {
            tokio::time::sleep(self.upload_delay).await;
        }
        let failing = self
            .upload_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(AiError::NetworkError("upload connection reset".into()));
        }
        Ok(DocumentHandle::new(
            format!("files/mock{n}"),
            format!("https://files.test/mock{n}"),
            source.mime_type.clone(),
        ))
    }

    async fn generate_answer(&self, request: &AnswerRequest<'_>) -> Result<AiResponse, AiError> {
        let content = self.next_answer(request, false)?;
        Ok(AiResponse {
            content,
            usage: TokenUsage {
                input_tokens: 1000,
                output_tokens: 20,
            },
            finish_reason: Some("STOP".into()),
        })
    }

    async fn generate_answer_streaming(
        &self,
        request: &AnswerRequest<'_>,
        on_chunk: ChunkSink,
    ) -> Result<AiResponse, AiError> {
        let content = self.next_answer(request, true)?;
        for word in content.split_inclusive(' ') {
            on_chunk(word.to_string());
        }
        Ok(AiResponse {
            content,
            usage: TokenUsage {
                input_tokens: 1000,
                output_tokens: 20,
            },
            finish_reason: Some("STOP".into()),
        })
    }
}

pub fn settings() -> GenerationSettings {
    GenerationSettings {
        temperature: 0.2,
        top_p: 0.95,
        top_k: 64,
        max_output_tokens: 8192,
        system_instruction: "Tu única fuente de verdad es el PDF adjunto. \
                             Si no encuentras el dato, di 'No figura en el catálogo'."
            .into(),
    }
}

pub fn credentials() -> Arc<Credentials> {
    Arc::new(Credentials::new(PASSWORD, "test-api-key"))
}

pub fn unlocked_session() -> ChatSession {
    let mut session = ChatSession::new(credentials());
    session.submit_password(PASSWORD.to_string());
    session
}

/// Write a stand-in catalog PDF into `dir` and describe it.
pub fn catalog_in(dir: &tempfile::TempDir) -> DocumentSource {
    let path = dir.path().join("catalog.pdf");
    std::fs::write(&path, b"%PDF-1.4\n% test catalog\n").unwrap();
    DocumentSource::new(path, "application/pdf")
}

pub fn missing_catalog(dir: &tempfile::TempDir) -> DocumentSource {
    DocumentSource::new(dir.path().join("absent.pdf"), "application/pdf")
}

pub fn path_of(source: &DocumentSource) -> PathBuf {
    source.path.clone()
}
