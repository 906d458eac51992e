//! ModelService implementation for GeminiClient.

use async_trait::async_trait;
use tracing::debug;

use crate::streaming::{read_sse_events, SseEvent};
use crate::{
    AiError, AiResponse, AnswerRequest, ChunkSink, DocumentHandle, DocumentSource, ModelService,
};

use super::client::{
    api_error, append_candidate_text, check_status, parse_usage, transport_error, GeminiClient,
};

#[async_trait]
impl ModelService for GeminiClient {
    async fn upload_document(&self, source: &DocumentSource) -> Result<DocumentHandle, AiError> {
        self.upload_file(source).await
    }

    async fn generate_answer(&self, request: &AnswerRequest<'_>) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(request);

        debug!(model = %self.config.model, file = %request.document.name(), "Gemini API request");

        let response = self
            .http
            .post(self.generate_url(false))
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let json: serde_json::Value = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        self.parse_response(&json)
    }

    async fn generate_answer_streaming(
        &self,
        request: &AnswerRequest<'_>,
        on_chunk: ChunkSink,
    ) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(request);

        debug!(model = %self.config.model, file = %request.document.name(), "Gemini API streaming request");

        let response = self
            .http
            .post(self.generate_url(true))
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;

        let mut answer = AiResponse::default();
        let mut stream_error: Option<AiError> = None;

        read_sse_events(response, |event: SseEvent| {
            if stream_error.is_some() {
                return;
            }
            let data: serde_json::Value = match serde_json::from_str(&event.data) {
                Ok(v) => v,
                Err(e) => {
                    stream_error = Some(AiError::ParseError(e.to_string()));
                    return;
                }
            };
            if let Some(err) = api_error(&data) {
                stream_error = Some(err);
                return;
            }

            let mut chunk = String::new();
            if let Some(candidate) = data["candidates"].as_array().and_then(|c| c.first()) {
                append_candidate_text(candidate, &mut chunk);
                if let Some(reason) = candidate["finishReason"].as_str() {
                    answer.finish_reason = Some(reason.to_string());
                }
            }
            // Later chunks carry cumulative counts.
            if let Some(usage) = parse_usage(&data) {
                answer.usage = usage;
            }
            if !chunk.is_empty() {
                answer.content.push_str(&chunk);
                on_chunk(chunk);
            }
        })
        .await?;

        match stream_error {
            Some(err) => Err(err),
            None => Ok(answer),
        }
    }
}
