//! Gemini API client struct, request building, and response parsing.

use serde_json::{json, Value};

use crate::{AiError, AiResponse, AnswerRequest, TokenUsage};

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub(crate) fn generate_url(&self, stream: bool) -> String {
        let method = if stream {
            "streamGenerateContent?alt=sse"
        } else {
            "generateContent"
        };
        format!(
            "{}/v1beta/models/{}:{}",
            self.config.api_base, self.config.model, method
        )
    }

    pub(crate) fn upload_url(&self) -> String {
        format!("{}/upload/v1beta/files", self.config.api_base)
    }

    /// Metadata URL for an uploaded file (`name` is `files/<id>`).
    pub(crate) fn file_url(&self, name: &str) -> String {
        format!("{}/v1beta/{}", self.config.api_base, name)
    }

    /// Build the `generateContent` body: the document reference followed by
    /// the prompt, in a single user turn.
    pub(crate) fn build_request_body(&self, request: &AnswerRequest<'_>) -> Value {
        let generation = request.generation;
        json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {
                        "fileData": {
                            "mimeType": request.document.mime_type(),
                            "fileUri": request.document.uri(),
                        }
                    },
                    { "text": request.prompt }
                ]
            }],
            "generationConfig": {
                "temperature": generation.temperature,
                "topP": generation.top_p,
                "topK": generation.top_k,
                "maxOutputTokens": generation.max_output_tokens,
            },
            "systemInstruction": {
                "parts": [{ "text": generation.system_instruction }]
            }
        })
    }

    /// Parse a complete `generateContent` response.
    pub(crate) fn parse_response(&self, json: &Value) -> Result<AiResponse, AiError> {
        if let Some(err) = api_error(json) {
            return Err(err);
        }

        let Some(first) = json["candidates"].as_array().and_then(|c| c.first()) else {
            if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
                return Err(AiError::ApiError(format!("prompt blocked: {reason}")));
            }
            return Err(AiError::ParseError("no candidates in response".to_string()));
        };

        let mut content = String::new();
        append_candidate_text(first, &mut content);

        Ok(AiResponse {
            content,
            usage: parse_usage(json).unwrap_or_default(),
            finish_reason: first["finishReason"].as_str().map(String::from),
        })
    }
}

/// Append every text part of a candidate to `out`.
pub(crate) fn append_candidate_text(candidate: &Value, out: &mut String) {
    if let Some(parts) = candidate["content"]["parts"].as_array() {
        for part in parts {
            if let Some(text) = part["text"].as_str() {
                out.push_str(text);
            }
        }
    }
}

pub(crate) fn parse_usage(json: &Value) -> Option<TokenUsage> {
    let meta = json.get("usageMetadata")?;
    Some(TokenUsage {
        input_tokens: meta["promptTokenCount"].as_u64().unwrap_or(0),
        output_tokens: meta["candidatesTokenCount"].as_u64().unwrap_or(0),
    })
}

/// An `{"error": {...}}` envelope, which Gemini also sends inside SSE streams.
pub(crate) fn api_error(json: &Value) -> Option<AiError> {
    let err = json.get("error")?;
    let message = err["message"].as_str().unwrap_or("unknown error");
    match err["code"].as_u64() {
        Some(429) => Some(AiError::RateLimited),
        Some(code) => Some(AiError::ApiError(format!("HTTP {code}: {message}"))),
        None => Some(AiError::ApiError(message.to_string())),
    }
}

/// Map a reqwest send/read failure, keeping timeouts distinct.
pub(crate) fn transport_error(e: reqwest::Error) -> AiError {
    if e.is_timeout() {
        AiError::Timeout
    } else {
        AiError::NetworkError(e.to_string())
    }
}

/// Turn a non-success status into the matching error, consuming the body.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(AiError::RateLimited);
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
    }
    Ok(response)
}
