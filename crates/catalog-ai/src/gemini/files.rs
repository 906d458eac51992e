//! Files API: resumable upload of the catalog and processing-state polling.

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{AiError, DocumentHandle, DocumentSource};

use super::client::{check_status, transport_error, GeminiClient};

/// Processing state reported for an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Processing,
    Active,
    Failed,
}

impl FileState {
    /// Missing or unspecified states count as usable.
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("PROCESSING") => FileState::Processing,
            Some("FAILED") => FileState::Failed,
            _ => FileState::Active,
        }
    }
}

impl GeminiClient {
    /// Upload `source` with the two-step resumable protocol, then wait until
    /// the service reports the file usable.
    pub(crate) async fn upload_file(
        &self,
        source: &DocumentSource,
    ) -> Result<DocumentHandle, AiError> {
        let bytes = tokio::fs::read(&source.path).await?;
        debug!(
            path = %source.path.display(),
            size = bytes.len(),
            mime = %source.mime_type,
            "Gemini file upload start"
        );

        let start = self
            .http
            .post(self.upload_url())
            .header("x-goog-api-key", &self.config.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", &source.mime_type)
            .json(&json!({ "file": { "display_name": source.display_name } }))
            .send()
            .await
            .map_err(transport_error)?;
        let start = check_status(start).await?;

        let session_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .ok_or_else(|| AiError::ParseError("missing x-goog-upload-url header".to_string()))?;

        let finish = self
            .http
            .post(&session_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await
            .map_err(transport_error)?;
        let json: Value = check_status(finish)
            .await?
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        let (handle, state) = parse_file(&json["file"])?;
        info!(file = %handle.name(), ?state, "Gemini file uploaded");
        self.wait_until_active(handle, state).await
    }

    async fn wait_until_active(
        &self,
        handle: DocumentHandle,
        mut state: FileState,
    ) -> Result<DocumentHandle, AiError> {
        let mut polls = 0;
        loop {
            match state {
                FileState::Active => return Ok(handle),
                FileState::Failed => {
                    return Err(AiError::ApiError(format!(
                        "file {} failed processing",
                        handle.name()
                    )))
                }
                FileState::Processing if polls >= self.config.max_polls => {
                    return Err(AiError::ApiError(format!(
                        "file {} still processing after {polls} polls",
                        handle.name()
                    )))
                }
                FileState::Processing => {}
            }

            tokio::time::sleep(self.config.poll_interval).await;
            polls += 1;
            state = self.fetch_file_state(handle.name()).await?;
            debug!(file = %handle.name(), ?state, polls, "Gemini file state");
        }
    }

    async fn fetch_file_state(&self, name: &str) -> Result<FileState, AiError> {
        let response = self
            .http
            .get(self.file_url(name))
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(transport_error)?;
        let json: Value = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;
        Ok(FileState::parse(json["state"].as_str()))
    }
}

/// Extract the handle and state from a Files API `File` resource.
pub(crate) fn parse_file(file: &Value) -> Result<(DocumentHandle, FileState), AiError> {
    let name = file["name"]
        .as_str()
        .ok_or_else(|| AiError::ParseError("file resource has no name".to_string()))?;
    let uri = file["uri"]
        .as_str()
        .ok_or_else(|| AiError::ParseError("file resource has no uri".to_string()))?;
    let mime_type = file["mimeType"].as_str().unwrap_or("application/octet-stream");
    Ok((
        DocumentHandle::new(name, uri, mime_type),
        FileState::parse(file["state"].as_str()),
    ))
}
