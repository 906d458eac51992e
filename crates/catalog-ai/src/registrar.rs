//! One-time registration of the reference document with the model service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::{ChatError, DocumentHandle, DocumentSource, ModelService};

/// Process-wide, single-flight document upload cache.
///
/// Concurrent first callers share one in-flight upload. A successful handle
/// is kept for the life of the registrar; a failed upload leaves the cache
/// empty so the next call tries again.
pub struct DocumentRegistrar {
    service: Arc<dyn ModelService>,
    source: DocumentSource,
    handle: OnceCell<DocumentHandle>,
    upload_attempts: AtomicU64,
}

impl DocumentRegistrar {
    pub fn new(service: Arc<dyn ModelService>, source: DocumentSource) -> Self {
        Self {
            service,
            source,
            handle: OnceCell::new(),
            upload_attempts: AtomicU64::new(0),
        }
    }

    /// Resolve the document handle, uploading on first use.
    ///
    /// The file is checked on every call; a missing file fails with
    /// `DocumentNotFound` before any network traffic.
    pub async fn document_handle(&self) -> Result<DocumentHandle, ChatError> {
        let present = tokio::fs::metadata(&self.source.path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !present {
            warn!(path = %self.source.path.display(), "reference document not found");
            return Err(ChatError::DocumentNotFound(self.source.path.clone()));
        }

        let handle = self
            .handle
            .get_or_try_init(|| async {
                let attempt = self.upload_attempts.fetch_add(1, Ordering::SeqCst) + 1;
                info!(path = %self.source.path.display(), attempt, "uploading reference document");
                self.service
                    .upload_document(&self.source)
                    .await
                    .map_err(|e| {
                        warn!(attempt, "document upload failed: {e}");
                        ChatError::UploadFailed(e)
                    })
            })
            .await?;
        Ok(handle.clone())
    }

    /// The cached handle, without triggering an upload.
    pub fn cached(&self) -> Option<&DocumentHandle> {
        self.handle.get()
    }

    pub fn is_registered(&self) -> bool {
        self.handle.initialized()
    }

    /// Upload calls issued so far, failed ones included.
    pub fn upload_attempts(&self) -> u64 {
        self.upload_attempts.load(Ordering::SeqCst)
    }
}
