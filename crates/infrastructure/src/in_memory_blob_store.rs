use std::collections::HashMap;

use async_trait::async_trait;
use pulse_application::{BlobStore, ProgressSender};
use pulse_core::{AppError, AppResult};
use pulse_domain::UploadProgress;
use tokio::sync::RwLock;

const URL_SCHEME: &str = "memory://";
const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// In-memory object storage with chunked progress reporting.
#[derive(Debug)]
pub struct InMemoryBlobStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    chunk_size: usize,
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }
}

impl InMemoryBlobStore {
    /// Creates an empty blob store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty blob store that reports progress every `chunk_size` bytes.
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Returns the stored bytes behind a download URL.
    pub async fn object(&self, url: &str) -> Option<Vec<u8>> {
        let path = url.strip_prefix(URL_SCHEME)?;
        self.objects.read().await.get(path).cloned()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        progress: Option<ProgressSender>,
    ) -> AppResult<String> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Err(AppError::InvalidArgument(
                "object path must not be empty".to_owned(),
            ));
        }

        if let Some(progress) = progress {
            report_progress(&progress, bytes.len(), self.chunk_size);
        }

        self.objects.write().await.insert(path.to_owned(), bytes);
        Ok(format!("{URL_SCHEME}{path}"))
    }

    async fn delete(&self, url: &str) -> AppResult<()> {
        let path = url.strip_prefix(URL_SCHEME).ok_or_else(|| {
            AppError::InvalidArgument(format!("'{url}' is not a blob store url"))
        })?;

        self.objects
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("object '{path}' does not exist")))
    }
}

// Stops quietly once the subscriber drops its receiver.
fn report_progress(progress: &ProgressSender, total: usize, chunk_size: usize) {
    let total_bytes = total as u64;
    if total == 0 {
        let _ = progress.send(UploadProgress {
            bytes_transferred: 0,
            total_bytes,
        });
        return;
    }

    let mut transferred = 0;
    while transferred < total {
        transferred = (transferred + chunk_size).min(total);
        let update = UploadProgress {
            bytes_transferred: transferred as u64,
            total_bytes,
        };
        if progress.send(update).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use pulse_application::BlobStore;
    use pulse_core::AppError;
    use tokio::sync::mpsc;

    use super::InMemoryBlobStore;

    #[tokio::test]
    async fn upload_reports_chunked_progress_and_returns_url() {
        let store = InMemoryBlobStore::with_chunk_size(4);
        let (sender, mut receiver) = mpsc::unbounded_channel();

        let url = store
            .upload("uploads/1_a.png", vec![0; 10], Some(sender))
            .await
            .unwrap_or_else(|_| unreachable!());

        let mut transferred = Vec::new();
        while let Some(update) = receiver.recv().await {
            assert_eq!(update.total_bytes, 10);
            transferred.push(update.bytes_transferred);
        }
        assert_eq!(transferred, vec![4, 8, 10]);
        assert_eq!(url, "memory://uploads/1_a.png");
        assert_eq!(store.object(&url).await, Some(vec![0; 10]));
    }

    #[tokio::test]
    async fn dropped_receiver_does_not_fail_the_upload() {
        let store = InMemoryBlobStore::with_chunk_size(1);
        let (sender, receiver) = mpsc::unbounded_channel();
        drop(receiver);

        let result = store.upload("uploads/clip.mp4", vec![1, 2, 3], Some(sender)).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn delete_removes_object_and_reports_missing_ones() {
        let store = InMemoryBlobStore::new();
        let url = store
            .upload("uploads/a.gif", vec![7], None)
            .await
            .unwrap_or_else(|_| unreachable!());

        store.delete(&url).await.unwrap_or_else(|_| unreachable!());

        assert!(store.object(&url).await.is_none());
        assert!(matches!(store.delete(&url).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            store.delete("https://elsewhere/a.gif").await,
            Err(AppError::InvalidArgument(_))
        ));
    }
}
