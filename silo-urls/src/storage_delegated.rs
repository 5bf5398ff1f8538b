use async_trait::async_trait;
use silo_core::ContentResult;
use silo_model::{Content, Object};
use silo_store::BlobStore;

use crate::strategy::UrlStrategy;

/// Delegates straight to the backend's own URL minting. The
/// only strategy that uses presigned URLs. If the backend returns `""`,
/// this strategy returns `""` too — no fallback to another scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageDelegatedUrlStrategy;

#[async_trait]
impl UrlStrategy for StorageDelegatedUrlStrategy {
    async fn download_url(
        &self,
        _content: &Content,
        object: &Object,
        backend: &dyn BlobStore,
    ) -> ContentResult<String> {
        let filename = object.file_name.as_deref();
        Ok(backend.get_download_url(&object.object_key, filename).await?)
    }

    async fn preview_url(
        &self,
        _content: &Content,
        object: &Object,
        backend: &dyn BlobStore,
    ) -> ContentResult<String> {
        Ok(backend.get_preview_url(&object.object_key).await?)
    }

    async fn upload_url(
        &self,
        _content: &Content,
        object: &Object,
        backend: &dyn BlobStore,
    ) -> ContentResult<String> {
        Ok(backend.get_upload_url(&object.object_key).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silo_model::ContentId;
    use silo_store::{FilesystemBlobStore, MemoryBlobStore};

    #[tokio::test]
    async fn memory_backend_yields_empty_urls() {
        let strategy = StorageDelegatedUrlStrategy;
        let content = Content::new("t", "o", "user", "a.txt", "text/plain");
        let object = Object::new(ContentId::new(), "mem", 1, "k", "text/plain");
        let backend = MemoryBlobStore::new("mem");

        assert_eq!(strategy.download_url(&content, &object, &backend).await.unwrap(), "");
        assert_eq!(strategy.upload_url(&content, &object, &backend).await.unwrap(), "");
        assert_eq!(strategy.preview_url(&content, &object, &backend).await.unwrap(), "");
    }

    #[tokio::test]
    async fn filesystem_backend_yields_backend_minted_urls() {
        // get_upload_url only formats a path; it never touches the base dir.
        let strategy = StorageDelegatedUrlStrategy;
        let content = Content::new("t", "o", "user", "a.txt", "text/plain");
        let object = Object::new(ContentId::new(), "fs", 1, "k", "text/plain");
        let backend = FilesystemBlobStore::new("fs", "/tmp/silo-urls-unused");

        let url = strategy.upload_url(&content, &object, &backend).await.unwrap();
        assert_eq!(url, "/upload/k");
    }
}
