use async_trait::async_trait;
use silo_core::ContentResult;
use silo_model::{Content, Object};
use silo_store::BlobStore;

/// Given `(content, object, backend)`, produce download/preview/upload
/// URLs. Three implementations are selected by config; all
/// satisfy this one trait so `Service` stays agnostic to which is wired in.
#[async_trait]
pub trait UrlStrategy: Send + Sync {
    /// URL a client fetches bytes from. `""` if the strategy has no URL to
    /// offer for this content/object pair.
    async fn download_url(
        &self,
        content: &Content,
        object: &Object,
        backend: &dyn BlobStore,
    ) -> ContentResult<String>;

    /// Inline-rendering URL (no Content-Disposition).
    async fn preview_url(
        &self,
        content: &Content,
        object: &Object,
        backend: &dyn BlobStore,
    ) -> ContentResult<String>;

    /// Where a client should `PUT` bytes; `""` if uploads are direct-to-service.
    async fn upload_url(
        &self,
        content: &Content,
        object: &Object,
        backend: &dyn BlobStore,
    ) -> ContentResult<String>;
}
