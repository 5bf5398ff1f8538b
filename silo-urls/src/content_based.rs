use async_trait::async_trait;
use silo_core::ContentResult;
use silo_model::{Content, Object};
use silo_store::BlobStore;

use crate::strategy::UrlStrategy;

/// Routes every URL back through the service itself:
/// `/api/v1/contents/{id}/download`. Useful when the service must mediate
/// every byte (access-control hook points), at the cost of every
/// download/preview roundtripping through the app instead of a CDN/backend.
pub struct ContentBasedUrlStrategy {
    base_url: String,
}

impl ContentBasedUrlStrategy {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }
}

#[async_trait]
impl UrlStrategy for ContentBasedUrlStrategy {
    async fn download_url(
        &self,
        content: &Content,
        _object: &Object,
        _backend: &dyn BlobStore,
    ) -> ContentResult<String> {
        Ok(format!("{}/api/v1/contents/{}/download", self.base_url, content.id))
    }

    async fn preview_url(
        &self,
        content: &Content,
        _object: &Object,
        _backend: &dyn BlobStore,
    ) -> ContentResult<String> {
        Ok(format!("{}/api/v1/contents/{}/preview", self.base_url, content.id))
    }

    async fn upload_url(
        &self,
        content: &Content,
        _object: &Object,
        _backend: &dyn BlobStore,
    ) -> ContentResult<String> {
        Ok(format!("{}/api/v1/contents/{}/objects", self.base_url, content.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silo_model::{ContentId, ObjectId, ObjectStatus};
    use silo_store::MemoryBlobStore;

    fn object() -> Object {
        Object::new(ContentId::new(), "mem", 1, "k", "text/plain")
    }

    #[tokio::test]
    async fn builds_mediated_urls() {
        let strategy = ContentBasedUrlStrategy::new("https://api.example.com/");
        let content = Content::new("t", "o", "user", "a.txt", "text/plain");
        let mut obj = object();
        obj.status = ObjectStatus::Uploaded;
        let backend = MemoryBlobStore::new("mem");

        let download = strategy.download_url(&content, &obj, &backend).await.unwrap();
        assert_eq!(
            download,
            format!("https://api.example.com/api/v1/contents/{}/download", content.id)
        );
    }
}
