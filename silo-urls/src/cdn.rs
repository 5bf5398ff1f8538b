use async_trait::async_trait;
use silo_core::ContentResult;
use silo_model::{Content, Object};
use silo_store::BlobStore;

use crate::strategy::UrlStrategy;

/// CDN-fronted URLs: `{cdnBaseURL}/{objectKey}`, immutable and
/// caching-friendly. Uploads go through a separate base URL when
/// configured (typically a different, write-only endpoint than the public
/// CDN); otherwise upload URLs are empty (direct-to-service upload).
pub struct CdnUrlStrategy {
    cdn_base_url: String,
    upload_base_url: Option<String>,
}

impl CdnUrlStrategy {
    pub fn new(cdn_base_url: impl Into<String>) -> Self {
        Self {
            cdn_base_url: trim_trailing_slash(cdn_base_url.into()),
            upload_base_url: None,
        }
    }

    pub fn with_upload_base_url(mut self, upload_base_url: impl Into<String>) -> Self {
        self.upload_base_url = Some(trim_trailing_slash(upload_base_url.into()));
        self
    }
}

fn trim_trailing_slash(mut s: String) -> String {
    while s.ends_with('/') {
        s.pop();
    }
    s
}

#[async_trait]
impl UrlStrategy for CdnUrlStrategy {
    async fn download_url(
        &self,
        _content: &Content,
        object: &Object,
        _backend: &dyn BlobStore,
    ) -> ContentResult<String> {
        Ok(format!("{}/{}", self.cdn_base_url, object.object_key))
    }

    async fn preview_url(
        &self,
        _content: &Content,
        object: &Object,
        _backend: &dyn BlobStore,
    ) -> ContentResult<String> {
        Ok(format!("{}/{}", self.cdn_base_url, object.object_key))
    }

    async fn upload_url(
        &self,
        _content: &Content,
        object: &Object,
        _backend: &dyn BlobStore,
    ) -> ContentResult<String> {
        match &self.upload_base_url {
            Some(base) => Ok(format!("{}/{}", base, object.object_key)),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silo_model::ContentId;
    use silo_store::MemoryBlobStore;

    #[tokio::test]
    async fn builds_immutable_cdn_urls() {
        let strategy = CdnUrlStrategy::new("https://cdn.example.com/");
        let content = Content::new("t", "o", "user", "a.txt", "text/plain");
        let object = Object::new(ContentId::new(), "mem", 1, "originals/ab/cd_a.txt", "text/plain");
        let backend = MemoryBlobStore::new("mem");

        let url = strategy.download_url(&content, &object, &backend).await.unwrap();
        assert_eq!(url, "https://cdn.example.com/originals/ab/cd_a.txt");
    }

    #[tokio::test]
    async fn upload_url_is_empty_without_a_configured_upload_base() {
        let strategy = CdnUrlStrategy::new("https://cdn.example.com");
        let content = Content::new("t", "o", "user", "a.txt", "text/plain");
        let object = Object::new(ContentId::new(), "mem", 1, "k", "text/plain");
        let backend = MemoryBlobStore::new("mem");

        assert_eq!(strategy.upload_url(&content, &object, &backend).await.unwrap(), "");
    }
}
