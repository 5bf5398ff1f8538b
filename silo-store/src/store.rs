use async_trait::async_trait;
use silo_sign::SignatureValidator;

use crate::error::StoreResult;
use crate::types::{ByteStream, ObjectMeta};

/// The uniform blob interface every storage backend implements.
///
/// URL-minting operations return `Ok(String::new())` rather than an error
/// when the backend does not mint URLs — callers (the URL strategy layer)
/// treat an empty string as "use direct upload/download instead".
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(
        &self,
        key: &str,
        content_type: Option<&str>,
        stream: ByteStream,
    ) -> StoreResult<ObjectMeta>;

    async fn download(&self, key: &str) -> StoreResult<ByteStream>;

    async fn delete(&self, key: &str) -> StoreResult<()>;

    async fn get_object_meta(&self, key: &str) -> StoreResult<ObjectMeta>;

    async fn get_upload_url(&self, key: &str) -> StoreResult<String>;

    async fn get_download_url(&self, key: &str, filename: Option<&str>) -> StoreResult<String>;

    async fn get_preview_url(&self, key: &str) -> StoreResult<String>;

    /// Backend name this instance is registered under in the service's
    /// backend registry. Used for log lines and `Object.storage_backend_name`.
    fn backend_name(&self) -> &str;

    /// Runtime capability query: backends that mint presigned
    /// URLs and can also validate them (today, only the filesystem backend)
    /// return `Some`. Queried from the HTTP boundary rather than downcast,
    /// since `BlobStore` is used as a trait object.
    fn as_signature_validator(&self) -> Option<&dyn SignatureValidator> {
        None
    }
}
