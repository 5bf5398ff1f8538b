use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use silo_sign::{PresignedSigner, SignatureValidator};

use crate::error::{StoreError, StoreResult};
use crate::store::BlobStore;
use crate::types::{ByteStream, ObjectMeta};

/// Filesystem blob store: keys become paths under a base directory.
/// Rejects keys that would escape the base directory via
/// `..` traversal. URL operations are signed by an optional
/// [`PresignedSigner`]; if none is configured, URLs are issued unsigned,
/// which is fine for local development but not suitable for production use.
pub struct FilesystemBlobStore {
    name: String,
    base_dir: PathBuf,
    signer: Option<PresignedSigner>,
}

impl FilesystemBlobStore {
    pub fn new(name: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            base_dir: base_dir.into(),
            signer: None,
        }
    }

    pub fn with_signer(mut self, signer: PresignedSigner) -> Self {
        self.signer = Some(signer);
        self
    }

    fn resolve(&self, key: &str) -> StoreResult<PathBuf> {
        if key.is_empty() {
            return Err(StoreError::invalid_key(key, "object key is empty"));
        }
        let rel = Path::new(key);
        for component in rel.components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(StoreError::invalid_key(
                        key,
                        "object key must be a relative path with no `.`/`..` components",
                    ))
                }
            }
        }
        Ok(self.base_dir.join(rel))
    }

    fn sign(&self, method: &str, path: &str) -> String {
        match &self.signer {
            Some(signer) => signer.sign_url_default(method, path),
            None => path.to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn upload(
        &self,
        key: &str,
        content_type: Option<&str>,
        mut stream: ByteStream,
    ) -> StoreResult<ObjectMeta> {
        use futures_util::StreamExt;

        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io("creating parent directory", e))?;
        }
        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| StoreError::io("creating object file", e))?;
        let mut size = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk: Bytes = chunk.map_err(|e| StoreError::io("reading upload stream", e))?;
            size += chunk.len() as u64;
            file.write_all(&chunk)
                .await
                .map_err(|e| StoreError::io("writing object file", e))?;
        }
        file.flush().await.map_err(|e| StoreError::io("flushing object file", e))?;

        Ok(ObjectMeta {
            content_type: content_type.map(str::to_string),
            size_bytes: size,
            etag: None,
        })
    }

    async fn download(&self, key: &str) -> StoreResult<ByteStream> {
        let path = self.resolve(key)?;
        let file = tokio::fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::not_found(key)
            } else {
                StoreError::io("opening object file", e)
            }
        })?;
        let stream = ReaderStream::new(file);
        Ok(Box::pin(stream))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io("deleting object file", e)),
        }
    }

    async fn get_object_meta(&self, key: &str) -> StoreResult<ObjectMeta> {
        let path = self.resolve(key)?;
        let meta = tokio::fs::metadata(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::not_found(key)
            } else {
                StoreError::io("reading object metadata", e)
            }
        })?;
        Ok(ObjectMeta {
            content_type: None,
            size_bytes: meta.len(),
            etag: None,
        })
    }

    async fn get_upload_url(&self, key: &str) -> StoreResult<String> {
        Ok(self.sign("PUT", &format!("/upload/{key}")))
    }

    async fn get_download_url(&self, key: &str, filename: Option<&str>) -> StoreResult<String> {
        let path = match filename {
            Some(name) => format!("/download/{key}?filename={name}"),
            None => format!("/download/{key}"),
        };
        Ok(self.sign("GET", &path))
    }

    async fn get_preview_url(&self, key: &str) -> StoreResult<String> {
        Ok(self.sign("GET", &format!("/preview/{key}")))
    }

    fn backend_name(&self) -> &str {
        &self.name
    }

    fn as_signature_validator(&self) -> Option<&dyn SignatureValidator> {
        self.signer.as_ref().map(|s| s as &dyn SignatureValidator)
    }
}

/// Used by `silo-config::BuildService` to size the default presign window
/// when a `file://` storage URL is configured without an explicit expiry.
pub const DEFAULT_PRESIGN_EXPIRY: Duration = Duration::from_secs(900);

#[cfg(test)]
mod tests {
    use super::*;

    fn body(data: &'static [u8]) -> ByteStream {
        Box::pin(futures_util::stream::once(async move { Ok(Bytes::from(data)) }))
    }

    #[tokio::test]
    async fn upload_then_download_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemBlobStore::new("fs", dir.path());
        store
            .upload("originals/objects/ab/cd_file.txt", Some("text/plain"), body(b"hello"))
            .await
            .unwrap();

        let mut stream = store.download("originals/objects/ab/cd_file.txt").await.unwrap();
        use futures_util::StreamExt;
        let mut got = Vec::new();
        while let Some(chunk) = stream.next().await {
            got.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(got, b"hello");
    }

    #[tokio::test]
    async fn rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemBlobStore::new("fs", dir.path());
        let err = store.upload("../escape.txt", None, body(b"x")).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey { .. }));
    }

    #[tokio::test]
    async fn unsigned_urls_when_no_signer_configured() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemBlobStore::new("fs", dir.path());
        assert_eq!(store.get_upload_url("k").await.unwrap(), "/upload/k");
    }

    #[tokio::test]
    async fn signed_urls_validate_when_signer_configured() {
        let dir = tempfile::tempdir().unwrap();
        let signer = PresignedSigner::new(b"s".repeat(32)).with_url_pattern("/upload/{key}");
        let store = FilesystemBlobStore::new("fs", dir.path()).with_signer(signer.clone());
        let url = store.get_upload_url("k").await.unwrap();
        assert!(url.starts_with("/upload/k?signature="));
        let validator = store.as_signature_validator().unwrap();
        let validated = validator.validate("PUT", &url).unwrap();
        assert_eq!(validated.object_key.as_deref(), Some("k"));
    }
}
