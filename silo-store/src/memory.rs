use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::error::{StoreError, StoreResult};
use crate::store::BlobStore;
use crate::types::{ByteStream, ObjectMeta};

#[derive(Debug, Clone)]
struct Entry {
    bytes: Bytes,
    content_type: Option<String>,
}

/// In-memory blob store: keys map to byte buffers under a single mutex.
/// Never mints URLs. Trivial but must be concurrency-safe —
/// `parking_lot::Mutex` rather than `std::sync::Mutex` to match the
/// lock used across the rest of this crate's backends.
pub struct MemoryBlobStore {
    name: String,
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryBlobStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        key: &str,
        content_type: Option<&str>,
        mut stream: ByteStream,
    ) -> StoreResult<ObjectMeta> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| StoreError::io("reading upload stream", e))?;
            buf.extend_from_slice(&chunk);
        }
        let bytes = buf.freeze();
        let meta = ObjectMeta {
            content_type: content_type.map(str::to_string),
            size_bytes: bytes.len() as u64,
            etag: None,
        };
        self.entries.lock().insert(
            key.to_string(),
            Entry {
                bytes,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(meta)
    }

    async fn download(&self, key: &str) -> StoreResult<ByteStream> {
        let entry = self
            .entries
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::not_found(key))?;
        let stream = futures_util::stream::once(async move { Ok(entry.bytes) });
        Ok(Box::pin(stream))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        // Idempotent: deleting a key that isn't there is a no-op.
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn get_object_meta(&self, key: &str) -> StoreResult<ObjectMeta> {
        let entry = self
            .entries
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::not_found(key))?;
        Ok(ObjectMeta {
            content_type: entry.content_type,
            size_bytes: entry.bytes.len() as u64,
            etag: None,
        })
    }

    async fn get_upload_url(&self, _key: &str) -> StoreResult<String> {
        Ok(String::new())
    }

    async fn get_download_url(&self, _key: &str, _filename: Option<&str>) -> StoreResult<String> {
        Ok(String::new())
    }

    async fn get_preview_url(&self, _key: &str) -> StoreResult<String> {
        Ok(String::new())
    }

    fn backend_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(data: &'static [u8]) -> ByteStream {
        Box::pin(futures_util::stream::once(async move { Ok(Bytes::from(data)) }))
    }

    #[tokio::test]
    async fn upload_then_download_round_trips() {
        let store = MemoryBlobStore::new("mem");
        store.upload("k1", Some("text/plain"), body(b"hello")).await.unwrap();

        let mut stream = store.download("k1").await.unwrap();
        let mut got = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            got.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(&got[..], b"hello");
    }

    #[tokio::test]
    async fn download_missing_key_is_not_found() {
        let store = MemoryBlobStore::new("mem");
        assert!(matches!(
            store.download("nope").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryBlobStore::new("mem");
        store.upload("k1", None, body(b"x")).await.unwrap();
        store.delete("k1").await.unwrap();
        store.delete("k1").await.unwrap();
    }

    #[tokio::test]
    async fn never_mints_urls() {
        let store = MemoryBlobStore::new("mem");
        assert_eq!(store.get_upload_url("k").await.unwrap(), "");
        assert_eq!(store.get_download_url("k", None).await.unwrap(), "");
        assert_eq!(store.get_preview_url("k").await.unwrap(), "");
    }
}
