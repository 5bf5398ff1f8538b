use bytes::Bytes;
use futures_core::Stream;
use std::pin::Pin;

/// Stream of bytes handed to `BlobStore::upload`.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// `{content-type, size, ETag}` returned by `BlobStore::get_object_meta`.
#[derive(Debug, Clone, Default)]
pub struct ObjectMeta {
    pub content_type: Option<String>,
    pub size_bytes: u64,
    pub etag: Option<String>,
}
