//! silo-store: the `BlobStore` abstraction with memory,
//! filesystem, and S3-compatible backends, plus the `ObjectKeyGenerator`
//! trait for deriving storage keys.

pub mod config;
pub mod error;
pub mod fs;
pub mod keygen;
pub mod memory;
pub mod s3;
pub mod store;
pub mod types;

pub use config::{S3Config, SseMode};
pub use error::{StoreError, StoreResult};
pub use fs::FilesystemBlobStore;
pub use keygen::{
    GitLikeKeyGenerator, HighPerformanceKeyGenerator, KeyGenInput, LegacyKeyGenerator,
    ObjectKeyGenerator, TenantAwareKeyGenerator,
};
pub use memory::MemoryBlobStore;
pub use s3::S3CompatibleStore;
pub use store::BlobStore;
pub use types::{ByteStream, ObjectMeta};
