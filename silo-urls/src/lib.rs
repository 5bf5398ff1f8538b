//! silo-urls: the URL strategy layer — content-based, CDN, and
//! storage-delegated URL minting, chosen per-service by config.

pub mod cdn;
pub mod content_based;
pub mod storage_delegated;
pub mod strategy;

pub use cdn::CdnUrlStrategy;
pub use content_based::ContentBasedUrlStrategy;
pub use storage_delegated::StorageDelegatedUrlStrategy;
pub use strategy::UrlStrategy;
