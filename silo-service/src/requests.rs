//! Request/option structs for `Service`'s operations. These are
//! plain data, not builders with side effects — the functional-option
//! pattern lives in `silo-config` (ServerConfig) and in
//! [`crate::derive::ListDerivedContentOptions`] (a variadic-options pattern
//! for `ListDerivedContent`), not here.

use std::collections::BTreeMap;

use silo_model::ContentId;
use silo_store::ByteStream;

/// `CreateContent(req)`.
#[derive(Debug, Clone)]
pub struct CreateContentRequest {
    pub tenant_id: String,
    pub owner_id: String,
    pub owner_type: String,
    pub name: String,
    pub document_type: String,
    pub description: Option<String>,
}

/// `UploadContent(req)`: the one-shot ingest.
pub struct UploadContentRequest {
    pub tenant_id: String,
    pub owner_id: String,
    pub owner_type: String,
    pub name: String,
    pub document_type: String,
    pub description: Option<String>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub tags: Vec<String>,
    pub title: Option<String>,
    pub created_by: Option<String>,
    pub custom: BTreeMap<String, serde_json::Value>,
    /// Empty string means "use the default backend".
    pub backend: String,
    pub reader: ByteStream,
}

/// `UploadObjectForContent(req)`: attach a new Object to an existing
/// Content; leaves Content status untouched.
pub struct UploadObjectForContentRequest {
    pub content_id: ContentId,
    pub backend: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub reader: ByteStream,
}

/// `UploadDerivedContent(req)`: creates the child Content
/// linked to `parent_id`, uploads the bytes, and transitions the derived
/// child straight to `processed`.
pub struct UploadDerivedContentRequest {
    pub parent_id: ContentId,
    /// Empty means "infer from `variant`'s prefix up to the first
    /// underscore".
    pub derivation_type: String,
    pub variant: String,
    pub name: String,
    pub document_type: String,
    pub owner_id: String,
    pub owner_type: String,
    pub tenant_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub derivation_params: BTreeMap<String, serde_json::Value>,
    pub processing_metadata: BTreeMap<String, serde_json::Value>,
    pub reader: ByteStream,
}

/// `CreateObject(req)`: mints an Object record and a presigned
/// upload URL without touching any bytes.
#[derive(Debug, Clone, Default)]
pub struct CreateObjectRequest {
    pub content_id: ContentId,
    /// Empty string means "use the default backend".
    pub backend: String,
    pub file_name: Option<String>,
}

/// `CreateDerivedContent(req)`: creates the Content + edge
/// without bytes — used by async pipelines that fill in the Object later
/// via `UploadObjectForContent`.
#[derive(Debug, Clone, Default)]
pub struct CreateDerivedContentRequest {
    pub parent_id: Option<ContentId>,
    pub derivation_type: String,
    pub variant: String,
    pub name: String,
    pub document_type: String,
    pub owner_id: String,
    pub owner_type: String,
    pub tenant_id: String,
    pub derivation_params: BTreeMap<String, serde_json::Value>,
    pub processing_metadata: BTreeMap<String, serde_json::Value>,
}

/// Cheap-metadata-only knob for `GetContentDetails`/`GetContentDetailsBatch`:
/// when `with_urls` is `false`, the URL strategy is never called, so a
/// batch scan over many contents doesn't pay for N× URL-strategy round
/// trips.
#[derive(Debug, Clone, Copy)]
pub struct ContentDetailsOptions {
    pub with_urls: bool,
}

impl Default for ContentDetailsOptions {
    fn default() -> Self {
        Self { with_urls: true }
    }
}

impl ContentDetailsOptions {
    pub fn with_urls(with_urls: bool) -> Self {
        Self { with_urls }
    }
}
