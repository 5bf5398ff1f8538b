use std::collections::BTreeMap;

use serde::Deserialize;

/// Body of `POST /contents`.
#[derive(Debug, Deserialize)]
pub struct CreateContentBody {
    pub tenant_id: String,
    pub owner_id: String,
    pub owner_type: String,
    pub name: String,
    pub document_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `PUT /contents/{id}/metadata`. `content_id` is
/// always taken from the path, not this body.
#[derive(Debug, Deserialize, Default)]
pub struct SetContentMetadataBody {
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub custom: BTreeMap<String, serde_json::Value>,
}

/// Body of `POST /contents/{id}/objects`: mints an Object record and a
/// presigned upload URL.
#[derive(Debug, Deserialize, Default)]
pub struct CreateObjectBody {
    #[serde(default)]
    pub backend: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Body of `POST /contents/{id}/derived`. `parent_id` is taken
/// from the path.
#[derive(Debug, Deserialize, Default)]
pub struct CreateDerivedContentBody {
    #[serde(default)]
    pub derivation_type: String,
    #[serde(default)]
    pub variant: String,
    pub name: String,
    pub document_type: String,
    pub owner_id: String,
    pub owner_type: String,
    pub tenant_id: String,
    #[serde(default)]
    pub derivation_params: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub processing_metadata: BTreeMap<String, serde_json::Value>,
}

/// Query params for `GET /contents/bulk?id=…&id=…` (max 50 ids).
#[derive(Debug, Deserialize, Default)]
pub struct BulkQuery {
    #[serde(default)]
    pub id: Vec<String>,
}

/// Query params for `GET /contents/{id}/objects?latest=true|false`.
#[derive(Debug, Deserialize, Default)]
pub struct ListObjectsQuery {
    #[serde(default)]
    pub latest: bool,
}

/// JSON shape of the `ObjectMeta` returned by a raw upload.
/// `silo-store` itself stays free of a `serde` dependency; this is the one
/// place that needs the wire shape.
#[derive(Debug, serde::Serialize)]
pub struct UploadResultDto {
    pub content_type: Option<String>,
    pub size_bytes: u64,
    pub etag: Option<String>,
}

impl From<silo_store::ObjectMeta> for UploadResultDto {
    fn from(meta: silo_store::ObjectMeta) -> Self {
        Self {
            content_type: meta.content_type,
            size_bytes: meta.size_bytes,
            etag: meta.etag,
        }
    }
}
