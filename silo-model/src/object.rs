use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::{ContentId, ObjectId};
use crate::status::ObjectStatus;

/// One physical blob belonging to a Content. Version numbers
/// are caller-assigned and unique per content id; "latest" is max version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Object {
    pub id: ObjectId,
    pub content_id: ContentId,
    pub storage_backend_name: String,
    pub version: u32,
    pub object_key: String,
    pub object_type: String,
    pub file_name: Option<String>,
    pub status: ObjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Object {
    pub fn new(
        content_id: ContentId,
        storage_backend_name: impl Into<String>,
        version: u32,
        object_key: impl Into<String>,
        object_type: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            content_id,
            storage_backend_name: storage_backend_name.into(),
            version,
            object_key: object_key.into(),
            object_type: object_type.into(),
            file_name: None,
            status: ObjectStatus::Created,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Soft-delete: stamp `deleted_at`, independent of `status`, same as
    /// `Content::mark_deleted`.
    pub fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// 1:1 metadata for an Object.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ObjectMetadata {
    pub object_id: Option<ObjectId>,
    pub size_bytes: u64,
    pub mime_type: Option<String>,
    pub etag: Option<String>,
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl ObjectMetadata {
    pub fn new(object_id: ObjectId, size_bytes: u64) -> Self {
        Self {
            object_id: Some(object_id),
            size_bytes,
            ..Default::default()
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }
}
