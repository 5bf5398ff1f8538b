use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::ContentId;
use crate::status::ContentStatus;

/// A logical item managed by the content service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub id: ContentId,
    pub tenant_id: String,
    pub owner_id: String,
    pub owner_type: String,
    pub name: String,
    pub description: Option<String>,
    pub document_type: String,
    /// Empty for originals; "thumbnail" / "preview" / "transcode" / ... for
    /// derived content.
    pub derivation_type: String,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Content {
    pub fn new(
        tenant_id: impl Into<String>,
        owner_id: impl Into<String>,
        owner_type: impl Into<String>,
        name: impl Into<String>,
        document_type: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ContentId::new(),
            tenant_id: tenant_id.into(),
            owner_id: owner_id.into(),
            owner_type: owner_type.into(),
            name: name.into(),
            description: None,
            document_type: document_type.into(),
            derivation_type: String::new(),
            status: ContentStatus::Created,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_derivation_type(mut self, derivation_type: impl Into<String>) -> Self {
        self.derivation_type = derivation_type.into();
        self
    }

    pub fn is_original(&self) -> bool {
        self.derivation_type.is_empty()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Soft-delete: stamp `deleted_at`. This does *not* touch `status` —
    /// deletion is an orthogonal dimension from lifecycle status.
    pub fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// 1:1 metadata attached to a Content.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContentMetadata {
    pub content_id: Option<ContentId>,
    pub mime_type: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub tags: Vec<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl ContentMetadata {
    pub fn new(content_id: ContentId) -> Self {
        Self {
            content_id: Some(content_id),
            ..Default::default()
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_file_size(mut self, file_size: u64) -> Self {
        self.file_size = Some(file_size);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_custom(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.custom.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_content_is_an_original() {
        let c = Content::new("tenant-a", "owner-1", "user", "a.txt", "text/plain");
        assert!(c.is_original());
        assert_eq!(c.status, ContentStatus::Created);
        assert!(!c.is_deleted());
    }

    #[test]
    fn soft_delete_leaves_status_untouched() {
        let mut c = Content::new("t", "o", "user", "a.txt", "text/plain");
        c.status = ContentStatus::Uploaded;
        let at = Utc::now();
        c.mark_deleted(at);
        assert_eq!(c.status, ContentStatus::Uploaded);
        assert_eq!(c.deleted_at, Some(at));
    }
}
