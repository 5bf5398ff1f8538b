use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::ContentId;
use crate::status::ContentStatus;

/// The parent → child edge recorded when a derived Content (thumbnail,
/// preview, transcode, ...) is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedContent {
    pub parent_content_id: ContentId,
    pub child_content_id: ContentId,
    pub derivation_type: String,
    pub variant: String,
    pub derivation_params: BTreeMap<String, serde_json::Value>,
    pub processing_metadata: BTreeMap<String, serde_json::Value>,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DerivedContent {
    pub fn new(
        parent_content_id: ContentId,
        child_content_id: ContentId,
        derivation_type: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            parent_content_id,
            child_content_id,
            derivation_type: derivation_type.into(),
            variant: variant.into(),
            derivation_params: BTreeMap::new(),
            processing_metadata: BTreeMap::new(),
            status: ContentStatus::Created,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_derivation_params(mut self, params: BTreeMap<String, serde_json::Value>) -> Self {
        self.derivation_params = params;
        self
    }

    pub fn with_processing_metadata(
        mut self,
        metadata: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        self.processing_metadata = metadata;
        self
    }

    /// Canonical variant read order:
    /// `edge.variant`, else `processing_metadata["variant"]`, else
    /// `derivation_params["variant"]`, else the part of `derivation_type`
    /// after its first underscore, else the bare `derivation_type`.
    pub fn resolved_variant(&self) -> String {
        if !self.variant.is_empty() {
            return self.variant.clone();
        }
        if let Some(v) = self.processing_metadata.get("variant").and_then(|v| v.as_str()) {
            return v.to_string();
        }
        if let Some(v) = self.derivation_params.get("variant").and_then(|v| v.as_str()) {
            return v.to_string();
        }
        if self.derivation_type.contains('_') {
            return self.derivation_type.clone();
        }
        self.derivation_type.clone()
    }
}

/// Infer a derivation type from a variant string by taking the prefix up to
/// the first underscore (e.g. `"thumbnail_256"` → `"thumbnail"`).
/// Returns the whole variant unchanged if it has no underscore.
pub fn infer_derivation_type(variant: &str) -> String {
    match variant.split_once('_') {
        Some((prefix, _)) => prefix.to_string(),
        None => variant.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_type_from_variant() {
        assert_eq!(infer_derivation_type("thumbnail_256"), "thumbnail");
        assert_eq!(infer_derivation_type("preview_1080"), "preview");
        assert_eq!(infer_derivation_type("bare"), "bare");
    }

    #[test]
    fn resolves_variant_precedence() {
        let edge = DerivedContent::new(ContentId::new(), ContentId::new(), "thumbnail", "thumbnail_256");
        assert_eq!(edge.resolved_variant(), "thumbnail_256");

        let mut edge2 = DerivedContent::new(ContentId::new(), ContentId::new(), "thumbnail", "");
        edge2
            .processing_metadata
            .insert("variant".into(), serde_json::json!("thumbnail_128"));
        assert_eq!(edge2.resolved_variant(), "thumbnail_128");

        let edge3 = DerivedContent::new(ContentId::new(), ContentId::new(), "thumbnail", "");
        assert_eq!(edge3.resolved_variant(), "thumbnail");
    }
}
