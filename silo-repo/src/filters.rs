use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use silo_model::{ContentId, ContentStatus};

/// Sort order for `list_derived_content`/`list_content_with_filters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    CreatedAtAsc,
    CreatedAtDesc,
}

impl Default for SortBy {
    fn default() -> Self {
        Self::CreatedAtDesc
    }
}

/// Rich filter set for `Repository::list_derived_content`:
/// single/multiple parent ids, single/multiple derivation types, variants,
/// `(type, variant)` pairs, content status, created-before/after,
/// sort, limit/offset.
#[derive(Debug, Clone, Default)]
pub struct DerivedContentFilter {
    pub parent_ids: Vec<ContentId>,
    pub derivation_types: Vec<String>,
    pub variants: Vec<String>,
    pub type_variant_pairs: Vec<(String, String)>,
    pub content_status: Option<ContentStatus>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub sort_by: Option<SortBy>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl DerivedContentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent_id(mut self, id: ContentId) -> Self {
        self.parent_ids.push(id);
        self
    }

    pub fn with_parent_ids(mut self, ids: impl IntoIterator<Item = ContentId>) -> Self {
        self.parent_ids.extend(ids);
        self
    }

    pub fn with_derivation_type(mut self, t: impl Into<String>) -> Self {
        self.derivation_types.push(t.into());
        self
    }

    pub fn with_derivation_types(mut self, types: impl IntoIterator<Item = String>) -> Self {
        self.derivation_types.extend(types);
        self
    }

    pub fn with_variant(mut self, v: impl Into<String>) -> Self {
        self.variants.push(v.into());
        self
    }

    pub fn with_variants(mut self, variants: impl IntoIterator<Item = String>) -> Self {
        self.variants.extend(variants);
        self
    }

    pub fn with_type_variant_pair(mut self, t: impl Into<String>, v: impl Into<String>) -> Self {
        self.type_variant_pairs.push((t.into(), v.into()));
        self
    }

    pub fn with_content_status(mut self, status: ContentStatus) -> Self {
        self.content_status = Some(status);
        self
    }

    pub fn with_created_after(mut self, at: DateTime<Utc>) -> Self {
        self.created_after = Some(at);
        self
    }

    pub fn with_created_before(mut self, at: DateTime<Utc>) -> Self {
        self.created_before = Some(at);
        self
    }

    pub fn with_sort_by(mut self, sort: SortBy) -> Self {
        self.sort_by = Some(sort);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Admin query surface filters for `list_content_with_filters`/
/// `count_content_with_filters`/`get_content_statistics` — the only place
/// content listing exposes pagination.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    pub owner_ids: Vec<String>,
    pub tenant_ids: Vec<String>,
    pub statuses: Vec<ContentStatus>,
    pub derivation_types: Vec<String>,
    pub document_types: Vec<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub include_deleted: bool,
    pub sort_by: Option<SortBy>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ContentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner_id(mut self, id: impl Into<String>) -> Self {
        self.owner_ids.push(id.into());
        self
    }

    pub fn with_tenant_id(mut self, id: impl Into<String>) -> Self {
        self.tenant_ids.push(id.into());
        self
    }

    pub fn with_status(mut self, status: ContentStatus) -> Self {
        self.statuses.push(status);
        self
    }

    pub fn with_derivation_type(mut self, t: impl Into<String>) -> Self {
        self.derivation_types.push(t.into());
        self
    }

    pub fn with_document_type(mut self, t: impl Into<String>) -> Self {
        self.document_types.push(t.into());
        self
    }

    pub fn with_created_after(mut self, at: DateTime<Utc>) -> Self {
        self.created_after = Some(at);
        self
    }

    pub fn with_created_before(mut self, at: DateTime<Utc>) -> Self {
        self.created_before = Some(at);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Optional per-dimension breakdowns for `get_content_statistics`.
#[derive(Debug, Clone, Default)]
pub struct StatisticsOptions {
    pub by_status: bool,
    pub by_tenant: bool,
    pub by_derivation_type: bool,
    pub by_document_type: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ContentStatistics {
    pub total_count: u64,
    pub by_status: Option<BTreeMap<String, u64>>,
    pub by_tenant: Option<BTreeMap<String, u64>>,
    pub by_derivation_type: Option<BTreeMap<String, u64>>,
    pub by_document_type: Option<BTreeMap<String, u64>>,
    pub min_created_at: Option<DateTime<Utc>>,
    pub max_created_at: Option<DateTime<Utc>>,
}
