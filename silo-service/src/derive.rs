use chrono::{DateTime, Utc};
use serde::Serialize;
use silo_core::{ContentError, ContentEvent, ContentEventKind, ContentResult};
use silo_model::{Content, ContentId, ContentStatus, DerivedContent};
use silo_repo::{DerivedContentFilter, SortBy};

use crate::requests::CreateDerivedContentRequest;
use crate::service::is_post_upload;
use crate::Service;

/// Variadic-option knob for `ListDerivedContent`, mirroring
/// `DerivedContentFilter`'s full shape one level up so callers don't have to
/// depend on `silo-repo` directly. `with_parent_id`/`with_parent_ids` both
/// feed the same accumulating list — a caller may mix single and multi
/// calls.
#[derive(Debug, Clone, Default)]
pub struct ListDerivedContentOptions {
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
    pub with_urls: bool,
}

impl ListDerivedContentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent_id(mut self, parent_id: ContentId) -> Self {
        self.parent_ids.push(parent_id);
        self
    }

    pub fn with_parent_ids(mut self, parent_ids: impl IntoIterator<Item = ContentId>) -> Self {
        self.parent_ids.extend(parent_ids);
        self
    }

    pub fn with_derivation_types(mut self, types: Vec<String>) -> Self {
        self.derivation_types = types;
        self
    }

    pub fn with_variants(mut self, variants: Vec<String>) -> Self {
        self.variants = variants;
        self
    }

    pub fn with_type_variant_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.type_variant_pairs.extend(pairs);
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

    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn with_page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    pub fn with_urls(mut self, with_urls: bool) -> Self {
        self.with_urls = with_urls;
        self
    }
}

/// One row of `ListDerivedContent`'s result: the edge itself plus, when
/// `options.with_urls` is set, the child's download/preview URLs. Empty
/// string means no URL, the same convention `ContentDetails` uses.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedContentEntry {
    #[serde(flatten)]
    pub edge: DerivedContent,
    pub download_url: String,
    pub preview_url: String,
}

impl Service {
    /// `CreateDerivedContent(req)`: creates the child Content +
    /// edge without bytes, for async pipelines that attach the Object later
    /// via `UploadObjectForContent`. Rejects if the parent isn't in a
    /// post-upload status — a derived child can't attach to a parent whose
    /// own bytes haven't landed yet.
    pub async fn create_derived_content(
        &self,
        req: CreateDerivedContentRequest,
    ) -> ContentResult<(Content, DerivedContent)> {
        let parent_id = req
            .parent_id
            .ok_or_else(|| ContentError::invalid_input("parent_id is required"))?;

        let parent = self.repository.get_content(&parent_id).await.map_err(ContentError::from)?;
        if !is_post_upload(parent.status) {
            return Err(ContentError::invalid_content_status(format!(
                "parent {parent_id} is '{}', not a post-upload status",
                parent.status
            )));
        }

        let derivation_type = if req.derivation_type.is_empty() {
            silo_model::infer_derivation_type(&req.variant)
        } else {
            req.derivation_type.clone()
        };

        let child = Content::new(
            req.tenant_id.clone(),
            req.owner_id,
            req.owner_type,
            req.name,
            req.document_type,
        )
        .with_derivation_type(derivation_type.clone());
        let child = self.repository.create_content(child).await.map_err(ContentError::from)?;

        let edge = DerivedContent::new(parent_id.clone(), child.id.clone(), derivation_type, req.variant)
            .with_derivation_params(req.derivation_params)
            .with_processing_metadata(req.processing_metadata);
        let edge = self
            .repository
            .create_derived_content_relationship(edge)
            .await
            .map_err(ContentError::from)?;

        self.emit(
            ContentEvent::new(ContentEventKind::DerivedContentCreated, child.id.to_string(), req.tenant_id)
                .with_detail(serde_json::json!({ "parent_content_id": parent_id.to_string() })),
        )
        .await;

        Ok((child, edge))
    }

    /// `ListDerivedContent(opts…)`: accumulates every `With*` option into a
    /// single `DerivedContentFilter` and issues one repository call.
    pub async fn list_derived_content(&self, opts: ListDerivedContentOptions) -> ContentResult<Vec<DerivedContentEntry>> {
        let with_urls = opts.with_urls;
        let mut filter = DerivedContentFilter::default();
        if !opts.parent_ids.is_empty() {
            filter = filter.with_parent_ids(opts.parent_ids);
        }
        if !opts.derivation_types.is_empty() {
            filter = filter.with_derivation_types(opts.derivation_types);
        }
        if !opts.variants.is_empty() {
            filter = filter.with_variants(opts.variants);
        }
        for (derivation_type, variant) in opts.type_variant_pairs {
            filter = filter.with_type_variant_pair(derivation_type, variant);
        }
        if let Some(status) = opts.content_status {
            filter = filter.with_content_status(status);
        }
        if let Some(after) = opts.created_after {
            filter = filter.with_created_after(after);
        }
        if let Some(before) = opts.created_before {
            filter = filter.with_created_before(before);
        }
        if let Some(sort_by) = opts.sort_by {
            filter = filter.with_sort_by(sort_by);
        }
        if let Some(limit) = opts.limit {
            filter = filter.with_limit(limit);
        }
        if let Some(offset) = opts.offset {
            filter = filter.with_offset(offset);
        }

        let edges = self.repository.list_derived_content(filter).await.map_err(ContentError::from)?;

        let mut entries = Vec::with_capacity(edges.len());
        for edge in edges {
            let (download_url, preview_url) = if with_urls {
                self.derived_entry_urls(&edge).await?
            } else {
                (String::new(), String::new())
            };
            entries.push(DerivedContentEntry {
                edge,
                download_url,
                preview_url,
            });
        }
        Ok(entries)
    }

    async fn derived_entry_urls(&self, edge: &DerivedContent) -> ContentResult<(String, String)> {
        let child_object = self
            .repository
            .get_objects_by_content_id(&edge.child_content_id)
            .await
            .map_err(ContentError::from)?
            .into_iter()
            .next();
        let Some(child_object) = child_object else {
            return Ok((String::new(), String::new()));
        };
        let child_content = self.repository.get_content(&edge.child_content_id).await.map_err(ContentError::from)?;
        let backend = self.resolve_backend(&child_object.storage_backend_name)?;
        let download_url = self
            .url_strategy
            .download_url(&child_content, &child_object, backend.as_ref())
            .await?;
        let preview_url = self
            .url_strategy
            .preview_url(&child_content, &child_object, backend.as_ref())
            .await?;
        Ok((download_url, preview_url))
    }

    /// `GetDerivedRelationship(contentId)`: the edge where
    /// `content_id` is the child, or `ContentError::ContentNotFound` if the
    /// content is an original (has no parent edge).
    pub async fn get_derived_relationship(&self, content_id: &ContentId) -> ContentResult<DerivedContent> {
        self.repository
            .get_derived_relationship_by_content_id(content_id)
            .await
            .map_err(ContentError::from)?
            .ok_or_else(|| ContentError::content_not_found(format!("{content_id} has no derivation edge")))
    }
}
