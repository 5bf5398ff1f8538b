//! In-memory reference implementation of [`Repository`]: a
//! mutex-guarded set of hash maps plus index maps (`contentID → [objectIDs]`,
//! `"backend:key" → objectID`). Every mutation clones the passed-in struct;
//! every read clones out. A single `parking_lot::Mutex`-guarded inner
//! struct, cloned in and out at the boundary so the repository — not the
//! caller — owns the canonical copy of every stored value.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use silo_model::{
    Content, ContentId, ContentMetadata, ContentStatus, DerivedContent, Object, ObjectId,
    ObjectMetadata,
};

use crate::error::{RepoError, RepoResult};
use crate::filters::{ContentFilter, ContentStatistics, DerivedContentFilter, SortBy, StatisticsOptions};
use crate::repository::Repository;

#[derive(Default)]
struct Inner {
    contents: HashMap<ContentId, Content>,
    content_metadata: HashMap<ContentId, ContentMetadata>,
    objects: HashMap<ObjectId, Object>,
    object_metadata: HashMap<ObjectId, ObjectMetadata>,
    objects_by_content: HashMap<ContentId, Vec<ObjectId>>,
    /// `(storage_backend_name, object_key) → object id`, a uniqueness
    /// index. Entries are removed on soft-delete so a freed key can be
    /// reused.
    object_key_index: HashMap<(String, String), ObjectId>,
    /// Keyed by the *child* content id, since every lookup
    /// (`GetDerivedRelationshipByContentID`) starts from the child.
    derived: HashMap<ContentId, DerivedContent>,
}

/// The in-memory `Repository`. Trivial but must be
/// concurrency-safe: every operation takes the single mutex for its whole
/// duration, same tradeoff `silo_store::MemoryBlobStore` makes.
#[derive(Default)]
pub struct InMemoryRepository {
    inner: Mutex<Inner>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_content_filter(content: &Content, filter: &ContentFilter) -> bool {
    if !filter.include_deleted && content.is_deleted() {
        return false;
    }
    if !filter.owner_ids.is_empty() && !filter.owner_ids.iter().any(|o| o == &content.owner_id) {
        return false;
    }
    if !filter.tenant_ids.is_empty() && !filter.tenant_ids.iter().any(|t| t == &content.tenant_id) {
        return false;
    }
    if !filter.statuses.is_empty() && !filter.statuses.contains(&content.status) {
        return false;
    }
    if !filter.derivation_types.is_empty()
        && !filter.derivation_types.iter().any(|t| t == &content.derivation_type)
    {
        return false;
    }
    if !filter.document_types.is_empty()
        && !filter.document_types.iter().any(|t| t == &content.document_type)
    {
        return false;
    }
    if let Some(after) = filter.created_after {
        if content.created_at < after {
            return false;
        }
    }
    if let Some(before) = filter.created_before {
        if content.created_at > before {
            return false;
        }
    }
    true
}

fn sort_contents(contents: &mut [Content], sort_by: Option<SortBy>) {
    match sort_by.unwrap_or_default() {
        SortBy::CreatedAtDesc => contents.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortBy::CreatedAtAsc => contents.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
}

fn paginate<T>(items: Vec<T>, limit: Option<usize>, offset: Option<usize>) -> Vec<T> {
    let items: Vec<T> = items.into_iter().skip(offset.unwrap_or(0)).collect();
    match limit {
        Some(limit) => items.into_iter().take(limit).collect(),
        None => items,
    }
}

fn matches_derived_filter(
    edge: &DerivedContent,
    child_status: Option<ContentStatus>,
    filter: &DerivedContentFilter,
) -> bool {
    if !filter.parent_ids.is_empty() && !filter.parent_ids.contains(&edge.parent_content_id) {
        return false;
    }
    if !filter.derivation_types.is_empty()
        && !filter.derivation_types.iter().any(|t| t == &edge.derivation_type)
    {
        return false;
    }
    if !filter.variants.is_empty() {
        let resolved = edge.resolved_variant();
        if !filter.variants.iter().any(|v| v == &resolved) {
            return false;
        }
    }
    if !filter.type_variant_pairs.is_empty() {
        let resolved = edge.resolved_variant();
        let hit = filter
            .type_variant_pairs
            .iter()
            .any(|(t, v)| t == &edge.derivation_type && v == &resolved);
        if !hit {
            return false;
        }
    }
    if let Some(want_status) = filter.content_status {
        if child_status != Some(want_status) {
            return false;
        }
    }
    if let Some(after) = filter.created_after {
        if edge.created_at < after {
            return false;
        }
    }
    if let Some(before) = filter.created_before {
        if edge.created_at > before {
            return false;
        }
    }
    true
}

fn sort_derived(edges: &mut [DerivedContent], sort_by: Option<SortBy>) {
    match sort_by.unwrap_or_default() {
        SortBy::CreatedAtDesc => edges.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortBy::CreatedAtAsc => edges.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create_content(&self, content: Content) -> RepoResult<Content> {
        let mut inner = self.inner.lock();
        inner.contents.insert(content.id.clone(), content.clone());
        Ok(content)
    }

    async fn get_content(&self, id: &ContentId) -> RepoResult<Content> {
        let inner = self.inner.lock();
        inner
            .contents
            .get(id)
            .filter(|c| !c.is_deleted())
            .cloned()
            .ok_or_else(|| RepoError::content_not_found(id.to_string()))
    }

    async fn update_content(&self, content: Content) -> RepoResult<Content> {
        let mut inner = self.inner.lock();
        if !inner.contents.contains_key(&content.id) {
            return Err(RepoError::content_not_found(content.id.to_string()));
        }
        inner.contents.insert(content.id.clone(), content.clone());
        Ok(content)
    }

    async fn delete_content(&self, id: &ContentId) -> RepoResult<()> {
        let mut inner = self.inner.lock();
        let content = inner
            .contents
            .get_mut(id)
            .ok_or_else(|| RepoError::content_not_found(id.to_string()))?;
        content.mark_deleted(Utc::now());
        Ok(())
    }

    async fn list_content(&self, owner_id: &str, tenant_id: &str) -> RepoResult<Vec<Content>> {
        let inner = self.inner.lock();
        let mut out: Vec<Content> = inner
            .contents
            .values()
            .filter(|c| !c.is_deleted() && c.owner_id == owner_id && c.tenant_id == tenant_id)
            .cloned()
            .collect();
        sort_contents(&mut out, Some(SortBy::CreatedAtDesc));
        Ok(out)
    }

    async fn get_content_by_status(&self, status: ContentStatus) -> RepoResult<Vec<Content>> {
        let inner = self.inner.lock();
        Ok(inner
            .contents
            .values()
            .filter(|c| !c.is_deleted() && c.status == status)
            .cloned()
            .collect())
    }

    async fn set_content_metadata(&self, metadata: ContentMetadata) -> RepoResult<ContentMetadata> {
        let content_id = metadata
            .content_id
            .clone()
            .ok_or_else(|| RepoError::invalid_input("content metadata requires a content_id"))?;
        let mut inner = self.inner.lock();
        inner.content_metadata.insert(content_id, metadata.clone());
        Ok(metadata)
    }

    async fn get_content_metadata(&self, content_id: &ContentId) -> RepoResult<ContentMetadata> {
        let inner = self.inner.lock();
        inner
            .content_metadata
            .get(content_id)
            .cloned()
            .ok_or_else(|| RepoError::content_not_found(content_id.to_string()))
    }

    async fn create_object(&self, object: Object) -> RepoResult<Object> {
        let mut inner = self.inner.lock();
        let index_key = (object.storage_backend_name.clone(), object.object_key.clone());
        if inner.object_key_index.contains_key(&index_key) {
            return Err(RepoError::duplicate_object_key(
                object.storage_backend_name.clone(),
                object.object_key.clone(),
            ));
        }
        inner.object_key_index.insert(index_key, object.id.clone());
        inner
            .objects_by_content
            .entry(object.content_id.clone())
            .or_default()
            .push(object.id.clone());
        inner.objects.insert(object.id.clone(), object.clone());
        Ok(object)
    }

    async fn get_object(&self, id: &ObjectId) -> RepoResult<Object> {
        let inner = self.inner.lock();
        inner
            .objects
            .get(id)
            .filter(|o| !o.is_deleted())
            .cloned()
            .ok_or_else(|| RepoError::object_not_found(id.to_string()))
    }

    async fn update_object(&self, object: Object) -> RepoResult<Object> {
        let mut inner = self.inner.lock();
        let previous = inner
            .objects
            .get(&object.id)
            .ok_or_else(|| RepoError::object_not_found(object.id.to_string()))?
            .clone();

        let old_key = (previous.storage_backend_name.clone(), previous.object_key.clone());
        let new_key = (object.storage_backend_name.clone(), object.object_key.clone());
        if old_key != new_key {
            if inner.object_key_index.contains_key(&new_key) {
                return Err(RepoError::duplicate_object_key(
                    object.storage_backend_name.clone(),
                    object.object_key.clone(),
                ));
            }
            inner.object_key_index.remove(&old_key);
            inner.object_key_index.insert(new_key, object.id.clone());
        }

        inner.objects.insert(object.id.clone(), object.clone());
        Ok(object)
    }

    async fn delete_object(&self, id: &ObjectId) -> RepoResult<()> {
        let mut inner = self.inner.lock();
        let object = inner
            .objects
            .get_mut(id)
            .ok_or_else(|| RepoError::object_not_found(id.to_string()))?;
        object.mark_deleted(Utc::now());
        let index_key = (object.storage_backend_name.clone(), object.object_key.clone());
        inner.object_key_index.remove(&index_key);
        Ok(())
    }

    async fn get_objects_by_content_id(&self, content_id: &ContentId) -> RepoResult<Vec<Object>> {
        let inner = self.inner.lock();
        let mut out: Vec<Object> = inner
            .objects_by_content
            .get(content_id)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.objects.get(id))
            .filter(|o| !o.is_deleted())
            .cloned()
            .collect();
        out.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(out)
    }

    async fn get_object_by_key_and_backend(
        &self,
        storage_backend_name: &str,
        object_key: &str,
    ) -> RepoResult<Option<Object>> {
        let inner = self.inner.lock();
        let key = (storage_backend_name.to_string(), object_key.to_string());
        Ok(inner
            .object_key_index
            .get(&key)
            .and_then(|id| inner.objects.get(id))
            .filter(|o| !o.is_deleted())
            .cloned())
    }

    async fn set_object_metadata(&self, metadata: ObjectMetadata) -> RepoResult<ObjectMetadata> {
        let object_id = metadata
            .object_id
            .clone()
            .ok_or_else(|| RepoError::invalid_input("object metadata requires an object_id"))?;
        let mut inner = self.inner.lock();
        inner.object_metadata.insert(object_id, metadata.clone());
        Ok(metadata)
    }

    async fn get_object_metadata(&self, object_id: &ObjectId) -> RepoResult<ObjectMetadata> {
        let inner = self.inner.lock();
        inner
            .object_metadata
            .get(object_id)
            .cloned()
            .ok_or_else(|| RepoError::object_not_found(object_id.to_string()))
    }

    async fn create_derived_content_relationship(
        &self,
        edge: DerivedContent,
    ) -> RepoResult<DerivedContent> {
        let mut inner = self.inner.lock();
        inner.derived.insert(edge.child_content_id.clone(), edge.clone());
        Ok(edge)
    }

    async fn list_derived_content(&self, filter: DerivedContentFilter) -> RepoResult<Vec<DerivedContent>> {
        let inner = self.inner.lock();
        let mut out: Vec<DerivedContent> = inner
            .derived
            .values()
            .filter(|edge| {
                let child_status = inner.contents.get(&edge.child_content_id).map(|c| c.status);
                matches_derived_filter(edge, child_status, &filter)
            })
            .cloned()
            .collect();
        sort_derived(&mut out, filter.sort_by);
        Ok(paginate(out, filter.limit, filter.offset))
    }

    async fn get_derived_relationship_by_content_id(
        &self,
        content_id: &ContentId,
    ) -> RepoResult<Option<DerivedContent>> {
        let inner = self.inner.lock();
        Ok(inner.derived.get(content_id).cloned())
    }

    async fn list_content_with_filters(&self, filter: ContentFilter) -> RepoResult<Vec<Content>> {
        let inner = self.inner.lock();
        let mut out: Vec<Content> = inner
            .contents
            .values()
            .filter(|c| matches_content_filter(c, &filter))
            .cloned()
            .collect();
        sort_contents(&mut out, filter.sort_by);
        Ok(paginate(out, filter.limit, filter.offset))
    }

    async fn count_content_with_filters(&self, filter: ContentFilter) -> RepoResult<u64> {
        let inner = self.inner.lock();
        Ok(inner
            .contents
            .values()
            .filter(|c| matches_content_filter(c, &filter))
            .count() as u64)
    }

    async fn get_content_statistics(
        &self,
        filter: ContentFilter,
        options: StatisticsOptions,
    ) -> RepoResult<ContentStatistics> {
        let inner = self.inner.lock();
        let matching: Vec<&Content> = inner
            .contents
            .values()
            .filter(|c| matches_content_filter(c, &filter))
            .collect();

        let mut stats = ContentStatistics {
            total_count: matching.len() as u64,
            ..Default::default()
        };

        if options.by_status {
            let mut by_status: BTreeMap<String, u64> = BTreeMap::new();
            for c in &matching {
                *by_status.entry(c.status.as_str().to_string()).or_default() += 1;
            }
            stats.by_status = Some(by_status);
        }
        if options.by_tenant {
            let mut by_tenant: BTreeMap<String, u64> = BTreeMap::new();
            for c in &matching {
                *by_tenant.entry(c.tenant_id.clone()).or_default() += 1;
            }
            stats.by_tenant = Some(by_tenant);
        }
        if options.by_derivation_type {
            let mut by_type: BTreeMap<String, u64> = BTreeMap::new();
            for c in &matching {
                let key = if c.derivation_type.is_empty() {
                    "original".to_string()
                } else {
                    c.derivation_type.clone()
                };
                *by_type.entry(key).or_default() += 1;
            }
            stats.by_derivation_type = Some(by_type);
        }
        if options.by_document_type {
            let mut by_doc: BTreeMap<String, u64> = BTreeMap::new();
            for c in &matching {
                *by_doc.entry(c.document_type.clone()).or_default() += 1;
            }
            stats.by_document_type = Some(by_doc);
        }

        let mut min_created: Option<DateTime<Utc>> = None;
        let mut max_created: Option<DateTime<Utc>> = None;
        for c in &matching {
            min_created = Some(min_created.map_or(c.created_at, |m| m.min(c.created_at)));
            max_created = Some(max_created.map_or(c.created_at, |m| m.max(c.created_at)));
        }
        stats.min_created_at = min_created;
        stats.max_created_at = max_created;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silo_model::Object;

    fn content(owner: &str, tenant: &str) -> Content {
        Content::new(tenant, owner, "user", "a.txt", "text/plain")
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repo = InMemoryRepository::new();
        let c = content("o1", "t1");
        repo.create_content(c.clone()).await.unwrap();
        let got = repo.get_content(&c.id).await.unwrap();
        assert_eq!(got.id, c.id);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let repo = InMemoryRepository::new();
        let c = content("o1", "t1");
        repo.create_content(c.clone()).await.unwrap();
        repo.delete_content(&c.id).await.unwrap();
        assert!(matches!(
            repo.get_content(&c.id).await,
            Err(RepoError::ContentNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn list_content_excludes_soft_deleted_and_scopes_by_owner_tenant() {
        let repo = InMemoryRepository::new();
        let a = content("o1", "t1");
        let b = content("o1", "t1");
        let other_owner = content("o2", "t1");
        repo.create_content(a.clone()).await.unwrap();
        repo.create_content(b.clone()).await.unwrap();
        repo.create_content(other_owner).await.unwrap();
        repo.delete_content(&a.id).await.unwrap();

        let listed = repo.list_content("o1", "t1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, b.id);
    }

    #[tokio::test]
    async fn duplicate_backend_and_key_is_rejected() {
        let repo = InMemoryRepository::new();
        let c = content("o1", "t1");
        repo.create_content(c.clone()).await.unwrap();
        let obj1 = Object::new(c.id.clone(), "mem", 1, "shared-key", "text/plain");
        repo.create_object(obj1).await.unwrap();

        let obj2 = Object::new(c.id.clone(), "mem", 2, "shared-key", "text/plain");
        let err = repo.create_object(obj2).await.unwrap_err();
        assert!(matches!(err, RepoError::DuplicateObjectKey { .. }));
    }

    #[tokio::test]
    async fn objects_by_content_sorted_by_version_descending() {
        let repo = InMemoryRepository::new();
        let c = content("o1", "t1");
        repo.create_content(c.clone()).await.unwrap();
        for v in [1u32, 3, 2] {
            let obj = Object::new(c.id.clone(), "mem", v, format!("k{v}"), "text/plain");
            repo.create_object(obj).await.unwrap();
        }
        let objects = repo.get_objects_by_content_id(&c.id).await.unwrap();
        let versions: Vec<u32> = objects.iter().map(|o| o.version).collect();
        assert_eq!(versions, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn deleting_object_frees_its_backend_key() {
        let repo = InMemoryRepository::new();
        let c = content("o1", "t1");
        repo.create_content(c.clone()).await.unwrap();
        let obj = Object::new(c.id.clone(), "mem", 1, "k", "text/plain");
        let obj_id = obj.id.clone();
        repo.create_object(obj).await.unwrap();
        repo.delete_object(&obj_id).await.unwrap();

        assert!(repo
            .get_object_by_key_and_backend("mem", "k")
            .await
            .unwrap()
            .is_none());

        let reused = Object::new(c.id, "mem", 2, "k", "text/plain");
        repo.create_object(reused).await.unwrap();
    }

    #[tokio::test]
    async fn list_derived_content_filters_by_type_and_variants() {
        let repo = InMemoryRepository::new();
        let parent = content("o1", "t1");
        repo.create_content(parent.clone()).await.unwrap();

        let variants = [
            ("thumbnail", "thumbnail_128"),
            ("thumbnail", "thumbnail_256"),
            ("preview", "preview_720"),
            ("preview", "preview_1080"),
        ];
        for (derivation_type, variant) in variants {
            let mut child = content("o1", "t1").with_derivation_type(derivation_type);
            child.status = ContentStatus::Processed;
            repo.create_content(child.clone()).await.unwrap();
            let edge = DerivedContent::new(parent.id.clone(), child.id.clone(), derivation_type, variant);
            repo.create_derived_content_relationship(edge).await.unwrap();
        }

        let thumbnails = repo
            .list_derived_content(
                DerivedContentFilter::new()
                    .with_parent_id(parent.id.clone())
                    .with_derivation_type("thumbnail"),
            )
            .await
            .unwrap();
        assert_eq!(thumbnails.len(), 2);
        assert!(thumbnails
            .iter()
            .all(|e| e.resolved_variant().starts_with("thumbnail_")));

        let picked = repo
            .list_derived_content(
                DerivedContentFilter::new()
                    .with_parent_id(parent.id)
                    .with_variants(["thumbnail_256".to_string(), "preview_1080".to_string()]),
            )
            .await
            .unwrap();
        assert_eq!(picked.len(), 2);
    }

    #[tokio::test]
    async fn content_statistics_breaks_down_by_status() {
        let repo = InMemoryRepository::new();
        let mut uploaded = content("o1", "t1");
        uploaded.status = ContentStatus::Uploaded;
        let mut created = content("o1", "t1");
        created.status = ContentStatus::Created;
        repo.create_content(uploaded).await.unwrap();
        repo.create_content(created).await.unwrap();

        let stats = repo
            .get_content_statistics(
                ContentFilter::new().with_tenant_id("t1"),
                StatisticsOptions {
                    by_status: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(stats.total_count, 2);
        let by_status = stats.by_status.unwrap();
        assert_eq!(by_status.get("uploaded"), Some(&1));
        assert_eq!(by_status.get("created"), Some(&1));
    }
}
