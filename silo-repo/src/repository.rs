use async_trait::async_trait;

use silo_model::{Content, ContentId, ContentMetadata, ContentStatus, DerivedContent, Object, ObjectId, ObjectMetadata};

use crate::error::RepoResult;
use crate::filters::{ContentFilter, ContentStatistics, DerivedContentFilter, StatisticsOptions};

/// The durable store behind `Service`. Every operation is
/// context-aware in the sense that the caller supplies a cancellation
/// point via the async runtime; this trait itself carries no tenant/ACL
/// logic — that belongs to the layer calling into it.
#[async_trait]
pub trait Repository: Send + Sync {
    // -- Content --------------------------------------------------------
    async fn create_content(&self, content: Content) -> RepoResult<Content>;
    async fn get_content(&self, id: &ContentId) -> RepoResult<Content>;
    async fn update_content(&self, content: Content) -> RepoResult<Content>;
    /// Soft-delete: stamps `deleted_at`, leaves `status` untouched.
    async fn delete_content(&self, id: &ContentId) -> RepoResult<()>;
    /// Sorted by `created_at` descending; soft-deleted excluded.
    async fn list_content(&self, owner_id: &str, tenant_id: &str) -> RepoResult<Vec<Content>>;
    /// Global scan by status, soft-deleted excluded.
    async fn get_content_by_status(&self, status: ContentStatus) -> RepoResult<Vec<Content>>;

    // -- ContentMetadata --------------------------------------------------
    async fn set_content_metadata(&self, metadata: ContentMetadata) -> RepoResult<ContentMetadata>;
    async fn get_content_metadata(&self, content_id: &ContentId) -> RepoResult<ContentMetadata>;

    // -- Object -----------------------------------------------------------
    async fn create_object(&self, object: Object) -> RepoResult<Object>;
    async fn get_object(&self, id: &ObjectId) -> RepoResult<Object>;
    async fn update_object(&self, object: Object) -> RepoResult<Object>;
    async fn delete_object(&self, id: &ObjectId) -> RepoResult<()>;
    /// Sorted by `version` descending.
    async fn get_objects_by_content_id(&self, content_id: &ContentId) -> RepoResult<Vec<Object>>;
    async fn get_object_by_key_and_backend(
        &self,
        storage_backend_name: &str,
        object_key: &str,
    ) -> RepoResult<Option<Object>>;

    // -- ObjectMetadata -----------------------------------------------------
    async fn set_object_metadata(&self, metadata: ObjectMetadata) -> RepoResult<ObjectMetadata>;
    async fn get_object_metadata(&self, object_id: &ObjectId) -> RepoResult<ObjectMetadata>;

    // -- DerivedContent -----------------------------------------------------
    async fn create_derived_content_relationship(
        &self,
        edge: DerivedContent,
    ) -> RepoResult<DerivedContent>;
    async fn list_derived_content(&self, filter: DerivedContentFilter) -> RepoResult<Vec<DerivedContent>>;
    /// The edge where `content_id` is the *child*.
    async fn get_derived_relationship_by_content_id(
        &self,
        content_id: &ContentId,
    ) -> RepoResult<Option<DerivedContent>>;

    // -- Admin query surface --------------------------------------------------
    async fn list_content_with_filters(&self, filter: ContentFilter) -> RepoResult<Vec<Content>>;
    async fn count_content_with_filters(&self, filter: ContentFilter) -> RepoResult<u64>;
    async fn get_content_statistics(
        &self,
        filter: ContentFilter,
        options: StatisticsOptions,
    ) -> RepoResult<ContentStatistics>;
}
