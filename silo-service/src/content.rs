use std::str::FromStr;

use chrono::Utc;
use silo_core::{ContentError, ContentEvent, ContentEventKind, ContentResult};
use silo_model::{Content, ContentId, ContentMetadata, ContentStatus};

use crate::requests::CreateContentRequest;
use crate::Service;

impl Service {
    /// `CreateContent(req)`: persist a Content in status
    /// `created`, emit `ContentCreated`.
    #[tracing::instrument(skip(self, req), fields(tenant_id = %req.tenant_id))]
    pub async fn create_content(&self, req: CreateContentRequest) -> ContentResult<Content> {
        let mut content = Content::new(
            req.tenant_id.clone(),
            req.owner_id,
            req.owner_type,
            req.name,
            req.document_type,
        );
        if let Some(description) = req.description {
            content = content.with_description(description);
        }

        let content = self
            .repository
            .create_content(content)
            .await
            .map_err(ContentError::from)?;

        self.emit(
            ContentEvent::new(ContentEventKind::ContentCreated, content.id.to_string(), req.tenant_id),
        )
        .await;

        Ok(content)
    }

    pub async fn get_content(&self, id: &ContentId) -> ContentResult<Content> {
        self.repository.get_content(id).await.map_err(ContentError::from)
    }

    /// `UpdateContent(content)`: the repository is the source
    /// of truth for `created_at`/existence, so this refuses to resurrect a
    /// caller-provided `Content` for an id it doesn't already own.
    pub async fn update_content(&self, content: Content) -> ContentResult<Content> {
        self.touch_content(content).await
    }

    /// `DeleteContent(id)`: soft-deletes the Content and,
    /// best-effort, deletes the backing bytes of every Object it owns.
    /// Blob delete failures are logged and swallowed — they never block the
    /// metadata soft-delete.
    pub async fn delete_content(&self, id: &ContentId) -> ContentResult<()> {
        let content = self.repository.get_content(id).await.map_err(ContentError::from)?;

        let objects = self
            .repository
            .get_objects_by_content_id(id)
            .await
            .map_err(ContentError::from)?;

        for object in objects {
            match self.resolve_backend(&object.storage_backend_name) {
                Ok(backend) => {
                    if let Err(err) = backend.delete(&object.object_key).await {
                        tracing::warn!(
                            object_id = %object.id,
                            backend = %object.storage_backend_name,
                            error = %err,
                            "best-effort blob delete failed during content soft-delete"
                        );
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        object_id = %object.id,
                        backend = %object.storage_backend_name,
                        error = %err,
                        "skipping blob delete: backend no longer registered"
                    );
                }
            }
        }

        self.repository.delete_content(id).await.map_err(ContentError::from)?;
        self.emit(ContentEvent::new(ContentEventKind::ContentDeleted, id.to_string(), content.tenant_id))
            .await;
        Ok(())
    }

    pub async fn list_content(&self, owner_id: &str, tenant_id: &str) -> ContentResult<Vec<Content>> {
        self.repository
            .list_content(owner_id, tenant_id)
            .await
            .map_err(ContentError::from)
    }

    pub async fn set_content_metadata(&self, metadata: ContentMetadata) -> ContentResult<ContentMetadata> {
        self.repository
            .set_content_metadata(metadata)
            .await
            .map_err(ContentError::from)
    }

    pub async fn get_content_metadata(&self, id: &ContentId) -> ContentResult<ContentMetadata> {
        self.repository.get_content_metadata(id).await.map_err(ContentError::from)
    }

    /// `UpdateContentStatus(id, status)`: rejects status
    /// strings outside the closed set and transitions the allowed-transition
    /// graph doesn't permit, both under the single `InvalidContentStatus`
    /// error kind.
    pub async fn update_content_status(&self, id: &ContentId, status: &str) -> ContentResult<Content> {
        let next = ContentStatus::from_str(status)
            .map_err(|_| ContentError::invalid_content_status(status.to_string()))?;

        let mut content = self.repository.get_content(id).await.map_err(ContentError::from)?;
        if !content.status.can_transition_to(next) {
            return Err(ContentError::invalid_content_status(status.to_string()));
        }

        content.status = next;
        content.touch(Utc::now());
        let content = self.repository.update_content(content).await.map_err(ContentError::from)?;

        self.emit(
            ContentEvent::new(ContentEventKind::ContentStatusChanged, content.id.to_string(), content.tenant_id.clone())
                .with_detail(serde_json::json!({ "status": next.as_str() })),
        )
        .await;

        Ok(content)
    }

    pub async fn get_content_by_status(&self, status: ContentStatus) -> ContentResult<Vec<Content>> {
        self.repository
            .get_content_by_status(status)
            .await
            .map_err(ContentError::from)
    }
}
