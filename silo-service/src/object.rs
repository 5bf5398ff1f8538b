use silo_core::{ContentError, ContentEvent, ContentEventKind, ContentResult};
use silo_model::{ContentId, Object, ObjectId};

use crate::requests::CreateObjectRequest;
use crate::Service;

impl Service {
    /// `CreateObject(req)`: mints the object key and a presigned upload
    /// URL without touching any bytes. Pairs with a later
    /// `PUT {upload_url}` that lands on the backend directly, bypassing
    /// `Service` entirely.
    pub async fn create_object_for_upload(
        &self,
        req: CreateObjectRequest,
    ) -> ContentResult<(Object, String)> {
        let content = self.repository.get_content(&req.content_id).await.map_err(ContentError::from)?;
        let backend = self.resolve_backend(&req.backend)?;

        let object_id = ObjectId::new();
        let object_key = self.object_key_for(&content, &object_id, req.file_name.as_deref()).await?;

        let version = self
            .repository
            .get_objects_by_content_id(&content.id)
            .await
            .map_err(ContentError::from)?
            .into_iter()
            .map(|o| o.version)
            .max()
            .map(|v| v + 1)
            .unwrap_or(1);

        let mut object = Object {
            id: object_id,
            ..Object::new(content.id.clone(), backend.backend_name().to_string(), version, object_key.clone(), content.document_type.clone())
        };
        object.file_name = req.file_name.clone();
        let object = self.repository.create_object(object).await.map_err(ContentError::from)?;

        self.emit(
            ContentEvent::new(ContentEventKind::ObjectCreated, content.id.to_string(), content.tenant_id.clone())
                .with_object_id(object.id.to_string()),
        )
        .await;

        let upload_url = backend.get_upload_url(&object_key).await.map_err(ContentError::from)?;
        Ok((object, upload_url))
    }

    /// `ListObjects(contentId, latestOnly)`: `latestOnly=true`
    /// returns just the highest-version, non-deleted Object.
    pub async fn list_objects(&self, content_id: &ContentId, latest_only: bool) -> ContentResult<Vec<Object>> {
        let objects = self
            .repository
            .get_objects_by_content_id(content_id)
            .await
            .map_err(ContentError::from)?;
        if latest_only {
            Ok(objects.into_iter().take(1).collect())
        } else {
            Ok(objects)
        }
    }
}
