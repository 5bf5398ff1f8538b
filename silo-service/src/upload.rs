use chrono::Utc;
use silo_core::{ContentError, ContentEvent, ContentEventKind, ContentResult};
use silo_model::{Content, ContentMetadata, DerivedContent, Object, ObjectId, ObjectMetadata, ObjectStatus};
use silo_store::ByteStream;

use crate::requests::{UploadContentRequest, UploadDerivedContentRequest, UploadObjectForContentRequest};
use crate::Service;

impl Service {
    /// `UploadContent(req)`: creates the Content, metadata, and
    /// the first Object in one call, streaming bytes straight to the
    /// resolved backend before any metadata is persisted so a failed upload
    /// never leaves a dangling Content behind in `uploaded` status.
    pub async fn upload_content(&self, req: UploadContentRequest) -> ContentResult<(Content, Object)> {
        let backend = self.resolve_backend(&req.backend)?;

        let mut content = Content::new(
            req.tenant_id.clone(),
            req.owner_id,
            req.owner_type,
            req.name,
            req.document_type,
        );
        if let Some(description) = req.description.clone() {
            content = content.with_description(description);
        }
        let content = self.repository.create_content(content).await.map_err(ContentError::from)?;

        self.emit(ContentEvent::new(ContentEventKind::ContentCreated, content.id.to_string(), req.tenant_id.clone()))
            .await;

        let (content, object) = self
            .upload_bytes_for_content(content, backend.as_ref(), &req.backend, req.file_name.as_deref(), req.mime_type.as_deref(), req.reader)
            .await?;

        let mut metadata = ContentMetadata::new(content.id).with_tags(req.tags);
        if let Some(mime) = req.mime_type {
            metadata = metadata.with_mime_type(mime);
        }
        if let Some(file_name) = req.file_name {
            metadata = metadata.with_file_name(file_name);
        }
        if let Some(title) = req.title {
            metadata = metadata.with_title(title);
        }
        metadata.description = req.description;
        metadata.created_by = req.created_by;
        metadata.custom = req.custom;
        self.repository.set_content_metadata(metadata).await.map_err(ContentError::from)?;

        Ok((content, object))
    }

    /// `UploadObjectForContent(req)`: attaches a new Object to
    /// an existing Content without touching the Content's own status.
    pub async fn upload_object_for_content(
        &self,
        req: UploadObjectForContentRequest,
    ) -> ContentResult<Object> {
        let content = self.repository.get_content(&req.content_id).await.map_err(ContentError::from)?;
        let backend = self.resolve_backend(&req.backend)?;

        let (_, object) = self
            .upload_bytes_for_content(content, backend.as_ref(), &req.backend, req.file_name.as_deref(), req.mime_type.as_deref(), req.reader)
            .await?;

        Ok(object)
    }

    /// Shared core of `UploadContent`/`UploadObjectForContent`/
    /// `UploadDerivedContent`: mint the object key, stream bytes to the
    /// backend, persist the Object + its metadata, bump the Content to
    /// `uploaded`, and emit `ObjectCreated`/`ObjectUploaded`.
    async fn upload_bytes_for_content(
        &self,
        content: Content,
        backend: &dyn silo_store::BlobStore,
        backend_name: &str,
        file_name: Option<&str>,
        mime_type: Option<&str>,
        reader: ByteStream,
    ) -> ContentResult<(Content, Object)> {
        let object_id = ObjectId::new();
        let object_key = self.object_key_for(&content, &object_id, file_name).await?;

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

        let resolved_backend_name = if backend_name.is_empty() {
            backend.backend_name().to_string()
        } else {
            backend_name.to_string()
        };

        let mut object = Object {
            id: object_id,
            ..Object::new(content.id.clone(), resolved_backend_name.clone(), version, object_key.clone(), content.document_type.clone())
        };
        object.file_name = file_name.map(str::to_string);
        let object = self.repository.create_object(object).await.map_err(ContentError::from)?;

        self.emit(
            ContentEvent::new(ContentEventKind::ObjectCreated, content.id.to_string(), content.tenant_id.clone())
                .with_object_id(object.id.to_string()),
        )
        .await;

        let object_meta = backend
            .upload(&object_key, mime_type, reader)
            .await
            .map_err(ContentError::from)?;

        let mut object = object;
        object.status = ObjectStatus::Uploaded;
        object.touch(Utc::now());
        let object = self.repository.update_object(object).await.map_err(ContentError::from)?;

        let metadata = ObjectMetadata::new(object.id, object_meta.size_bytes);
        let metadata = if let Some(mime) = mime_type.map(str::to_string).or(object_meta.content_type) {
            metadata.with_mime_type(mime)
        } else {
            metadata
        };
        let metadata = if let Some(etag) = object_meta.etag {
            metadata.with_etag(etag)
        } else {
            metadata
        };
        self.repository.set_object_metadata(metadata).await.map_err(ContentError::from)?;

        self.emit(
            ContentEvent::new(ContentEventKind::ObjectUploaded, content.id.to_string(), content.tenant_id.clone())
                .with_object_id(object.id.to_string()),
        )
        .await;

        let mut content = content;
        if content.status.can_transition_to(silo_model::ContentStatus::Uploaded) {
            content.status = silo_model::ContentStatus::Uploaded;
        }
        content.touch(Utc::now());
        let content = self.repository.update_content(content).await.map_err(ContentError::from)?;

        Ok((content, object))
    }

    /// `UploadDerivedContent(req)`: creates the child Content +
    /// DerivedContent edge, uploads the bytes, and leaves the child in
    /// `processed` status rather than the `uploaded` status a plain object
    /// upload would produce — a derived child's bytes are already the
    /// finished artifact, not raw input awaiting processing.
    pub async fn upload_derived_content(
        &self,
        req: UploadDerivedContentRequest,
    ) -> ContentResult<(Content, Object, DerivedContent)> {
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

        let edge = DerivedContent::new(req.parent_id.clone(), child.id.clone(), derivation_type, req.variant)
            .with_derivation_params(req.derivation_params)
            .with_processing_metadata(req.processing_metadata);
        let edge = self
            .repository
            .create_derived_content_relationship(edge)
            .await
            .map_err(ContentError::from)?;

        self.emit(
            ContentEvent::new(ContentEventKind::DerivedContentCreated, child.id.to_string(), req.tenant_id.clone())
                .with_detail(serde_json::json!({ "parent_content_id": req.parent_id.to_string() })),
        )
        .await;

        let backend = self.resolve_backend("")?;
        let (child, object) = self
            .upload_bytes_for_content(child, backend.as_ref(), backend.backend_name(), req.file_name.as_deref(), req.mime_type.as_deref(), req.reader)
            .await?;

        // Derived content created via UploadDerivedContent lands in
        // processed, not uploaded. `upload_bytes_for_content` leaves it
        // `uploaded` (the shared path any Object upload takes); override
        // directly rather than through the allowed-transition graph, since
        // created → processed isn't itself a legal `UpdateContentStatus`
        // transition — this is construction, not a caller-driven transition.
        let mut child = child;
        child.status = silo_model::ContentStatus::Processed;
        child.touch(Utc::now());
        let child = self.repository.update_content(child).await.map_err(ContentError::from)?;

        self.emit(
            ContentEvent::new(ContentEventKind::ContentStatusChanged, child.id.to_string(), child.tenant_id.clone())
                .with_detail(serde_json::json!({ "status": "processed" })),
        )
        .await;

        Ok((child, object, edge))
    }

    /// `DownloadContent(id)`: streams the bytes of a Content's
    /// latest (highest-version) non-deleted Object.
    pub async fn download_content(&self, id: &silo_model::ContentId) -> ContentResult<ByteStream> {
        let objects = self.repository.get_objects_by_content_id(id).await.map_err(ContentError::from)?;
        let object = objects
            .into_iter()
            .next()
            .ok_or_else(|| ContentError::object_not_found(format!("content {id} has no objects")))?;
        self.download_object(&object.id).await
    }

    /// `DownloadObject(id)`: streams one specific Object's bytes.
    pub async fn download_object(&self, id: &ObjectId) -> ContentResult<ByteStream> {
        let object = self.repository.get_object(id).await.map_err(ContentError::from)?;
        let backend = self.resolve_backend(&object.storage_backend_name)?;
        backend.download(&object.object_key).await.map_err(ContentError::from)
    }
}
