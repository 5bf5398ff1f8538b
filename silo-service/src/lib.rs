//! silo-service: the orchestration engine that composes a Repository, a
//! set of named BlobStores, an ObjectKeyGenerator, a URLStrategy, and an
//! optional EventSink/Previewer into the content lifecycle operations.
//! Build one with [`ServiceBuilder`].

mod builder;
mod content;
mod derive;
mod details;
mod object;
mod previewer;
mod requests;
mod service;
mod upload;

pub use builder::ServiceBuilder;
pub use derive::{DerivedContentEntry, ListDerivedContentOptions};
pub use details::{ContentDetails, DerivedTreeNode};
pub use previewer::Previewer;
pub use requests::{
    ContentDetailsOptions, CreateContentRequest, CreateDerivedContentRequest, CreateObjectRequest,
    UploadContentRequest, UploadDerivedContentRequest, UploadObjectForContentRequest,
};
pub use service::{ContentStatus, Service};

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use bytes::Bytes;
    use futures_util::stream;
    use silo_core::{ContentError, RecordingEventSink};
    use silo_repo::InMemoryRepository;
    use silo_store::MemoryBlobStore;

    use super::*;

    fn bytes_stream(data: &'static [u8]) -> silo_store::ByteStream {
        Box::pin(stream::once(async move { Ok(Bytes::from_static(data)) }))
    }

    fn test_service() -> Service {
        ServiceBuilder::new()
            .with_repository(Arc::new(InMemoryRepository::default()))
            .with_backend("mem", Arc::new(MemoryBlobStore::new("mem")))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn upload_content_transitions_to_uploaded_and_persists_bytes() {
        let service = test_service();
        let (content, object) = service
            .upload_content(UploadContentRequest {
                tenant_id: "tenant-a".into(),
                owner_id: "owner-1".into(),
                owner_type: "user".into(),
                name: "a.txt".into(),
                document_type: "text/plain".into(),
                description: None,
                file_name: Some("a.txt".into()),
                mime_type: Some("text/plain".into()),
                tags: vec!["doc".into()],
                title: None,
                created_by: None,
                custom: BTreeMap::new(),
                backend: String::new(),
                reader: bytes_stream(b"hello"),
            })
            .await
            .unwrap();

        assert_eq!(content.status, ContentStatus::Uploaded);
        assert_eq!(object.storage_backend_name, "mem");

        let fetched = service.get_content(&content.id).await.unwrap();
        assert_eq!(fetched.status, ContentStatus::Uploaded);
    }

    #[tokio::test]
    async fn upload_content_with_unknown_backend_fails() {
        let service = test_service();
        let err = service
            .upload_content(UploadContentRequest {
                tenant_id: "t".into(),
                owner_id: "o".into(),
                owner_type: "user".into(),
                name: "a.txt".into(),
                document_type: "text/plain".into(),
                description: None,
                file_name: None,
                mime_type: None,
                tags: vec![],
                title: None,
                created_by: None,
                custom: BTreeMap::new(),
                backend: "nope".into(),
                reader: bytes_stream(b"hello"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ContentError::StorageBackendNotFound { .. }));
    }

    #[tokio::test]
    async fn derived_content_pipeline_reaches_ready() {
        let service = test_service();
        let (parent, _object) = service
            .upload_content(UploadContentRequest {
                tenant_id: "t".into(),
                owner_id: "o".into(),
                owner_type: "user".into(),
                name: "original.bin".into(),
                document_type: "application/octet-stream".into(),
                description: None,
                file_name: None,
                mime_type: None,
                tags: vec![],
                title: None,
                created_by: None,
                custom: BTreeMap::new(),
                backend: String::new(),
                reader: bytes_stream(b"original"),
            })
            .await
            .unwrap();
        let parent = service.update_content_status(&parent.id, "uploaded").await.unwrap();
        assert_eq!(parent.status, ContentStatus::Uploaded);

        let (child, edge) = service
            .create_derived_content(CreateDerivedContentRequest {
                parent_id: Some(parent.id.clone()),
                variant: "thumbnail_256".into(),
                name: "thumb.png".into(),
                document_type: "image/png".into(),
                owner_id: "o".into(),
                owner_type: "user".into(),
                tenant_id: "t".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(edge.derivation_type, "thumbnail");
        assert_eq!(child.derivation_type, "thumbnail");

        service
            .upload_object_for_content(UploadObjectForContentRequest {
                content_id: child.id.clone(),
                backend: String::new(),
                file_name: Some("thumb.png".into()),
                mime_type: Some("image/png".into()),
                reader: bytes_stream(b"thumb"),
            })
            .await
            .unwrap();

        let child = service.update_content_status(&child.id, "processed").await.unwrap();
        assert_eq!(child.status, ContentStatus::Processed);

        let details = service
            .get_content_details(&parent.id, ContentDetailsOptions::default())
            .await
            .unwrap();
        assert!(details.ready);
        assert!(details.thumbnails.contains_key("thumbnail_256"));
    }

    #[tokio::test]
    async fn create_derived_content_rejects_parent_not_post_upload() {
        let service = test_service();
        let parent = service
            .create_content(crate::CreateContentRequest {
                tenant_id: "t".into(),
                owner_id: "o".into(),
                owner_type: "user".into(),
                name: "original.bin".into(),
                document_type: "application/octet-stream".into(),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(parent.status, ContentStatus::Created);

        let err = service
            .create_derived_content(CreateDerivedContentRequest {
                parent_id: Some(parent.id.clone()),
                variant: "thumbnail_256".into(),
                name: "thumb.png".into(),
                document_type: "image/png".into(),
                owner_id: "o".into(),
                owner_type: "user".into(),
                tenant_id: "t".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ContentError::InvalidContentStatus { .. }));
    }

    #[tokio::test]
    async fn upload_derived_content_lands_in_processed_not_uploaded() {
        let service = test_service();
        let (parent, _object) = service
            .upload_content(UploadContentRequest {
                tenant_id: "t".into(),
                owner_id: "o".into(),
                owner_type: "user".into(),
                name: "original.bin".into(),
                document_type: "application/octet-stream".into(),
                description: None,
                file_name: None,
                mime_type: None,
                tags: vec![],
                title: None,
                created_by: None,
                custom: BTreeMap::new(),
                backend: String::new(),
                reader: bytes_stream(b"original"),
            })
            .await
            .unwrap();

        let (child, object, edge) = service
            .upload_derived_content(crate::UploadDerivedContentRequest {
                parent_id: parent.id.clone(),
                derivation_type: String::new(),
                variant: "thumbnail_256".into(),
                name: "thumb.png".into(),
                document_type: "image/png".into(),
                owner_id: "o".into(),
                owner_type: "user".into(),
                tenant_id: "t".into(),
                file_name: Some("thumb.png".into()),
                mime_type: Some("image/png".into()),
                derivation_params: BTreeMap::new(),
                processing_metadata: BTreeMap::new(),
                reader: bytes_stream(b"thumb"),
            })
            .await
            .unwrap();

        assert_eq!(child.status, ContentStatus::Processed);
        assert_eq!(edge.derivation_type, "thumbnail");
        assert_eq!(object.storage_backend_name, "mem");

        let fetched = service.get_content(&child.id).await.unwrap();
        assert_eq!(fetched.status, ContentStatus::Processed);
    }

    #[tokio::test]
    async fn derivation_filtering_matches_by_type_and_variant() {
        let service = test_service();
        let (parent, _) = service
            .upload_content(UploadContentRequest {
                tenant_id: "t".into(),
                owner_id: "o".into(),
                owner_type: "user".into(),
                name: "original.bin".into(),
                document_type: "application/octet-stream".into(),
                description: None,
                file_name: None,
                mime_type: None,
                tags: vec![],
                title: None,
                created_by: None,
                custom: BTreeMap::new(),
                backend: String::new(),
                reader: bytes_stream(b"original"),
            })
            .await
            .unwrap();

        for variant in ["thumbnail_128", "thumbnail_256", "preview_720", "preview_1080"] {
            service
                .create_derived_content(CreateDerivedContentRequest {
                    parent_id: Some(parent.id.clone()),
                    variant: variant.into(),
                    name: variant.into(),
                    document_type: "image/png".into(),
                    owner_id: "o".into(),
                    owner_type: "user".into(),
                    tenant_id: "t".into(),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let thumbnails = service
            .list_derived_content(
                ListDerivedContentOptions::new()
                    .with_parent_id(parent.id.clone())
                    .with_derivation_types(vec!["thumbnail".into()]),
            )
            .await
            .unwrap();
        assert_eq!(thumbnails.len(), 2);
        assert!(thumbnails.iter().all(|entry| entry.edge.derivation_type == "thumbnail"));

        let picked = service
            .list_derived_content(
                ListDerivedContentOptions::new()
                    .with_parent_id(parent.id.clone())
                    .with_variants(vec!["thumbnail_256".into(), "preview_1080".into()]),
            )
            .await
            .unwrap();
        assert_eq!(picked.len(), 2);
    }

    #[tokio::test]
    async fn soft_delete_hides_content_and_status_listing() {
        let service = test_service();
        let (content, _) = service
            .upload_content(UploadContentRequest {
                tenant_id: "t".into(),
                owner_id: "o".into(),
                owner_type: "user".into(),
                name: "a.txt".into(),
                document_type: "text/plain".into(),
                description: None,
                file_name: None,
                mime_type: None,
                tags: vec![],
                title: None,
                created_by: None,
                custom: BTreeMap::new(),
                backend: String::new(),
                reader: bytes_stream(b"hello"),
            })
            .await
            .unwrap();

        service.delete_content(&content.id).await.unwrap();

        let err = service.get_content(&content.id).await.unwrap_err();
        assert!(matches!(err, ContentError::ContentNotFound { .. }));

        let uploaded = service.get_content_by_status(ContentStatus::Uploaded).await.unwrap();
        assert!(uploaded.iter().all(|c| c.id != content.id));
    }

    #[tokio::test]
    async fn backend_selection_picks_default_then_named_then_rejects_unknown() {
        let service = ServiceBuilder::new()
            .with_repository(Arc::new(InMemoryRepository::default()))
            .with_backend("mem", Arc::new(MemoryBlobStore::new("mem")))
            .with_backend("fs", Arc::new(MemoryBlobStore::new("fs")))
            .build()
            .unwrap();

        let (_content, default_object) = service
            .upload_content(UploadContentRequest {
                tenant_id: "t".into(),
                owner_id: "o".into(),
                owner_type: "user".into(),
                name: "a.txt".into(),
                document_type: "text/plain".into(),
                description: None,
                file_name: None,
                mime_type: None,
                tags: vec![],
                title: None,
                created_by: None,
                custom: BTreeMap::new(),
                backend: String::new(),
                reader: bytes_stream(b"hello"),
            })
            .await
            .unwrap();
        assert_eq!(default_object.storage_backend_name, "mem");

        let (_content, fs_object) = service
            .upload_content(UploadContentRequest {
                tenant_id: "t".into(),
                owner_id: "o".into(),
                owner_type: "user".into(),
                name: "b.txt".into(),
                document_type: "text/plain".into(),
                description: None,
                file_name: None,
                mime_type: None,
                tags: vec![],
                title: None,
                created_by: None,
                custom: BTreeMap::new(),
                backend: "fs".into(),
                reader: bytes_stream(b"hello"),
            })
            .await
            .unwrap();
        assert_eq!(fs_object.storage_backend_name, "fs");
    }

    #[tokio::test]
    async fn events_are_recorded_through_event_sink() {
        let sink = Arc::new(RecordingEventSink::new());
        let service = ServiceBuilder::new()
            .with_repository(Arc::new(InMemoryRepository::default()))
            .with_backend("mem", Arc::new(MemoryBlobStore::new("mem")))
            .with_event_sink(sink.clone())
            .build()
            .unwrap();

        service
            .upload_content(UploadContentRequest {
                tenant_id: "t".into(),
                owner_id: "o".into(),
                owner_type: "user".into(),
                name: "a.txt".into(),
                document_type: "text/plain".into(),
                description: None,
                file_name: None,
                mime_type: None,
                tags: vec![],
                title: None,
                created_by: None,
                custom: BTreeMap::new(),
                backend: String::new(),
                reader: bytes_stream(b"hello"),
            })
            .await
            .unwrap();

        let kinds: Vec<_> = sink.events().into_iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&silo_core::ContentEventKind::ContentCreated));
        assert!(kinds.contains(&silo_core::ContentEventKind::ObjectCreated));
        assert!(kinds.contains(&silo_core::ContentEventKind::ObjectUploaded));
    }
}
