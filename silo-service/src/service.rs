use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use silo_core::{emit_best_effort, ContentError, ContentResult, EventSink};
use silo_model::{Content, ObjectId};
use silo_repo::Repository;
use silo_store::{BlobStore, KeyGenInput, ObjectKeyGenerator};
use silo_urls::UrlStrategy;

use crate::previewer::Previewer;

/// The orchestration engine. Composed at construction time via
/// [`crate::ServiceBuilder`] with a Repository, zero or more named
/// BlobStores, an ObjectKeyGenerator, a URLStrategy, an optional EventSink,
/// and an optional Previewer. `Service` is a plain value passed explicitly
/// by callers — no global state, no package-level singleton.
pub struct Service {
    pub(crate) repository: Arc<dyn Repository>,
    pub(crate) backends: HashMap<String, Arc<dyn BlobStore>>,
    pub(crate) backend_order: Vec<String>,
    pub(crate) default_backend: Option<String>,
    pub(crate) key_generator: Arc<dyn ObjectKeyGenerator>,
    pub(crate) url_strategy: Arc<dyn UrlStrategy>,
    pub(crate) event_sink: Arc<dyn EventSink>,
    #[allow(dead_code)]
    pub(crate) previewer: Option<Arc<dyn Previewer>>,
}

impl Service {
    /// Looks up a registered backend by name (empty resolves to the
    /// default, same rule as every upload/download path). Exposed so an
    /// HTTP front end can reach the `SignatureValidator` capability and
    /// raw upload/download/preview operations directly — the presigned
    /// blob routes (`/upload/{key}`, `/download/{key}`, `/preview/{key}`)
    /// operate on `BlobStore` directly and never touch a Content record.
    pub fn backend(&self, name: &str) -> ContentResult<Arc<dyn BlobStore>> {
        self.resolve_backend(name)
    }

    /// Every registered backend name, in registration order. The caller
    /// that validates a presigned request against an unknown backend name
    /// iterates these trying each one's `SignatureValidator`.
    pub fn backend_names(&self) -> &[String] {
        &self.backend_order
    }

    /// Resolves a backend name to its registered instance. An empty name
    /// resolves to the default backend: the one named via
    /// `with_default_backend`, else the first one registered.
    pub(crate) fn resolve_backend(&self, name: &str) -> ContentResult<Arc<dyn BlobStore>> {
        let resolved_name = if name.is_empty() {
            self.default_backend
                .clone()
                .or_else(|| self.backend_order.first().cloned())
                .ok_or_else(|| ContentError::storage_backend_not_found(""))?
        } else {
            name.to_string()
        };

        self.backends
            .get(&resolved_name)
            .cloned()
            .ok_or_else(|| ContentError::storage_backend_not_found(resolved_name))
    }

    /// Computes the object key for a new Object belonging to `content`.
    /// Originals get `derivation_type`/`variant` = `""`;
    /// derived content resolves its coordinates from the DerivedContent
    /// edge where `content` is the child, via
    /// `DerivedContent::resolved_variant`.
    pub(crate) async fn object_key_for(
        &self,
        content: &Content,
        object_id: &ObjectId,
        file_name: Option<&str>,
    ) -> ContentResult<String> {
        let (derivation_type, variant) = if content.is_original() {
            (String::new(), String::new())
        } else {
            let edge = self
                .repository
                .get_derived_relationship_by_content_id(&content.id)
                .await
                .map_err(ContentError::from)?;
            match edge {
                Some(edge) => {
                    let variant = edge.resolved_variant();
                    (edge.derivation_type, variant)
                }
                None => (content.derivation_type.clone(), String::new()),
            }
        };

        Ok(self.key_generator.generate_key(KeyGenInput {
            tenant_id: &content.tenant_id,
            content_id: &content.id,
            object_id,
            derivation_type: &derivation_type,
            variant: &variant,
            file_name,
        }))
    }

    pub(crate) async fn emit(&self, event: silo_core::ContentEvent) {
        emit_best_effort(self.event_sink.as_ref(), event).await;
    }

    pub(crate) async fn touch_content(&self, mut content: Content) -> ContentResult<Content> {
        content.touch(Utc::now());
        self.repository
            .update_content(content)
            .await
            .map_err(ContentError::from)
    }
}

/// Convenience re-export so callers can build a `Service` without reaching
/// into `silo_model`/`silo_repo` themselves for the id types used across
/// this crate's public signatures.
pub use silo_model::ContentStatus;

pub(crate) fn is_post_upload(status: ContentStatus) -> bool {
    matches!(
        status,
        ContentStatus::Uploaded | ContentStatus::Processing | ContentStatus::Processed | ContentStatus::Archived
    )
}

pub(crate) fn is_uploaded_object_status(status: silo_model::ObjectStatus) -> bool {
    matches!(
        status,
        silo_model::ObjectStatus::Uploaded | silo_model::ObjectStatus::Processed
    )
}
