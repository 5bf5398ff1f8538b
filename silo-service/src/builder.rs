use std::collections::HashMap;
use std::sync::Arc;

use silo_core::{ContentError, ContentResult, EventSink, NoopEventSink};
use silo_repo::Repository;
use silo_store::{BlobStore, GitLikeKeyGenerator, ObjectKeyGenerator};
use silo_urls::{StorageDelegatedUrlStrategy, UrlStrategy};

use crate::previewer::Previewer;
use crate::Service;

/// Builds a [`Service`] from its constituent capabilities: "a
/// Repository, zero or more named BlobStores, an ObjectKeyGenerator, a
/// URLStrategy, an optional EventSink, and an optional Previewer.
/// Construction fails if no Repository is supplied." Everything else
/// defaults to a sensible, test-friendly choice so a caller that only
/// cares about the repository+memory-backend path doesn't have to wire up
/// every collaborator by hand.
#[derive(Default)]
pub struct ServiceBuilder {
    repository: Option<Arc<dyn Repository>>,
    backends: HashMap<String, Arc<dyn BlobStore>>,
    backend_order: Vec<String>,
    default_backend: Option<String>,
    key_generator: Option<Arc<dyn ObjectKeyGenerator>>,
    url_strategy: Option<Arc<dyn UrlStrategy>>,
    event_sink: Option<Arc<dyn EventSink>>,
    previewer: Option<Arc<dyn Previewer>>,
}

impl ServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository(mut self, repository: Arc<dyn Repository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Registers a named backend. The first backend registered becomes the
    /// implicit default unless overridden by [`Self::with_default_backend`];
    /// `UploadContent(backend="")` resolves to this default.
    pub fn with_backend(mut self, name: impl Into<String>, backend: Arc<dyn BlobStore>) -> Self {
        let name = name.into();
        if !self.backends.contains_key(&name) {
            self.backend_order.push(name.clone());
        }
        self.backends.insert(name, backend);
        self
    }

    pub fn with_default_backend(mut self, name: impl Into<String>) -> Self {
        self.default_backend = Some(name.into());
        self
    }

    pub fn with_key_generator(mut self, generator: Arc<dyn ObjectKeyGenerator>) -> Self {
        self.key_generator = Some(generator);
        self
    }

    pub fn with_url_strategy(mut self, strategy: Arc<dyn UrlStrategy>) -> Self {
        self.url_strategy = Some(strategy);
        self
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn with_previewer(mut self, previewer: Arc<dyn Previewer>) -> Self {
        self.previewer = Some(previewer);
        self
    }

    pub fn build(self) -> ContentResult<Service> {
        let repository = self
            .repository
            .ok_or_else(|| ContentError::invalid_input("Service requires a Repository"))?;

        Ok(Service {
            repository,
            backends: self.backends,
            backend_order: self.backend_order,
            default_backend: self.default_backend,
            key_generator: self
                .key_generator
                .unwrap_or_else(|| Arc::new(GitLikeKeyGenerator)),
            url_strategy: self
                .url_strategy
                .unwrap_or_else(|| Arc::new(StorageDelegatedUrlStrategy)),
            event_sink: self.event_sink.unwrap_or_else(|| Arc::new(NoopEventSink)),
            previewer: self.previewer,
        })
    }
}
