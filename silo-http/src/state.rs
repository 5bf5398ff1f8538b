use std::sync::Arc;

use silo_service::Service;

/// Shared application state, captured by handler closures. No global
/// state — the `Service` is a value passed explicitly everywhere.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Service>,
}

impl AppState {
    pub fn new(service: Service) -> Self {
        Self { service: Arc::new(service) }
    }
}
