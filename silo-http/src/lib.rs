//! silo-http: a thin axum layer over `silo_service::Service`.
//! Out of the core by design — the content/object/derivation logic lives
//! in `silo-service`; this crate only does request parsing, JSON
//! encoding, and presigned-request validation at the HTTP boundary.

mod app;
mod blobs;
mod dto;
mod error;
mod extract;
mod routes;
mod state;

pub use app::build_router;
pub use error::{HttpError, HttpResult};
pub use state::AppState;

use tokio::net::{TcpListener, ToSocketAddrs};

/// Binds `addr` and serves the full router until the process is killed.
pub async fn serve<A: ToSocketAddrs>(state: AppState, addr: A) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    let router = build_router(state);
    axum::serve(listener, router).await?;
    Ok(())
}
