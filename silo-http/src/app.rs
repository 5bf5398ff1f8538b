use axum::http::{HeaderName, HeaderValue, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use axum::body::Body;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::blobs;
use crate::routes;
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Stamps every request/response with an `x-request-id`, generating one
/// when the caller didn't send one (mirrors `dog_axum::app::ensure_request_id`).
async fn ensure_request_id(mut req: Request<Body>, next: Next) -> Response {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);
    let request_id = req
        .headers()
        .get(&header)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        req.headers_mut().insert(header.clone(), value);
    }

    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        res.headers_mut().insert(header, value);
    }
    res
}

/// Builds the full router: content routes under `/contents`, the three raw
/// presigned blob routes, and the ambient `TraceLayer`/request-id stack.
pub fn build_router(state: AppState) -> Router {
    let blob_routes = Router::new()
        .route("/upload/{*key}", axum::routing::put(blobs::upload))
        .route("/download/{*key}", axum::routing::get(blobs::download))
        .route("/preview/{*key}", axum::routing::get(blobs::preview))
        .with_state(state.clone());

    Router::new()
        .merge(routes::router(state))
        .merge(blob_routes)
        .layer(middleware::from_fn(ensure_request_id))
        .layer(TraceLayer::new_for_http())
}
