//! The three presigned blob routes: `PUT /upload/{key…}`,
//! `GET /download/{key…}`, `GET /preview/{key…}`. These operate on
//! `BlobStore` directly and never touch a Content/Object record — the
//! record was already created by `POST /contents/{id}/objects`, which
//! minted the URL these requests carry a signature for.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::StreamExt;
use silo_core::ContentError;
use silo_service::Service;
use silo_sign::{SignError, ValidatedRequest};
use silo_store::BlobStore;

use crate::dto::UploadResultDto;
use crate::error::{HttpError, HttpResult};
use crate::state::AppState;

/// Finds the first registered backend whose `SignatureValidator` accepts
/// this request, returning it alongside the validated request. Backends
/// that mint no presigned URLs (no validator) are skipped; if every
/// validator rejects the request, the last rejection is surfaced.
fn validate_and_select_backend(
    service: &Service,
    method: &str,
    path_and_query: &str,
) -> Result<(Arc<dyn BlobStore>, ValidatedRequest), SignError> {
    let mut last_err = SignError::MissingSignature;
    for name in service.backend_names() {
        let Ok(backend) = service.backend(name) else {
            continue;
        };
        let Some(validator) = backend.as_signature_validator() else {
            continue;
        };
        match validator.validate(method, path_and_query) {
            Ok(validated) => return Ok((backend, validated)),
            Err(err) => last_err = err,
        }
    }
    Err(last_err)
}

fn path_and_query(key: &str, prefix: &str, uri: &axum::http::Uri) -> String {
    match uri.query() {
        Some(query) => format!("{prefix}{key}?{query}"),
        None => format!("{prefix}{key}"),
    }
}

#[tracing::instrument(skip(state, req))]
pub async fn upload(State(state): State<AppState>, Path(key): Path<String>, req: Request) -> HttpResult<impl IntoResponse> {
    let path_and_query = path_and_query(&key, "/upload/", req.uri());
    let (backend, _validated) = validate_and_select_backend(&state.service, "PUT", &path_and_query)?;

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let stream = req
        .into_body()
        .into_data_stream()
        .map(|chunk| chunk.map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err)));

    let meta = backend
        .upload(&key, content_type.as_deref(), Box::pin(stream))
        .await
        .map_err(ContentError::from)?;

    Ok(Json(UploadResultDto::from(meta)))
}

#[tracing::instrument(skip(state))]
pub async fn download(State(state): State<AppState>, Path(key): Path<String>, uri: axum::http::Uri) -> HttpResult<Response> {
    let path_and_query = path_and_query(&key, "/download/", &uri);
    let (backend, _validated) = validate_and_select_backend(&state.service, "GET", &path_and_query)?;
    stream_object(backend.as_ref(), &key, false).await
}

#[tracing::instrument(skip(state))]
pub async fn preview(State(state): State<AppState>, Path(key): Path<String>, uri: axum::http::Uri) -> HttpResult<Response> {
    let path_and_query = path_and_query(&key, "/preview/", &uri);
    let (backend, _validated) = validate_and_select_backend(&state.service, "GET", &path_and_query)?;
    stream_object(backend.as_ref(), &key, true).await
}

async fn stream_object(backend: &dyn BlobStore, key: &str, inline: bool) -> HttpResult<Response> {
    let meta = backend.get_object_meta(key).await.map_err(ContentError::from)?;
    let body_stream = backend.download(key).await.map_err(ContentError::from)?;

    let mut response = Response::builder().status(StatusCode::OK);
    if let Some(content_type) = &meta.content_type {
        response = response.header(header::CONTENT_TYPE, content_type);
    }
    response = response.header(header::CONTENT_LENGTH, meta.size_bytes.to_string());
    let disposition = if inline { "inline" } else { "attachment" };
    response = response.header(header::CONTENT_DISPOSITION, disposition);

    response
        .body(Body::from_stream(body_stream))
        .map_err(|err| HttpError(anyhow::Error::new(err)))
}
