//! The content-level routes: everything under `/contents`.
//! Thin JSON glue over `silo_service::Service` — no business logic lives
//! here.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::{Json, Router};
use silo_core::ContentError;
use silo_model::{ContentId, ContentMetadata};
use silo_service::{
    ContentDetailsOptions, CreateContentRequest, CreateDerivedContentRequest, CreateObjectRequest,
};

use crate::dto::{BulkQuery, CreateContentBody, CreateDerivedContentBody, CreateObjectBody, ListObjectsQuery, SetContentMetadataBody};
use crate::error::HttpResult;
use crate::extract::ValidJson;
use crate::state::AppState;

fn parse_content_id(raw: &str) -> Result<ContentId, ContentError> {
    ContentId::parse(raw).map_err(|_| ContentError::invalid_input(format!("'{raw}' is not a valid content id")))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/contents", axum::routing::post(create_content))
        .route("/contents/bulk", axum::routing::get(get_contents_by_ids))
        .route(
            "/contents/{id}",
            axum::routing::get(get_content).delete(delete_content),
        )
        .route("/contents/{id}/objects", axum::routing::post(create_object).get(list_objects))
        .route(
            "/contents/{id}/metadata",
            axum::routing::put(set_content_metadata).get(get_content_metadata),
        )
        .route("/contents/{id}/derived", axum::routing::post(create_derived_content).get(list_derived_content))
        .route("/contents/{id}/derived-tree", axum::routing::get(get_derived_tree))
        .with_state(state)
}

async fn create_content(State(state): State<AppState>, ValidJson(body): ValidJson<CreateContentBody>) -> HttpResult<impl IntoResponse> {
    let content = state
        .service
        .create_content(CreateContentRequest {
            tenant_id: body.tenant_id,
            owner_id: body.owner_id,
            owner_type: body.owner_type,
            name: body.name,
            document_type: body.document_type,
            description: body.description,
        })
        .await?;
    Ok(Json(content))
}

async fn get_content(State(state): State<AppState>, Path(id): Path<String>) -> HttpResult<impl IntoResponse> {
    let id = parse_content_id(&id)?;
    let details = state.service.get_content_details(&id, ContentDetailsOptions::default()).await?;
    Ok(Json(details))
}

async fn delete_content(State(state): State<AppState>, Path(id): Path<String>) -> HttpResult<impl IntoResponse> {
    let id = parse_content_id(&id)?;
    state.service.delete_content(&id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// `GET /contents/bulk?id=…&id=…`, max 50 ids per request.
async fn get_contents_by_ids(State(state): State<AppState>, Query(query): Query<BulkQuery>) -> HttpResult<impl IntoResponse> {
    if query.id.len() > 50 {
        return Err(ContentError::invalid_input("at most 50 ids may be requested at once").into());
    }

    let mut details = Vec::with_capacity(query.id.len());
    for raw_id in &query.id {
        let id = parse_content_id(raw_id)?;
        details.push(state.service.get_content_details(&id, ContentDetailsOptions::default()).await?);
    }
    Ok(Json(details))
}

async fn create_object(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<CreateObjectBody>,
) -> HttpResult<impl IntoResponse> {
    let content_id = parse_content_id(&id)?;
    let (object, upload_url) = state
        .service
        .create_object_for_upload(CreateObjectRequest {
            content_id,
            backend: body.backend,
            file_name: body.file_name,
        })
        .await?;
    Ok(Json(serde_json::json!({ "object": object, "upload_url": upload_url })))
}

async fn list_objects(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListObjectsQuery>,
) -> HttpResult<impl IntoResponse> {
    let content_id = parse_content_id(&id)?;
    let objects = state.service.list_objects(&content_id, query.latest).await?;
    Ok(Json(objects))
}

async fn set_content_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<SetContentMetadataBody>,
) -> HttpResult<impl IntoResponse> {
    let content_id = parse_content_id(&id)?;
    let metadata = ContentMetadata {
        content_id: Some(content_id),
        mime_type: body.mime_type,
        file_name: body.file_name,
        file_size: body.file_size,
        tags: body.tags,
        title: body.title,
        description: body.description,
        created_by: body.created_by,
        custom: body.custom,
    };
    let metadata = state.service.set_content_metadata(metadata).await?;
    Ok(Json(metadata))
}

async fn get_content_metadata(State(state): State<AppState>, Path(id): Path<String>) -> HttpResult<impl IntoResponse> {
    let content_id = parse_content_id(&id)?;
    let metadata = state.service.get_content_metadata(&content_id).await?;
    Ok(Json(metadata))
}

async fn create_derived_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<CreateDerivedContentBody>,
) -> HttpResult<impl IntoResponse> {
    let parent_id = parse_content_id(&id)?;
    let (child, edge) = state
        .service
        .create_derived_content(CreateDerivedContentRequest {
            parent_id: Some(parent_id),
            derivation_type: body.derivation_type,
            variant: body.variant,
            name: body.name,
            document_type: body.document_type,
            owner_id: body.owner_id,
            owner_type: body.owner_type,
            tenant_id: body.tenant_id,
            derivation_params: body.derivation_params,
            processing_metadata: body.processing_metadata,
        })
        .await?;
    Ok(Json(serde_json::json!({ "content": child, "edge": edge })))
}

async fn list_derived_content(State(state): State<AppState>, Path(id): Path<String>) -> HttpResult<impl IntoResponse> {
    let parent_id = parse_content_id(&id)?;
    let children = state
        .service
        .list_derived_content(silo_service::ListDerivedContentOptions::new().with_parent_id(parent_id))
        .await?;
    Ok(Json(children))
}

async fn get_derived_tree(State(state): State<AppState>, Path(id): Path<String>) -> HttpResult<impl IntoResponse> {
    let id = parse_content_id(&id)?;
    let tree = state.service.get_derived_tree(&id).await?;
    Ok(Json(tree))
}
