use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use silo_config::{build_service, with_signer_secret, with_storage_url};
use silo_http::{build_router, AppState};
use tower::ServiceExt;

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn test_router() -> (axum::Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let storage_url = format!("file://{}", dir.path().display());
    let service = build_service(vec![
        with_storage_url(storage_url),
        with_signer_secret(b"test-secret-thats-long-enough".to_vec()),
    ])
    .await
    .unwrap();
    (build_router(AppState::new(service)), dir)
}

#[tokio::test]
async fn create_then_get_content_round_trips() {
    let (router, _dir) = test_router().await;

    let res = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/contents")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "tenant_id": "tenant-a",
                        "owner_id": "owner-1",
                        "owner_type": "user",
                        "name": "a.txt",
                        "document_type": "text/plain"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("x-request-id").is_some());
    let created = json_body(res).await;
    let id = created["id"].as_str().unwrap().to_string();

    let res = router
        .clone()
        .oneshot(Request::builder().uri(format!("/contents/{id}")).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let details = json_body(res).await;
    assert_eq!(details["content"]["id"], id);
    assert_eq!(details["content"]["tenant_id"], "tenant-a");
}

#[tokio::test]
async fn get_content_unknown_id_is_404() {
    let (router, _dir) = test_router().await;
    let unknown = uuid::Uuid::new_v4();

    let res = router
        .oneshot(Request::builder().uri(format!("/contents/{unknown}")).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = json_body(res).await;
    assert_eq!(body["error"]["code"], "ContentNotFound");
}

#[tokio::test]
async fn malformed_content_id_is_400() {
    let (router, _dir) = test_router().await;

    let res = router
        .oneshot(Request::builder().uri("/contents/not-a-uuid").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bulk_lookup_rejects_more_than_fifty_ids() {
    let (router, _dir) = test_router().await;
    let query: String = (0..51).map(|_| format!("id={}", uuid::Uuid::new_v4())).collect::<Vec<_>>().join("&");

    let res = router
        .oneshot(Request::builder().uri(format!("/contents/bulk?{query}")).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_object_mints_an_upload_url_and_presigned_round_trip_works() {
    let (router, _dir) = test_router().await;

    let res = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/contents")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "tenant_id": "t",
                        "owner_id": "o",
                        "owner_type": "user",
                        "name": "a.bin",
                        "document_type": "application/octet-stream"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let content = json_body(res).await;
    let content_id = content["id"].as_str().unwrap();

    let res = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/contents/{content_id}/objects"))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "file_name": "a.bin" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    let upload_url = body["upload_url"].as_str().unwrap().to_string();
    assert!(upload_url.starts_with("/upload/"));

    let res = router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(&upload_url)
                .body(Body::from("hello world"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let download_url = upload_url.replacen("/upload/", "/download/", 1);
    let res = router
        .oneshot(Request::builder().uri(&download_url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    // The download path is signed separately from the upload path, so a
    // reused upload signature over a different path is rejected.
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    tokio::time::sleep(Duration::from_millis(1)).await;
}
