//! HTTP transport integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

use std::sync::Arc;

use docmeta::{http, Document, DocumentService, InMemoryDocumentStore};
use serde_json::{json, Value};

use crate::support::{now, seed_owner};

/// Bind to port 0 and return the actual address.
async fn start_server(service: Arc<DocumentService<InMemoryDocumentStore>>) -> String {
    let app = http::router(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn service() -> Arc<DocumentService<InMemoryDocumentStore>> {
    Arc::new(crate::support::service())
}

#[tokio::test]
async fn save_then_get() {
    let base = start_server(service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/documents"))
        .json(&json!({ "id": "d1", "ownerId": 7, "category": 10, "subCategory": 20 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let saved: Document = resp.json().await.unwrap();
    assert_eq!(saved.version, Some(1));

    let resp = client
        .get(format!("{base}/api/documents/d1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ownerId"], 7);
    assert_eq!(body["version"], 1);
}

#[tokio::test]
async fn missing_document_is_404() {
    let base = start_server(service()).await;
    let resp = reqwest::get(format!("{base}/api/documents/nope")).await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn stale_save_is_409_with_attempted_version() {
    let service = service();
    let v1 = service.save(&Document::new("d1", 7, 10, 20)).unwrap();
    service.save(&v1).unwrap();
    let base = start_server(service).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/documents"))
        .json(&v1)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["documentId"], "d1");
    assert_eq!(body["attemptedVersion"], 1);
    assert!(body["error"].as_str().unwrap().contains("d1"));
}

#[tokio::test]
async fn empty_id_is_400() {
    let base = start_server(service()).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/documents"))
        .json(&json!({ "id": "", "ownerId": 7, "category": 10, "subCategory": 20 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let service = service();
    service.save(&Document::new("d1", 7, 10, 20)).unwrap();
    let base = start_server(service.clone()).await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let resp = client
            .delete(format!("{base}/api/documents/d1"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 204);
    }
    assert_eq!(service.get_by_id("d1").unwrap(), None);
}

#[tokio::test]
async fn list_pages_and_resumes_with_cursor() {
    let service = crate::support::service();
    seed_owner(&service, 42, "doc", 5);
    let base = start_server(Arc::new(service)).await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("{base}/api/documents?ownerId=42&page=0&size=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["content"].as_array().unwrap().len(), 2);
    assert_eq!(body["hasNext"], true);
    let cursor = body["nextCursor"].as_str().unwrap().to_string();

    let body: Value = client
        .get(format!("{base}/api/documents?ownerId=42&page=2&size=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["content"].as_array().unwrap().len(), 1);
    assert_eq!(body["hasNext"], false);
    assert!(body["nextCursor"].is_null());

    let body: Value = client
        .get(format!(
            "{base}/api/documents?ownerId=42&page=1&size=2&cursor={cursor}"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["content"][0]["id"], "doc-2");
}

#[tokio::test]
async fn zero_size_is_400() {
    let base = start_server(service()).await;
    let resp = reqwest::get(format!("{base}/api/documents?ownerId=42&size=0"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn timestamps_travel_as_iso8601() {
    let service = service();
    let at = now();
    service
        .save(&Document::new("d1", 7, 10, 20).created(at, "alice"))
        .unwrap();
    let base = start_server(service).await;

    let body: Value = reqwest::get(format!("{base}/api/documents/d1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["createdAt"], docmeta::timestamp::format(&at));
    assert!(body["updatedAt"].is_null());
}
