//! HTTP transport for the document service.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /api/documents/:id` - the document, or 404.
//! - `POST /api/documents` - version-checked save. 201 with the saved
//!   document, 409 with `{ "error", "documentId", "attemptedVersion" }`.
//! - `DELETE /api/documents/:id` - idempotent delete, 204.
//! - `GET /api/documents?ownerId=&page=&size=` - one slice of the owner's
//!   documents. Pass the returned `nextCursor` as `cursor` to resume
//!   without replaying earlier pages.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use docmeta::{http, DocumentService, InMemoryDocumentStore};
//!
//! let service = Arc::new(DocumentService::with_defaults(InMemoryDocumentStore::default())?);
//! http::serve(service, "0.0.0.0:3000").await?;
//! ```

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::document::Document;
use crate::error::DocumentError;
use crate::pagination::{PageRequest, Slice};
use crate::service::DocumentService;
use crate::store::DocumentStore;

const DEFAULT_PAGE_SIZE: usize = 20;

/// Build an axum `Router` serving the document routes.
pub fn router<S: DocumentStore + 'static>(service: Arc<DocumentService<S>>) -> Router {
    Router::new()
        .route(
            "/api/documents",
            get(list_handler::<S>).post(save_handler::<S>),
        )
        .route(
            "/api/documents/:id",
            get(get_handler::<S>).delete(delete_handler::<S>),
        )
        .with_state(service)
}

/// Serve the document routes at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<S: DocumentStore + 'static>(
    service: Arc<DocumentService<S>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    owner_id: i64,
    #[serde(default)]
    page: usize,
    #[serde(default = "default_page_size")]
    size: usize,
    #[serde(default)]
    cursor: Option<String>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(flatten)]
    slice: Slice<Document>,
    next_cursor: Option<String>,
}

async fn get_handler<S: DocumentStore + 'static>(
    State(service): State<Arc<DocumentService<S>>>,
    Path(id): Path<String>,
) -> Response {
    match service.get_by_id(&id) {
        Ok(Some(document)) => (StatusCode::OK, Json(document)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("document {} not found", id) })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

async fn save_handler<S: DocumentStore + 'static>(
    State(service): State<Arc<DocumentService<S>>>,
    Json(document): Json<Document>,
) -> Response {
    match service.save(&document) {
        Ok(saved) => (StatusCode::CREATED, Json(saved)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_handler<S: DocumentStore + 'static>(
    State(service): State<Arc<DocumentService<S>>>,
    Path(id): Path<String>,
) -> Response {
    match service.delete(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

async fn list_handler<S: DocumentStore + 'static>(
    State(service): State<Arc<DocumentService<S>>>,
    Query(params): Query<ListParams>,
) -> Response {
    let result = PageRequest::of(params.page, params.size).and_then(|request| {
        match params.cursor.as_deref() {
            Some(token) => service.list_by_owner_after(params.owner_id, token, request),
            None => service.list_by_owner(params.owner_id, request),
        }
    });
    let slice = match result {
        Ok(slice) => slice,
        Err(e) => return error_response(e),
    };
    let next_cursor = match slice.cursor.as_ref().map(|c| c.encode()).transpose() {
        Ok(token) => token,
        Err(e) => return error_response(e.into()),
    };
    (StatusCode::OK, Json(ListResponse { slice, next_cursor })).into_response()
}

fn error_response(e: DocumentError) -> Response {
    let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = match &e {
        DocumentError::OptimisticLockConflict {
            id,
            attempted_version,
        } => json!({
            "error": e.to_string(),
            "documentId": id,
            "attemptedVersion": attempted_version,
        }),
        _ => json!({ "error": e.to_string() }),
    };
    (status, Json(body)).into_response()
}
