//! HTTP routing
//!
//! Maps each endpoint onto its handler, extracting query parameters and
//! multipart bodies on the way in. Extractor rejections are turned into
//! [`ApiError`] so every failure carries the `{detail}` body.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use std::sync::Arc;

use crate::error::FileStoreError;
use crate::storage::FileStore;

use super::error::ApiError;
use super::handlers::{
    UploadedFile, handle_delete, handle_frequent_words, handle_list, handle_update,
    handle_upload, handle_welcome, handle_word_count, parse_limit,
};
use super::responses::{
    FileNameQuery, FrequentWordsQuery, FrequentWordsResponse, ListResponse, MessageResponse,
    UPDATE_FIELD, UPLOAD_FIELD, UploadResult, WordCountResponse,
};

/// Shared state handed to every request
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<FileStore>,
    pub default_top_n: i64,
}

impl AppState {
    pub fn new(store: FileStore, default_top_n: i64) -> Self {
        Self {
            store: Arc::new(store),
            default_top_n,
        }
    }
}

/// Builds the router. `body_limit` caps upload and update bodies in bytes.
pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/upload", post(upload))
        .route("/list", get(list))
        .route("/delete", delete(remove))
        .route("/update", put(update))
        .route("/wc", get(word_count))
        .route("/freq-words", get(frequent_words))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn welcome() -> Json<MessageResponse> {
    Json(handle_welcome())
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not Found")
}

async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<UploadResult>>, ApiError> {
    let mut multipart = multipart?;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let name = field.file_name().map(str::to_string).ok_or_else(|| {
            FileStoreError::InvalidParameter("upload part is missing a file name".into())
        })?;
        let content = field.bytes().await?;

        files.push(UploadedFile { name, content });
    }

    Ok(Json(handle_upload(&state.store, files).await?))
}

async fn list(State(state): State<AppState>) -> Result<Json<ListResponse>, ApiError> {
    Ok(Json(handle_list(&state.store).await?))
}

async fn remove(
    State(state): State<AppState>,
    query: Result<Query<FileNameQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Query(query) = query?;
    Ok(Json(
        handle_delete(&state.store, query.filename.as_deref()).await?,
    ))
}

async fn update(
    State(state): State<AppState>,
    query: Result<Query<FileNameQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Query(query) = query?;
    let mut multipart = multipart?;
    let mut content = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPDATE_FIELD) {
            content = Some(field.bytes().await?);
            break;
        }
    }

    let content = content.ok_or_else(|| {
        FileStoreError::InvalidParameter(format!("missing multipart field '{UPDATE_FIELD}'"))
    })?;

    Ok(Json(
        handle_update(&state.store, query.filename.as_deref(), &content).await?,
    ))
}

async fn word_count(State(state): State<AppState>) -> Result<Json<WordCountResponse>, ApiError> {
    Ok(Json(handle_word_count(&state.store).await?))
}

async fn frequent_words(
    State(state): State<AppState>,
    query: Result<Query<FrequentWordsQuery>, QueryRejection>,
) -> Result<Json<FrequentWordsResponse>, ApiError> {
    let Query(query) = query?;
    let limit = parse_limit(query.n.as_deref(), state.default_top_n)?;
    Ok(Json(
        handle_frequent_words(&state.store, limit, query.order.as_deref()).await?,
    ))
}
