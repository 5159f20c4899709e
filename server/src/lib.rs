use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use parking_lot::RwLock;
use search_core::batch::process_queries;
use search_core::corpus::read_json_lines;
use search_core::dedup::remove_duplicates;
use search_core::{
    DocId, Document, DocumentRecord, DocumentStatus, ErrorKind, Execution, SearchError,
    SearchServer,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// The index is not safe for concurrent mutation, so writers take the lock
/// exclusively while searches share it.
pub type SharedIndex = Arc<RwLock<SearchServer>>;

#[derive(Clone)]
pub struct AppState {
    pub index: SharedIndex,
    pub admin_token: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<Document>,
}

#[derive(Deserialize)]
pub struct BatchRequest {
    pub queries: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<Vec<Document>>,
}

#[derive(Deserialize)]
pub struct MatchParams {
    pub q: String,
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Serialize, Deserialize)]
pub struct MatchResponse {
    pub document_id: DocId,
    pub words: Vec<String>,
    pub status: DocumentStatus,
}

#[derive(Serialize, Deserialize)]
pub struct DocumentsResponse {
    pub count: usize,
    pub ids: Vec<DocId>,
}

#[derive(Deserialize)]
pub struct RemoveParams {
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Serialize, Deserialize)]
pub struct DedupResponse {
    pub removed: Vec<DocId>,
    pub count: usize,
}

pub struct ApiError(StatusCode, String);

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        let status = match err.kind() {
            ErrorKind::Id => match err {
                SearchError::UnknownId(_) => StatusCode::NOT_FOUND,
                SearchError::DuplicateId(_) => StatusCode::CONFLICT,
                _ => StatusCode::BAD_REQUEST,
            },
            ErrorKind::Content | ErrorKind::Parse => StatusCode::BAD_REQUEST,
        };
        ApiError(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({ "error": self.1 }))).into_response()
    }
}

fn execution(parallel: bool) -> Execution {
    if parallel { Execution::Parallel } else { Execution::Sequential }
}

/// Runs index work on the blocking pool. Taking the lock and ranking can both
/// take a while, and neither may park a runtime worker.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
}

pub fn build_app(index: SearchServer, admin_token: Option<String>) -> Router {
    router(Arc::new(RwLock::new(index)), admin_token)
}

pub fn router(index: SharedIndex, admin_token: Option<String>) -> Router {
    let app_state = AppState { index, admin_token };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/search/batch", post(batch_handler))
        .route("/documents", get(list_documents).post(add_document))
        .route("/documents/:id", delete(remove_document))
        .route("/documents/:id/words", get(word_frequencies))
        .route("/documents/:id/match", get(match_document))
        .route("/dedup", post(dedup))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Adds documents from a JSONL file. Rejected documents are logged and
/// skipped; returns how many were added.
pub fn load_corpus(server: &mut SearchServer, path: &std::path::Path) -> Result<usize> {
    let records = read_json_lines(BufReader::new(File::open(path)?))?;
    let stats = server.add_records(records);
    Ok(stats.added)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_blocking(move || {
        let start = std::time::Instant::now();
        let status = params.status;
        let results = state.index.read().find_top_documents_with(
            execution(params.parallel),
            &params.q,
            |_, s, _| s == status,
        )?;
        let took_s = start.elapsed().as_secs_f64();
        Ok(Json(SearchResponse { query: params.q, took_s, total_hits: results.len(), results }))
    })
    .await
}

pub async fn batch_handler(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    run_blocking(move || {
        let results = process_queries(&state.index.read(), &request.queries)?;
        Ok(Json(BatchResponse { results }))
    })
    .await
}

pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<DocumentsResponse>, ApiError> {
    run_blocking(move || {
        let index = state.index.read();
        let ids = index.document_ids().collect();
        Ok(Json(DocumentsResponse { count: index.document_count(), ids }))
    })
    .await
}

pub async fn word_frequencies(
    State(state): State<AppState>,
    Path(id): Path<DocId>,
) -> Result<Json<BTreeMap<String, f64>>, ApiError> {
    run_blocking(move || {
        let index = state.index.read();
        let frequencies = index.word_frequencies(id)?;
        Ok(Json(frequencies.iter().map(|(word, tf)| (word.to_string(), *tf)).collect()))
    })
    .await
}

pub async fn match_document(
    State(state): State<AppState>,
    Path(id): Path<DocId>,
    Query(params): Query<MatchParams>,
) -> Result<Json<MatchResponse>, ApiError> {
    run_blocking(move || {
        let index = state.index.read();
        let (words, status) = index.match_document_with(execution(params.parallel), &params.q, id)?;
        let words = words.into_iter().map(str::to_string).collect();
        Ok(Json(MatchResponse { document_id: id, words, status }))
    })
    .await
}

pub async fn add_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(doc): Json<DocumentRecord>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    authorize(&state, &headers)?;
    run_blocking(move || {
        state.index.write().add_document(doc.id, &doc.text, doc.status, &doc.ratings)?;
        Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": doc.id }))))
    })
    .await
}

pub async fn remove_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<DocId>,
    Query(params): Query<RemoveParams>,
) -> Result<StatusCode, ApiError> {
    authorize(&state, &headers)?;
    run_blocking(move || {
        if state.index.write().remove_document_with(execution(params.parallel), id) {
            Ok(StatusCode::NO_CONTENT)
        } else {
            Err(SearchError::UnknownId(id).into())
        }
    })
    .await
}

pub async fn dedup(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DedupResponse>, ApiError> {
    authorize(&state, &headers)?;
    run_blocking(move || {
        let mut index = state.index.write();
        let removed = remove_duplicates(&mut index);
        tracing::info!(removed = removed.len(), "removed duplicate documents");
        Ok(Json(DedupResponse { removed, count: index.document_count() }))
    })
    .await
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err(ApiError(StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err(ApiError(StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
