use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use fieldsearch::{DocId, Document, Index, IndexConfig, Schema, SearchError, SearchHit};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub mod repository;

use repository::SampleDataRepository;

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<Index>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default = "default_field")]
    pub field: String,
    pub term: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_field() -> String {
    "description".to_string()
}

fn default_limit() -> usize {
    10
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub field: String,
    pub term: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Deserialize)]
pub struct DocumentBody {
    pub id: DocId,
    pub fields: BTreeMap<String, String>,
}

impl DocumentBody {
    fn into_document(self) -> Document {
        Document {
            id: self.id,
            fields: self.fields,
        }
    }
}

/// Builds the router, opening the index and seeding it with the sample
/// records so searches work out of the box.
pub fn build_app(config: IndexConfig) -> Result<Router> {
    let index = Index::open(Schema::sample_data(), config)?;
    let repository = SampleDataRepository;
    index.writer().add_or_update(
        repository
            .get_all()
            .into_iter()
            .map(repository::Record::into_document)
            .collect(),
    )?;
    tracing::info!(num_docs = index.query().num_docs(), "seeded sample records");

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
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

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:id", get(doc_handler))
        .route("/documents", post(add_documents))
        .route("/documents/:id", delete(delete_document))
        .route("/clear", post(clear_handler))
        .route("/compact", post(compact_handler))
        .with_state(AppState {
            index: Arc::new(index),
        })
        .layer(cors);
    Ok(app)
}

fn error_response(err: SearchError) -> (StatusCode, String) {
    let status = match &err {
        SearchError::NotFound(_) => StatusCode::NOT_FOUND,
        SearchError::LockConflict { .. } => StatusCode::CONFLICT,
        SearchError::InvariantViolation(_) | SearchError::Io { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string())
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let query = vec![(params.field.clone(), params.term.clone())];
    let results = state.index.query().search(&query, params.limit.clamp(1, 100));
    Json(SearchResponse {
        field: params.field,
        term: params.term,
        took_s: start.elapsed().as_secs_f64(),
        total_hits: results.len(),
        results,
    })
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(id): Path<DocId>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let fields = state.index.query().get(id).map_err(error_response)?;
    Ok(Json(serde_json::json!({ "id": id, "fields": fields })))
}

async fn add_documents(
    State(state): State<AppState>,
    Json(body): Json<Vec<DocumentBody>>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let count = body.len();
    let documents = body.into_iter().map(DocumentBody::into_document).collect();
    state
        .index
        .writer()
        .add_or_update(documents)
        .map_err(error_response)?;
    Ok(Json(serde_json::json!({ "indexed": count })))
}

async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<DocId>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let existed = state.index.writer().delete(id).map_err(error_response)?;
    Ok(Json(serde_json::json!({ "id": id, "deleted": existed })))
}

async fn clear_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    state.index.writer().clear_all().map_err(error_response)?;
    Ok(Json(serde_json::json!({ "cleared": true })))
}

async fn compact_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    state.index.writer().compact().map_err(error_response)?;
    Ok(Json(serde_json::json!({ "compacted": true })))
}
