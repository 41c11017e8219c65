//! HTTP surface: upload a PDF, get tables back.
//!
//! A thin layer over [`crate::extract`] — route wiring, multipart upload
//! handling, and status-code mapping live here; nothing in this module makes
//! extraction decisions. Uploads are buffered to a managed temp file inside
//! the extraction entry points and removed when the request completes.
//!
//! ## Endpoints
//!
//! | Method | Path              | Purpose                                   |
//! |--------|-------------------|-------------------------------------------|
//! | GET    | `/health`         | Liveness probe                            |
//! | POST   | `/debug/pdf-text` | Page count + text sample of page 1        |
//! | POST   | `/extract/tables` | Hybrid extraction; `?pages=` selector     |
//!
//! Both POST endpoints take a multipart form with the PDF in a `file` field.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::extract::{extract_tables_from_bytes, inspect_bytes};
use crate::output::{DocumentSummary, ExtractionOutput};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Uploads above this size are rejected outright. Scanned report PDFs run
/// tens of megabytes; the axum default of 2 MB is far too small.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Server state shared across handlers.
#[derive(Clone)]
pub struct ApiState {
    /// Base configuration; the `pages` selector is overridden per request
    /// by the query parameter.
    pub config: Arc<ExtractionConfig>,
}

impl ApiState {
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for ApiState {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

/// Build the router with all endpoints.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/debug/pdf-text", post(debug_pdf_text))
        .route("/extract/tables", post(extract_pdf_tables))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn start_server(addr: &str, state: ApiState) -> Result<(), std::io::Error> {
    info!("Starting jadwal server on {}", addr);
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

// ── Request/response shapes ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Deserialize)]
struct ExtractParams {
    /// Page selector; defaults to the configured selector (normally `"1"`).
    pages: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn debug_pdf_text(
    State(state): State<ApiState>,
    multipart: Multipart,
) -> Result<Json<DocumentSummary>, (StatusCode, String)> {
    let pdf = read_pdf_field(multipart).await?;
    let summary = inspect_bytes(&pdf, &state.config)
        .await
        .map_err(error_response)?;
    Ok(Json(summary))
}

async fn extract_pdf_tables(
    State(state): State<ApiState>,
    Query(params): Query<ExtractParams>,
    multipart: Multipart,
) -> Result<Json<ExtractionOutput>, (StatusCode, String)> {
    let pdf = read_pdf_field(multipart).await?;

    let mut config = (*state.config).clone();
    if let Some(pages) = params.pages {
        config.pages = pages;
    }
    info!(
        "extract request: {} bytes, pages '{}'",
        pdf.len(),
        config.pages
    );

    let output = extract_tables_from_bytes(&pdf, &config)
        .await
        .map_err(error_response)?;
    Ok(Json(output))
}

// ── Helpers ──────────────────────────────────────────────────────────────

/// Pull the uploaded PDF out of the multipart form's `file` field.
async fn read_pdf_field(mut multipart: Multipart) -> Result<Vec<u8>, (StatusCode, String)> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("malformed multipart body: {e}"),
        )
    })? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("failed to read upload: {e}"),
                )
            })?;
            if bytes.is_empty() {
                return Err((StatusCode::BAD_REQUEST, "uploaded file is empty".into()));
            }
            return Ok(bytes.to_vec());
        }
    }
    Err((
        StatusCode::BAD_REQUEST,
        "multipart form must contain a 'file' field".into(),
    ))
}

/// Map library errors to HTTP responses: caller mistakes are 400s, engine
/// trouble is a 500.
fn error_response(err: ExtractError) -> (StatusCode, String) {
    let status = match err {
        ExtractError::InvalidPageSelector { .. }
        | ExtractError::InvalidRange { .. }
        | ExtractError::PageOutOfBounds { .. }
        | ExtractError::FileNotFound { .. }
        | ExtractError::PermissionDenied { .. }
        | ExtractError::InvalidInput { .. }
        | ExtractError::DownloadFailed { .. }
        | ExtractError::DownloadTimeout { .. }
        | ExtractError::NotAPdf { .. }
        | ExtractError::CorruptPdf { .. }
        | ExtractError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
        ExtractError::PdfiumBindingFailed(_) | ExtractError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string())
}
