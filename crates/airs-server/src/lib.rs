//! HTTP GET front-end for the AIRS resolution engine.
//!
//! Pure presentation: each handler marshals query parameters into an engine
//! call and serializes the result. The workspace root is injected at server
//! construction and held read-only for the process lifetime; handlers
//! build a fresh [`Engine`] per request, so there is no shared mutable
//! state and concurrent request handling needs no locking. Artifact I/O is
//! local file reads, treated as fast enough to run inline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;

use airs_core::engine::{Engine, LookupReport, PingReport, ResolveReport, ResolveRequest};
use airs_core::{CatalogQuery, CatalogReport, ResolveError};

/// Process-wide immutable state: the workspace root.
///
/// Set once before serving, never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    root: Arc<PathBuf>,
}

impl AppState {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AppState {
            root: Arc::new(root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn engine(&self) -> Engine {
        Engine::new(self.root.as_path())
    }
}

/// Engine failure rendered as HTTP 500 with the engine's classification
/// string preserved in the body.
struct ApiError(ResolveError);

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(kind = self.0.kind(), "request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogParams {
    facet: Option<String>,
    grep: Option<String>,
    client: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LookupParams {
    term: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResolveParams {
    intent: Option<String>,
    term: Option<String>,
    client: Option<String>,
}

async fn ping(State(state): State<AppState>) -> Json<PingReport> {
    Json(state.engine().ping())
}

async fn catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> Json<CatalogReport> {
    let query = CatalogQuery {
        facet: params.facet,
        grep: params.grep,
        client: params.client,
    };
    Json(state.engine().catalog(&query))
}

async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Json<LookupReport> {
    Json(state.engine().lookup(params.term.as_deref().unwrap_or_default()))
}

async fn resolve(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<ResolveReport>, ApiError> {
    let request = ResolveRequest {
        intent: params.intent,
        term: params.term,
        client: params.client,
    };
    Ok(Json(state.engine().resolve(&request)?))
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "not_found" })),
    )
        .into_response()
}

/// Build the GET router over `state`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/catalog", get(catalog))
        .route("/lookup", get(lookup))
        .route("/resolve", get(resolve))
        .fallback(not_found)
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(root: impl Into<PathBuf>, port: u16) -> std::io::Result<()> {
    let state = AppState::new(root);
    let app = create_router(state.clone());

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, root = %state.root().display(), "airs front-end listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("airs front-end shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("ctrl-c handler unavailable, serving until killed");
        std::future::pending::<()>().await;
    }
}
