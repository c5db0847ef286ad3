//! HTTP API server for integration with other systems.
//!
//! Provides REST endpoints for chunking, search, and grounded answers.

use crate::chunking::{create_chunker, ChunkingStrategy};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::{CuratorError, ErrorCategory};
use crate::orchestrator::Orchestrator;
use crate::rag::{AnswerOutcome, RagEngine};
use crate::vector_index::SearchResult;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    engine: RagEngine,
    settings: Settings,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(settings.clone())?;
    orchestrator.prepare().await?;
    let engine = orchestrator.rag_engine(None)?;

    let state = Arc::new(AppState { engine, settings });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state).layer(cors);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Curator API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Search", "POST /search");
    Output::kv("Ask (RAG)", "POST /ask");
    Output::kv("Chunk", "POST /chunk");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", post(search))
        .route("/ask", post(ask))
        .route("/chunk", post(chunk))
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
    #[serde(default = "default_top_k")]
    top_k: usize,
}

fn default_top_k() -> usize {
    5
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    outcome: AnswerOutcome,
    sources: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct ChunkRequest {
    text: String,
    #[serde(default)]
    strategy: Option<ChunkingStrategy>,
}

#[derive(Serialize)]
struct ChunkResponse {
    passages: Vec<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    hint: String,
}

/// Map an error to a status code by category.
fn error_response(e: CuratorError) -> Response {
    let status = match e.category() {
        ErrorCategory::Input => StatusCode::BAD_REQUEST,
        ErrorCategory::Auth => StatusCode::BAD_GATEWAY,
        ErrorCategory::Transient => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCategory::Permanent => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
            hint: e.user_hint().to_string(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn search(State(state): State<Arc<AppState>>, Json(req): Json<SearchRequest>) -> Response {
    match state.engine.search(&req.query, req.top_k).await {
        Ok(results) => Json(SearchResponse { results }).into_response(),
        Err(e) => error_response(e),
    }
}

async fn ask(State(state): State<Arc<AppState>>, Json(req): Json<AskRequest>) -> Response {
    match state.engine.answer(&req.question).await {
        Ok(response) => Json(AskResponse {
            answer: response.answer,
            outcome: response.outcome,
            sources: response.sources,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn chunk(State(state): State<Arc<AppState>>, Json(req): Json<ChunkRequest>) -> Response {
    let strategy = req.strategy.unwrap_or_else(|| state.settings.chunking.strategy());
    let chunker = create_chunker(strategy, state.settings.chunking.config());
    Json(ChunkResponse {
        passages: chunker.chunk(&req.text),
    })
    .into_response()
}
