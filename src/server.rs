//! HTTP surface
//!
//! A small axum router: `POST /query` runs the pipeline and always answers
//! with HTTP 200 (errors travel inside the response record), and `GET /`
//! serves the bundled landing page. CORS is wide open so the page can be
//! used from anywhere, including `file://`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::error::Result;
use crate::pipeline::{QueryOutcome, QueryPipeline};

#[derive(Clone)]
struct AppState {
    pipeline: Arc<QueryPipeline>,
}

/// Body of a `POST /query` request
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// The user's question
    pub prompt: String,
}

/// Build the application router
pub fn router(pipeline: Arc<QueryPipeline>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/query", post(query_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(AppState { pipeline })
}

/// Bind and serve until the process is stopped
pub async fn serve(pipeline: Arc<QueryPipeline>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("amfiq listening on {}", addr);
    axum::serve(listener, router(pipeline)).await?;
    Ok(())
}

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Json<QueryOutcome> {
    info!("Received query: {}", request.prompt);
    Json(state.pipeline.run(&request.prompt).await)
}
