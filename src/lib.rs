//! Citation resolution for generated answers.
//!
//! Takes answer text from the answer-generation backend, normalizes its inline
//! citation markers, and produces the display-ordered citation list that the
//! chat front end renders. Also provides HTML rendering and a small HTTP
//! service around both.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod answer_parser;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod render;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/answer/parse", post(handlers::parse))
        .route("/api/answer/render", post(handlers::render))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let addr: std::net::SocketAddr = config.bind_addr.parse()?;
    let app = build_router(Arc::new(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("citation service listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// Re-export commonly used types
pub use answer_parser::{enumerate_citations, parse_answer};
pub use config::AppConfig;
pub use error::ApiError;
pub use models::{AnswerPayload, CitationRecord, ParsedAnswer};
pub use render::{citation_label, html_escape, render_answer_html};
