//! Citation service - HTTP front for the answer citation engine.
//!
//! Routes:
//!
//! - `GET /health`
//! - `POST /api/answer/parse`: resolve citations, returns JSON
//! - `POST /api/answer/render`: resolve citations, returns an HTML fragment

use answer_citations::{run_server, AppConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    tracing::info!(label_max_len = config.label_max_len, "starting citation service");

    run_server(config).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
