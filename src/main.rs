//! petlens server
//!
//! Picks a model at startup, then serves the landing page, `/api/detect` and `/api/chatbot`.
//!
//! # Usage
//! ```bash
//! GEMINI_API_KEY=... cargo run
//! ```

use anyhow::Context;
use petlens::prelude::*;
use petlens::server;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("petlens=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("loading configuration")?;

    let gateway = Arc::new(
        GeminiGateway::with_config(config.gemini.clone()).context("building Gemini client")?,
    );
    let model = config.preferences.discover(gateway.as_ref()).await;

    let broker = InferenceBroker::new(model, gateway);
    server::run(&config.server, AppState::new(broker))
        .await
        .with_context(|| format!("serving on {}", config.server.bind))?;

    Ok(())
}
