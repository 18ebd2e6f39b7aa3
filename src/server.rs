//! HTTP server for petlens

use crate::config::ServerConfig;
use crate::error::Result;
use crate::llm::InferenceBroker;
use crate::routes;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub broker: InferenceBroker,
}

impl AppState {
    pub fn new(broker: InferenceBroker) -> Self {
        Self { broker }
    }
}

/// Build the application router
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .merge(routes::page_routes())
        .merge(routes::api_routes())
        .with_state(Arc::new(state))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until the process is stopped
pub async fn run(config: &ServerConfig, state: AppState) -> Result<()> {
    let model = state.broker.model().clone();
    let app = router(state, config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(model = %model, "Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
