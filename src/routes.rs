//! API routes
//!
//! Clients only ever see the two fixed failure messages below; the real cause of a
//! failure is logged here and nowhere else.

use crate::error::PetlensError;
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

type AppStateArc = Arc<AppState>;

pub const DETECT_FAILURE: &str = "Internal Model Error: Inference failed during forward pass.";
pub const CHAT_FAILURE: &str = "Chatbot model unavailable.";

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub detected_breed: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub success: bool,
    pub response: String,
}

/// Fixed-message failure body
#[derive(Debug, Serialize)]
pub struct ApiFailure {
    pub success: bool,
    pub error: &'static str,
}

impl ApiFailure {
    fn new(error: &'static str) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

// ============================================================================
// Page Routes
// ============================================================================

pub fn page_routes() -> Router<AppStateArc> {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// ============================================================================
// API Routes
// ============================================================================

pub fn api_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/detect", post(detect))
        .route("/api/chatbot", post(chatbot))
}

async fn detect(
    State(state): State<AppStateArc>,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();

    async move {
        let Json(req) = match payload {
            Ok(payload) => payload,
            Err(rejection) => {
                warn!(error = %rejection.body_text(), "Rejected detect request body");
                return ApiFailure::new(DETECT_FAILURE).into_response();
            }
        };

        info!(bytes = req.image.len(), "Running detection");

        match state.broker.detect(&req.image).await {
            Ok(result) => Json(result).into_response(),
            Err(e) => {
                log_failure("detect", &e);
                ApiFailure::new(DETECT_FAILURE).into_response()
            }
        }
    }
    .instrument(info_span!("detect", %request_id))
    .await
}

async fn chatbot(
    State(state): State<AppStateArc>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();

    async move {
        let Json(req) = match payload {
            Ok(payload) => payload,
            Err(rejection) => {
                warn!(error = %rejection.body_text(), "Rejected chatbot request body");
                return ApiFailure::new(CHAT_FAILURE).into_response();
            }
        };

        match state.broker.chat(&req.message, req.detected_breed.as_deref()).await {
            Ok(response) => Json(ChatReply {
                success: true,
                response,
            })
            .into_response(),
            Err(e) => {
                log_failure("chatbot", &e);
                ApiFailure::new(CHAT_FAILURE).into_response()
            }
        }
    }
    .instrument(info_span!("chatbot", %request_id))
    .await
}

fn log_failure(route: &str, err: &PetlensError) {
    match err {
        PetlensError::Decode(_) => warn!(route, error = %err, "Bad upload"),
        PetlensError::Normalization(_) => error!(route, error = %err, "Model reply was not usable JSON"),
        e if e.is_remote() => error!(route, error = %err, "Remote model call failed"),
        _ => error!(route, error = %err, "Request failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_failure_body() {
        let body = serde_json::to_value(ApiFailure::new(DETECT_FAILURE)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "error": "Internal Model Error: Inference failed during forward pass."
            })
        );
    }

    #[test]
    fn test_api_failure_status() {
        let response = ApiFailure::new(CHAT_FAILURE).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_chat_request_defaults() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.message, "");
        assert!(req.detected_breed.is_none());
    }
}
