//! Gemini gateway for the Generative Language REST API.
//!
//! Covers the two calls the service needs: listing models (with pagination) and
//! `generateContent` with a text part and an optional inline image part.

use crate::error::{PetlensError, Result};
use crate::llm::gateway::GenerativeGateway;
use crate::llm::models::{GenerateRequest, ModelEntry};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_PAGE_SIZE: u32 = 50;
const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_MODEL_PAGES: usize = 20;

/// Configuration for connecting to the Gemini API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub page_size: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                .unwrap_or_default(),
            base_url: std::env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Some(DEFAULT_TIMEOUT),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelListPage {
    #[serde(default)]
    models: Vec<ModelEntry>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Gateway for the Gemini hosted model service.
pub struct GeminiGateway {
    client: Client,
    config: GeminiConfig,
}

impl GeminiGateway {
    /// Create a new Gemini gateway with custom configuration.
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        Ok(Self { client, config })
    }

    /// Create gateway with custom API key and base URL.
    pub fn with_api_key_and_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(GeminiConfig {
            api_key: api_key.into(),
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        if trimmed.starts_with("models/") || trimmed.starts_with("tunedModels/") {
            format!("{}/{}:generateContent", self.base_url(), trimmed)
        } else {
            format!("{}/models/{}:generateContent", self.base_url(), trimmed)
        }
    }

    async fn fetch_model_page(&self, page_token: Option<&str>) -> Result<ModelListPage> {
        let page_size = self.config.page_size.to_string();
        let mut request = self
            .client
            .get(format!("{}/models", self.base_url()))
            .header(API_KEY_HEADER, &self.config.api_key)
            .query(&[("pageSize", page_size.as_str())]);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PetlensError::ListingUnavailable(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(PetlensError::ListingUnavailable(format!(
                "Gemini API error: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| {
                PetlensError::ListingUnavailable(format!(
                    "Invalid response format: {}",
                    e.without_url()
                ))
            })
    }
}

#[async_trait]
impl GenerativeGateway for GeminiGateway {
    async fn list_models(&self) -> Result<Vec<ModelEntry>> {
        debug!("Fetching available Gemini models");

        let mut models = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        for _ in 0..MAX_MODEL_PAGES {
            let page = self.fetch_model_page(page_token.as_deref()).await?;
            models.extend(page.models);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) if !seen_tokens.insert(token.clone()) => {
                    return Err(PetlensError::ListingUnavailable(format!(
                        "page token {:?} repeated",
                        token
                    )));
                }
                Some(token) => page_token = Some(token),
                None => {
                    debug!(count = models.len(), "Gemini model listing complete");
                    return Ok(models);
                }
            }
        }

        Err(PetlensError::ListingUnavailable(format!(
            "listing did not finish within {} pages",
            MAX_MODEL_PAGES
        )))
    }

    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<String> {
        info!("Delegating to Gemini for content generation");
        debug!(model = model, has_image = request.image.is_some(), "Building request");

        let body = build_generate_body(request);

        let response = self
            .client
            .post(self.endpoint_for_model(model))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(status = %status, "Gemini generateContent rejected request");
            return Err(PetlensError::RemoteCall(format!(
                "Gemini API error: {}: {}",
                status,
                api_error_message(&detail)
            )));
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        let payload: Value = serde_json::from_str(&body)?;
        extract_text(&payload)
    }
}

fn build_generate_body(request: &GenerateRequest) -> Value {
    let mut parts = vec![json!({ "text": request.prompt })];

    if let Some(image) = &request.image {
        parts.push(json!({
            "inlineData": {
                "mimeType": image.mime_type,
                "data": image.to_base64(),
            }
        }));
    }

    json!({
        "contents": [{
            "role": "user",
            "parts": parts,
        }]
    })
}

/// Pull the human-readable message out of a Gemini error body, if there is one.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

/// Concatenate the text parts of the first candidate.
fn extract_text(payload: &Value) -> Result<String> {
    let candidate = match payload["candidates"].as_array().and_then(|c| c.first()) {
        Some(candidate) => candidate,
        None => {
            let reason = payload["promptFeedback"]["blockReason"]
                .as_str()
                .map(|r| format!("prompt blocked: {}", r))
                .unwrap_or_else(|| "no candidates in response".to_string());
            return Err(PetlensError::RemoteCall(reason));
        }
    };

    let text: String = candidate["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate["finishReason"].as_str().unwrap_or("UNKNOWN");
        return Err(PetlensError::RemoteCall(format!(
            "candidate has no text (finish reason: {})",
            reason
        )));
    }

    Ok(text)
}
