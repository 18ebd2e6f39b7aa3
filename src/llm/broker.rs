use crate::error::{PetlensError, Result};
use crate::image::decode_image;
use crate::llm::gateway::GenerativeGateway;
use crate::llm::models::GenerateRequest;
use crate::llm::selector::SelectedModel;
use crate::normalizer::normalize_detection;
use crate::prompts::{chat_prompt, DETECTION_PROMPT};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runs detection and chat requests against the model chosen at startup
#[derive(Clone)]
pub struct InferenceBroker {
    model: SelectedModel,
    gateway: Arc<dyn GenerativeGateway>,
}

impl InferenceBroker {
    /// Create a new broker bound to a selected model
    pub fn new(model: SelectedModel, gateway: Arc<dyn GenerativeGateway>) -> Self {
        Self { model, gateway }
    }

    pub fn model(&self) -> &SelectedModel {
        &self.model
    }

    /// Identify the animal in an uploaded image
    ///
    /// `image` is a base64 string or data URL. Returns the model's JSON verbatim once it
    /// has been checked against the detection shape.
    pub async fn detect(&self, image: &str) -> Result<Value> {
        let image = decode_image(image)?;
        debug!(mime_type = image.mime_type, bytes = image.data.len(), "Decoded upload");

        let request = GenerateRequest::text(DETECTION_PROMPT).with_image(image);
        let raw = self.gateway.generate(self.model.as_str(), &request).await?;

        let result = normalize_detection(&raw).inspect_err(|e| {
            warn!(error = %e, raw = %raw, "Unparseable detection reply");
        })?;

        info!(
            confidence = result["confidence"].as_f64().unwrap_or_default(),
            "Inference complete"
        );
        Ok(result)
    }

    /// Answer a free-text pet care question
    pub async fn chat(&self, message: &str, detected_breed: Option<&str>) -> Result<String> {
        let request = GenerateRequest::text(chat_prompt(message, detected_breed));
        let reply = self.gateway.generate(self.model.as_str(), &request).await?;

        if reply.trim().is_empty() {
            return Err(PetlensError::RemoteCall("empty chat reply".to_string()));
        }

        Ok(reply)
    }
}
