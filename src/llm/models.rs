use crate::image::ImageBytes;
use serde::{Deserialize, Serialize};

/// One entry of the remote model catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    pub name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ModelEntry {
    /// Create a catalog entry
    pub fn new(name: impl Into<String>, methods: &[&str]) -> Self {
        Self {
            name: name.into(),
            supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
            display_name: None,
        }
    }

    /// Whether this model advertises the given generation method
    pub fn supports(&self, method: &str) -> bool {
        self.supported_generation_methods.iter().any(|m| m == method)
    }
}

/// Input to a single generate-content call
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub image: Option<ImageBytes>,
}

impl GenerateRequest {
    /// Create a text-only request
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
        }
    }

    /// Attach an image to this request
    pub fn with_image(mut self, image: ImageBytes) -> Self {
        self.image = Some(image);
        self
    }
}
