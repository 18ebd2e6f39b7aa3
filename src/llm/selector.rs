//! Startup model discovery.
//!
//! The catalog is queried once; the first preferred model that supports content
//! generation wins, then the first capable model in catalog order, then a fixed
//! fallback. Discovery never fails: an unreachable catalog resolves to the fallback.

use crate::llm::gateway::GenerativeGateway;
use crate::llm::models::ModelEntry;
use std::fmt;
use tracing::{info, warn};

/// Generation method a model must advertise to be usable.
pub const GENERATE_CONTENT: &str = "generateContent";

/// Model used when the catalog cannot be listed or has nothing usable.
pub const FALLBACK_MODEL: &str = "models/gemini-pro-vision";

/// Built-in preference order, fastest vision-capable models first.
pub const PREFERRED_MODELS: &[&str] = &[
    "models/gemini-1.5-flash",
    "models/gemini-1.5-flash-001",
    "models/gemini-1.5-flash-latest",
    "models/gemini-1.5-pro",
    "models/gemini-pro-vision",
    "models/gemini-1.0-pro-vision-latest",
];

/// The model name chosen at startup. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedModel(String);

impl SelectedModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick a model name from the catalog.
///
/// Only entries advertising `required_capability` are considered. The earliest
/// entry of `preference_order` present among them wins; otherwise the first
/// capable entry in catalog order; otherwise `fallback`.
pub fn select_model<S: AsRef<str>>(
    catalog: &[ModelEntry],
    preference_order: &[S],
    required_capability: &str,
    fallback: &str,
) -> String {
    let capable: Vec<&str> = catalog
        .iter()
        .filter(|entry| entry.supports(required_capability))
        .map(|entry| entry.name.as_str())
        .collect();

    preference_order
        .iter()
        .map(|preferred| preferred.as_ref())
        .find(|preferred| capable.contains(preferred))
        .or_else(|| capable.first().copied())
        .unwrap_or(fallback)
        .to_string()
}

/// Selection policy: preferences, required capability and fallback name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPreferences {
    pub preferred: Vec<String>,
    pub required_capability: String,
    pub fallback: String,
}

impl Default for ModelPreferences {
    fn default() -> Self {
        Self {
            preferred: PREFERRED_MODELS.iter().map(|m| m.to_string()).collect(),
            required_capability: GENERATE_CONTENT.to_string(),
            fallback: FALLBACK_MODEL.to_string(),
        }
    }
}

impl ModelPreferences {
    /// Apply this policy to an already-fetched catalog
    pub fn select(&self, catalog: &[ModelEntry]) -> SelectedModel {
        SelectedModel::new(select_model(
            catalog,
            self.preferred.as_slice(),
            &self.required_capability,
            &self.fallback,
        ))
    }

    /// List the gateway's models and select one, falling back on any listing failure
    pub async fn discover(&self, gateway: &dyn GenerativeGateway) -> SelectedModel {
        info!("Discovering available models");

        let selected = match gateway.list_models().await {
            Ok(catalog) => {
                let selected = self.select(&catalog);
                if catalog.iter().all(|m| !m.supports(&self.required_capability)) {
                    warn!(
                        listed = catalog.len(),
                        fallback = %selected,
                        "No listed model supports {}, using fallback",
                        self.required_capability
                    );
                }
                selected
            }
            Err(e) => {
                warn!(error = %e, fallback = %self.fallback, "Model auto-detect failed, using fallback");
                SelectedModel::new(self.fallback.clone())
            }
        };

        info!(model = %selected, "Model selected");
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PetlensError, Result};
    use crate::llm::models::GenerateRequest;

    struct CatalogGateway {
        catalog: Option<Vec<ModelEntry>>,
    }

    #[async_trait::async_trait]
    impl GenerativeGateway for CatalogGateway {
        async fn list_models(&self) -> Result<Vec<ModelEntry>> {
            self.catalog
                .clone()
                .ok_or_else(|| PetlensError::ListingUnavailable("connection refused".to_string()))
        }

        async fn generate(&self, _model: &str, _request: &GenerateRequest) -> Result<String> {
            Ok(String::new())
        }
    }

    fn catalog() -> Vec<ModelEntry> {
        vec![
            ModelEntry::new("A", &["embedContent"]),
            ModelEntry::new("B", &[GENERATE_CONTENT]),
            ModelEntry::new("C", &[GENERATE_CONTENT, "countTokens"]),
        ]
    }

    #[test]
    fn test_earliest_preference_wins() {
        let selected = select_model(&catalog(), &["C", "B"], GENERATE_CONTENT, "fallback");
        assert_eq!(selected, "C");
    }

    #[test]
    fn test_preference_without_capability_is_skipped() {
        let selected = select_model(&catalog(), &["A", "B"], GENERATE_CONTENT, "fallback");
        assert_eq!(selected, "B");
    }

    #[test]
    fn test_first_capable_in_catalog_order_when_no_preference_matches() {
        let selected = select_model(&catalog(), &["Z"], GENERATE_CONTENT, "fallback");
        assert_eq!(selected, "B");
    }

    #[test]
    fn test_empty_preferences_take_first_capable() {
        let selected = select_model::<&str>(&catalog(), &[], GENERATE_CONTENT, "fallback");
        assert_eq!(selected, "B");
    }

    #[test]
    fn test_no_capable_models_returns_fallback() {
        let catalog = vec![ModelEntry::new("A", &["embedContent"])];
        let selected = select_model(&catalog, &["A"], GENERATE_CONTENT, "fallback");
        assert_eq!(selected, "fallback");
    }

    #[test]
    fn test_empty_catalog_returns_fallback() {
        let selected = select_model(&[], &["C", "B"], GENERATE_CONTENT, "fallback");
        assert_eq!(selected, "fallback");
    }

    #[test]
    fn test_default_preferences_pick_flash() {
        let catalog = vec![
            ModelEntry::new("models/gemini-1.5-pro", &[GENERATE_CONTENT]),
            ModelEntry::new("models/gemini-1.5-flash-latest", &[GENERATE_CONTENT]),
        ];

        let selected = ModelPreferences::default().select(&catalog);

        assert_eq!(selected.as_str(), "models/gemini-1.5-flash-latest");
    }

    #[tokio::test]
    async fn test_discover_uses_catalog() {
        let gateway = CatalogGateway {
            catalog: Some(catalog()),
        };
        let preferences = ModelPreferences {
            preferred: vec!["C".to_string()],
            ..Default::default()
        };

        let selected = preferences.discover(&gateway).await;

        assert_eq!(selected, SelectedModel::new("C"));
    }

    #[tokio::test]
    async fn test_discover_listing_failure_returns_fallback() {
        let gateway = CatalogGateway { catalog: None };

        let selected = ModelPreferences::default().discover(&gateway).await;

        assert_eq!(selected.as_str(), FALLBACK_MODEL);
    }

    #[tokio::test]
    async fn test_discover_empty_catalog_returns_fallback() {
        let gateway = CatalogGateway {
            catalog: Some(vec![]),
        };

        let selected = ModelPreferences::default().discover(&gateway).await;

        assert_eq!(selected.as_str(), FALLBACK_MODEL);
    }

    #[test]
    fn test_selected_model_display() {
        let model = SelectedModel::new("models/gemini-1.5-flash");
        assert_eq!(model.to_string(), "models/gemini-1.5-flash");
    }
}
