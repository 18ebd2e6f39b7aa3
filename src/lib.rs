pub mod config;
pub mod detection;
pub mod error;
pub mod image;
pub mod llm;
pub mod normalizer;
pub mod prompts;
pub mod routes;
pub mod server;

pub use error::{PetlensError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{AppConfig, ServerConfig};
    pub use crate::error::{PetlensError, Result};
    pub use crate::llm::gateways::GeminiGateway;
    pub use crate::llm::{
        GenerateRequest, GenerativeGateway, InferenceBroker, ModelEntry, ModelPreferences,
        SelectedModel,
    };
    pub use crate::server::AppState;
}
