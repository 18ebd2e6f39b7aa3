pub mod broker;
pub mod gateway;
pub mod gateways;
pub mod models;
pub mod selector;

pub use broker::InferenceBroker;
pub use gateway::GenerativeGateway;
pub use models::{GenerateRequest, ModelEntry};
pub use selector::{select_model, ModelPreferences, SelectedModel};
