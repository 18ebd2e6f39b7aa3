//! Error types and result aliases for petlens.
//!
//! This module defines the core error type [`PetlensError`] and the [`Result`] type alias
//! used throughout the crate. Each variant is one failure kind; HTTP handlers match on
//! the variant to decide what gets logged, while clients only ever see a fixed message.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PetlensError {
    #[error("Model listing unavailable: {0}")]
    ListingUnavailable(String),

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Remote call failed: {0}")]
    RemoteCall(String),

    #[error("Response normalization failed: {0}")]
    Normalization(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PetlensError {
    /// Whether the failure happened while talking to the remote model service.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            PetlensError::RemoteCall(_) | PetlensError::Http(_) | PetlensError::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PetlensError>;
