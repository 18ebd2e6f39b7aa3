//! Process configuration read from environment variables.
//!
//! The binary loads a `.env` file first, so every variable below can also live there.

use crate::error::{PetlensError, Result};
use crate::llm::gateways::gemini::{
    GeminiConfig, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT,
};
use crate::llm::selector::ModelPreferences;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub max_body_bytes: usize,
}

/// Everything the binary needs to start
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub server: ServerConfig,
    pub preferences: ModelPreferences,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("GEMINI_API_KEY").or_else(|| get("GOOGLE_API_KEY")).ok_or_else(|| {
            PetlensError::Config("GEMINI_API_KEY (or GOOGLE_API_KEY) must be set".to_string())
        })?;

        let timeout = match get("GEMINI_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse("GEMINI_TIMEOUT_SECS", &raw)?),
            None => DEFAULT_TIMEOUT,
        };

        let gemini = GeminiConfig {
            api_key,
            base_url: get("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Some(timeout),
            page_size: DEFAULT_PAGE_SIZE,
        };

        let bind = parse(
            "PETLENS_BIND",
            &get("PETLENS_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
        )?;
        let max_body_bytes = match get("PETLENS_MAX_BODY_BYTES") {
            Some(raw) => parse("PETLENS_MAX_BODY_BYTES", &raw)?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        let mut preferences = ModelPreferences::default();
        if let Some(raw) = get("PETLENS_PREFERRED_MODELS") {
            preferences.preferred = raw
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(Self {
            gemini,
            server: ServerConfig {
                bind,
                max_body_bytes,
            },
            preferences,
        })
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| PetlensError::Config(format!("{} has invalid value {:?}: {}", key, raw, e)))
}
