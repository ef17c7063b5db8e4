//! Application configuration loaded from environment variables.
//!
//! The Gemini API key is optional at startup. A missing key only fails
//! caption requests, so the rest of the session keeps working.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default upper bound for an uploaded image (5 MiB, decoded).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Default minimum time a caption request stays "in progress".
pub const DEFAULT_MIN_CAPTION_LATENCY_MS: u64 = 800;

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key (None disables captioning)
    pub api_key: Option<String>,
    /// Base URL of the Gemini REST API
    pub gemini_api_url: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Directory holding the persisted profile store
    pub data_dir: PathBuf,
    /// Minimum visible latency for a successful caption request
    pub min_caption_latency: Duration,
    /// Largest accepted image, in decoded bytes
    pub max_upload_bytes: usize,
    /// Whether mock sign-in flows sleep to imitate network round trips
    pub simulate_auth_latency: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_key = env::var("API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(Self {
            api_key,
            gemini_api_url: env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: parse_var("PORT", 8080)?,
            data_dir: env::var("LENSCRAFT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".lenscraft")),
            min_caption_latency: Duration::from_millis(parse_var(
                "MIN_CAPTION_LATENCY_MS",
                DEFAULT_MIN_CAPTION_LATENCY_MS,
            )?),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            simulate_auth_latency: parse_var("SIMULATE_AUTH_LATENCY", true)?,
        })
    }

    /// Config for tests: no delays, no API key, nothing touches the network.
    pub fn test_default() -> Self {
        Self {
            api_key: None,
            gemini_api_url: "http://127.0.0.1:9".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            data_dir: PathBuf::from("target/lenscraft-test"),
            min_caption_latency: Duration::ZERO,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            simulate_auth_latency: false,
        }
    }

    /// Largest request body accepted by the API.
    ///
    /// Images arrive base64-encoded (4 bytes per 3) inside a JSON envelope.
    pub fn max_request_body_bytes(&self) -> usize {
        self.max_upload_bytes / 3 * 4 + 64 * 1024
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
