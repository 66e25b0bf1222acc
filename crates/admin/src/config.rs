//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `RUTA_SEGURA_API_URL` - Backend API base URL (default: `http://localhost:8000`)
//! - `RUTA_SEGURA_SESSION_FILE` - Where the session is persisted
//!   (default: `.ruta-segura-session.json`)
//! - `RUTA_SEGURA_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30, max: 300)
//! - `RUTA_SEGURA_LOG_FORMAT` - `text` or `json` (default: `text`)
//! - `RUST_LOG` - Tracing filter, read by the CLI

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_SESSION_FILE: &str = ".ruta-segura-session.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TIMEOUT_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Output format for tracing logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Backend API base URL (no trailing slash required)
    pub api_base_url: Url,
    /// File holding the persisted token and identity
    pub session_file: PathBuf,
    /// Timeout applied to every outbound request
    pub http_timeout: Duration,
    /// Log output format
    pub log_format: LogFormat,
}

impl AdminConfig {
    /// Configuration pointing at `api_base_url` with defaults for the rest.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL is not http(s).
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_api_url(api_base_url)?,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_format: LogFormat::Text,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let api_base_url = parse_api_url(&get_or_default("RUTA_SEGURA_API_URL", DEFAULT_API_URL))?;
        let session_file = PathBuf::from(get_or_default("RUTA_SEGURA_SESSION_FILE", DEFAULT_SESSION_FILE));

        let timeout_secs = get_or_default(
            "RUTA_SEGURA_HTTP_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .trim()
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("RUTA_SEGURA_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        if timeout_secs == 0 || timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidEnvVar(
                "RUTA_SEGURA_HTTP_TIMEOUT_SECS".to_string(),
                format!("must be between 1 and {MAX_TIMEOUT_SECS} (got {timeout_secs})"),
            ));
        }

        let log_format = match get_or_default("RUTA_SEGURA_LOG_FORMAT", "text")
            .to_ascii_lowercase()
            .as_str()
        {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "RUTA_SEGURA_LOG_FORMAT".to_string(),
                    format!("expected text or json (got {other})"),
                ));
            }
        };

        Ok(Self {
            api_base_url,
            session_file,
            http_timeout: Duration::from_secs(timeout_secs),
            log_format,
        })
    }

    /// Override the session file location.
    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }
}

/// Parse and normalize the backend base URL.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("RUTA_SEGURA_API_URL".to_string(), msg);

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }

    // Url::join replaces the last segment unless the path ends with a slash
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
