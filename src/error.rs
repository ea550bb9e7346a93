//! Error types for the docstore client
//!
//! Every fallible operation returns [`Result`]. Server-side failures keep
//! the HTTP status so callers can branch on it with [`Error::status`],
//! [`Error::is_not_found`] and friends; the aggregator hands these errors
//! back unchanged.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// The main error type for the docstore client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Credentials
    // ============================================================================
    /// Login or token extraction failed before the request was sent
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("OAuth2 token request failed: {message}")]
    OAuth2 { message: String },

    // ============================================================================
    // Transport
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Still throttled after the last retry
    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    // ============================================================================
    // Server responses
    // ============================================================================
    /// Failure reported in the server's JSON error body
    #[error("Server error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// Non-success response without a recognisable error body
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Success response whose body does not match the expected shape
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Other
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Server-reported failure without an error code
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Decode a non-success response body.
    ///
    /// The server answers failures with `{"message": "...", "code": "..."}`
    /// (or `{"error": "..."}`); anything else is kept verbatim as the body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
            return Self::http_status(status, body);
        };

        let Some(message) = ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
        else {
            return Self::http_status(status, body);
        };

        let code = match map.get("code") {
            Some(Value::String(code)) => Some(code.clone()),
            Some(Value::Number(code)) => Some(code.to_string()),
            _ => None,
        };

        Self::Api {
            status,
            message: message.to_string(),
            code,
        }
    }

    /// HTTP status the server answered with, if the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::HttpStatus { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(StatusCode::TOO_MANY_REQUESTS.as_u16()),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    /// Credentials missing, rejected or insufficient
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::OAuth2 { .. })
            || matches!(self.status(), Some(401 | 403))
    }

    /// Whether sending the same request later might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout { .. } | Self::RateLimited { .. } => true,
            Self::Api { status, .. } | Self::HttpStatus { status, .. } => {
                StatusCode::from_u16(*status).is_ok_and(crate::http::is_transient)
            }
            _ => false,
        }
    }
}

/// Result type alias for the docstore client
pub type Result<T> = std::result::Result<T, Error>;

/// Prefix an error with what was being attempted
pub trait ResultExt<T> {
    fn context(self, message: impl Into<String>) -> Result<T>;

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.with_context(|| message.into())
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Other(format!("{}: {}", f(), e.into())))
    }
}
