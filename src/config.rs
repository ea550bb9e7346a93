//! Client configuration
//!
//! A [`ClientConfig`] describes where the server lives, how to authenticate
//! and how the transport behaves. It is usually loaded from a YAML (or JSON)
//! file:
//!
//! ```yaml
//! base_url: https://docs.example.com/api
//! page_size: 100
//! auth:
//!   type: session_token
//!   login_url: https://docs.example.com/api/login
//!   login_body:
//!     username: alice
//!     password: secret
//!   token_path: $.ticket
//!   token_header: X-Auth-Ticket
//! http:
//!   timeout_secs: 10
//!   max_retries: 5
//! ```
//!
//! Environment variables override file values, see [`ClientConfig::apply_env`].

use crate::auth::{AuthConfig, Location};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, Method};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Server URL override
pub const ENV_URL: &str = "DOCSTORE_URL";
/// Bearer token; switches auth to `bearer`
pub const ENV_TOKEN: &str = "DOCSTORE_TOKEN";
/// Basic auth user; needs [`ENV_PASSWORD`] as well
pub const ENV_USERNAME: &str = "DOCSTORE_USERNAME";
pub const ENV_PASSWORD: &str = "DOCSTORE_PASSWORD";

const MAX_RETRIES_LIMIT: u32 = 10;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root, e.g. `https://docs.example.com/api`
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub auth: AuthDefinition,

    #[serde(default)]
    pub http: HttpDefinition,

    /// Page size sent with search requests; server default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

// ============================================================================
// Auth Definition
// ============================================================================

/// Authentication as written in a config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthDefinition {
    #[default]
    None,

    ApiKey {
        /// Header or query parameter name
        #[serde(default = "default_api_key_name")]
        name: String,
        value: String,
        #[serde(default)]
        location: Location,
        #[serde(default)]
        prefix: Option<String>,
    },

    Bearer {
        token: String,
    },

    Basic {
        username: String,
        password: String,
    },

    /// Login endpoint returning a ticket that is sent on every request
    SessionToken {
        login_url: String,
        #[serde(default = "default_login_method")]
        login_method: Method,
        #[serde(default)]
        login_body: HashMap<String, String>,
        /// Path to the ticket in the login response
        #[serde(default = "default_token_path")]
        token_path: String,
        #[serde(default = "default_token_header")]
        token_header: String,
        #[serde(default)]
        token_prefix: Option<String>,
        #[serde(default)]
        expires_in_path: Option<String>,
    },

    Oauth2ClientCredentials {
        token_url: String,
        client_id: String,
        client_secret: String,
        #[serde(default)]
        scopes: Vec<String>,
    },

    CustomHeaders {
        headers: HashMap<String, String>,
    },
}

/// Blank strings in config files and env vars count as unset
fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn default_api_key_name() -> String {
    "X-API-Key".to_string()
}

fn default_login_method() -> Method {
    Method::POST
}

fn default_token_path() -> String {
    "$.token".to_string()
}

fn default_token_header() -> String {
    "Authorization".to_string()
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// Transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpDefinition {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default)]
    pub backoff: BackoffType,

    /// Client-side throttle; unlimited when unset
    #[serde(default)]
    pub rate_limit_rps: Option<u32>,

    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers added to every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            rate_limit_rps: None,
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

// ============================================================================
// Loading
// ============================================================================

impl ClientConfig {
    /// Config with only a server URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Load a YAML or JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        content.parse()
    }

    /// Override file values from `DOCSTORE_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Same as [`apply_env`](Self::apply_env) with a custom variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| non_empty(&lookup(key));

        if let Some(url) = var(ENV_URL) {
            self.base_url = url;
        }

        if let Some(token) = var(ENV_TOKEN) {
            self.auth = AuthDefinition::Bearer { token };
        } else if let (Some(username), Some(password)) = (var(ENV_USERNAME), var(ENV_PASSWORD)) {
            self.auth = AuthDefinition::Basic { username, password };
        }
    }

    /// Check the config for values the client cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::missing_field("base_url"));
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", format!("{}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.page_size == Some(0) {
            return Err(Error::invalid_value("page_size", "must be greater than 0"));
        }

        if self.http.max_retries > MAX_RETRIES_LIMIT {
            return Err(Error::invalid_value(
                "http.max_retries",
                format!("must be at most {MAX_RETRIES_LIMIT}"),
            ));
        }

        Ok(())
    }

    /// Transport settings for [`HttpClient`](crate::http::HttpClient)
    pub fn to_http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(100),
                Duration::from_secs(60),
            );

        if let Some(rps) = self.http.rate_limit_rps {
            builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
        }
        if let Some(agent) = non_empty(&self.http.user_agent) {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.http.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }

    /// Runtime credentials for [`Authenticator`](crate::auth::Authenticator)
    pub fn to_auth_config(&self) -> Result<AuthConfig> {
        let auth = match &self.auth {
            AuthDefinition::None => AuthConfig::None,
            AuthDefinition::ApiKey {
                name,
                value,
                location,
                prefix,
            } => {
                if value.is_empty() {
                    return Err(Error::missing_field("auth.value"));
                }
                AuthConfig::ApiKey {
                    location: *location,
                    name: name.clone(),
                    prefix: non_empty(prefix),
                    value: value.clone(),
                }
            }
            AuthDefinition::Bearer { token } => {
                if token.is_empty() {
                    return Err(Error::missing_field("auth.token"));
                }
                AuthConfig::Bearer {
                    token: token.clone(),
                }
            }
            AuthDefinition::Basic { username, password } => AuthConfig::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            AuthDefinition::SessionToken {
                login_url,
                login_method,
                login_body,
                token_path,
                token_header,
                token_prefix,
                expires_in_path,
            } => {
                Url::parse(login_url).map_err(|e| {
                    Error::invalid_value("auth.login_url", format!("{login_url}: {e}"))
                })?;
                AuthConfig::Session {
                    login_url: login_url.clone(),
                    login_method: (*login_method).into(),
                    login_body: login_body.clone(),
                    token_path: token_path.clone(),
                    token_header: token_header.clone(),
                    token_prefix: non_empty(token_prefix),
                    expires_in_path: non_empty(expires_in_path),
                }
            }
            AuthDefinition::Oauth2ClientCredentials {
                token_url,
                client_id,
                client_secret,
                scopes,
            } => {
                Url::parse(token_url).map_err(|e| {
                    Error::invalid_value("auth.token_url", format!("{token_url}: {e}"))
                })?;
                AuthConfig::Oauth2ClientCredentials {
                    token_url: token_url.clone(),
                    client_id: client_id.clone(),
                    client_secret: client_secret.clone(),
                    scopes: scopes.clone(),
                }
            }
            AuthDefinition::CustomHeaders { headers } => AuthConfig::CustomHeaders {
                headers: headers.clone(),
            },
        };
        Ok(auth)
    }
}

impl FromStr for ClientConfig {
    type Err = Error;

    /// Parse YAML (JSON is accepted too)
    fn from_str(s: &str) -> Result<Self> {
        let config: ClientConfig = serde_yaml::from_str(s)?;
        Ok(config)
    }
}
