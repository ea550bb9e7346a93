//! Credential settings
//!
//! [`AuthConfig`] is the runtime form of the `auth:` section of a
//! [`ClientConfig`](crate::config::ClientConfig); it can also be built by hand.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tokens this close to expiry are treated as already expired
const EXPIRY_MARGIN_SECS: i64 = 30;

/// Where an API key travels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    #[default]
    Header,
    Query,
}

/// How requests to the docstore server are authenticated
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    #[default]
    None,

    /// Static key sent as a header or query parameter
    ApiKey {
        location: Location,
        name: String,
        /// Prepended to the key, e.g. `"Token "`
        prefix: Option<String>,
        value: String,
    },

    Basic { username: String, password: String },

    Bearer { token: String },

    /// Bearer token issued by an OAuth2 token endpoint
    Oauth2ClientCredentials {
        token_url: String,
        client_id: String,
        client_secret: String,
        scopes: Vec<String>,
    },

    /// Ticket obtained by logging in, sent in `token_header`
    Session {
        login_url: String,
        login_method: reqwest::Method,
        login_body: HashMap<String, String>,
        /// Dotted path to the ticket in the login response, e.g. `$.ticket`
        token_path: String,
        token_header: String,
        token_prefix: Option<String>,
        /// Dotted path to the ticket lifetime in seconds
        expires_in_path: Option<String>,
    },

    CustomHeaders { headers: HashMap<String, String> },
}

impl AuthConfig {
    /// Schemes whose token is fetched from the server and kept until it expires
    pub fn uses_token_cache(&self) -> bool {
        matches!(self, Self::Oauth2ClientCredentials { .. } | Self::Session { .. })
    }
}

/// A token handed out by the server
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub value: String,
    /// `None` when the server did not report a lifetime
    pub expires_at: Option<DateTime<Utc>>,
}

impl IssuedToken {
    /// Token issued now, valid for `lifetime_secs` if given
    pub fn issued(value: impl Into<String>, lifetime_secs: Option<i64>) -> Self {
        Self {
            value: value.into(),
            expires_at: lifetime_secs.map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.expires_at
            .map_or(true, |at| Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) < at)
    }
}
