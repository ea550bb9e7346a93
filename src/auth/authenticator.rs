//! Attaches credentials to outgoing requests

use super::types::{AuthConfig, IssuedToken, Location};
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

/// Applies one [`AuthConfig`] to every request and owns its token cache
pub struct Authenticator {
    config: AuthConfig,
    /// Used for login and token requests only
    client: Client,
    token: RwLock<Option<IssuedToken>>,
}

impl Authenticator {
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: AuthConfig, client: Client) -> Self {
        Self {
            config,
            client,
            token: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Add credentials to `request`, logging in first if no usable token is cached
    pub async fn apply(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let request = match &self.config {
            AuthConfig::None => request,
            AuthConfig::ApiKey {
                location,
                name,
                prefix,
                value,
            } => {
                let value = prefixed(prefix.as_deref(), value);
                match location {
                    Location::Header => request.header(name.as_str(), value),
                    Location::Query => request.query(&[(name.as_str(), value)]),
                }
            }
            AuthConfig::Basic { username, password } => request.basic_auth(username, Some(password)),
            AuthConfig::Bearer { token } => request.bearer_auth(token),
            AuthConfig::Oauth2ClientCredentials { .. } => request.bearer_auth(self.token().await?),
            AuthConfig::Session {
                token_header,
                token_prefix,
                ..
            } => {
                let ticket = self.token().await?;
                request.header(token_header.as_str(), prefixed(token_prefix.as_deref(), &ticket))
            }
            AuthConfig::CustomHeaders { headers } => headers
                .iter()
                .fold(request, |request, (key, value)| request.header(key.as_str(), value.as_str())),
        };
        Ok(request)
    }

    /// Forget the cached token; the next request fetches a new one
    pub async fn clear_cache(&self) {
        *self.token.write().await = None;
    }

    async fn token(&self) -> Result<String> {
        if let Some(value) = fresh_value(&*self.token.read().await) {
            return Ok(value);
        }

        let mut slot = self.token.write().await;
        // Another request may have logged in while this one waited
        if let Some(value) = fresh_value(&*slot) {
            return Ok(value);
        }

        let issued = self.issue().await?;
        let value = issued.value.clone();
        *slot = Some(issued);
        Ok(value)
    }

    async fn issue(&self) -> Result<IssuedToken> {
        match &self.config {
            AuthConfig::Oauth2ClientCredentials {
                token_url,
                client_id,
                client_secret,
                scopes,
            } => {
                debug!("Requesting client credentials token from {}", token_url);
                let scope = scopes.join(" ");
                let mut form = vec![
                    ("grant_type", "client_credentials"),
                    ("client_id", client_id.as_str()),
                    ("client_secret", client_secret.as_str()),
                ];
                if !scope.is_empty() {
                    form.push(("scope", scope.as_str()));
                }

                let body = grant(self.client.post(token_url).form(&form), |message| {
                    Error::OAuth2 { message }
                })
                .await?;
                let grant: ClientCredentialsGrant = serde_json::from_value(body)?;
                Ok(IssuedToken::issued(grant.access_token, grant.expires_in))
            }

            AuthConfig::Session {
                login_url,
                login_method,
                login_body,
                token_path,
                expires_in_path,
                ..
            } => {
                debug!("Logging in at {}", login_url);
                let request = self
                    .client
                    .request(login_method.clone(), login_url)
                    .json(login_body);
                let body = grant(request, |message| Error::Auth { message }).await?;

                let ticket = extract_path(&body, token_path).ok_or_else(|| {
                    Error::auth(format!("Login response has no token at '{token_path}'"))
                })?;
                let lifetime = expires_in_path
                    .as_deref()
                    .and_then(|path| extract_path(&body, path))
                    .and_then(|secs| secs.parse().ok());
                Ok(IssuedToken::issued(ticket, lifetime))
            }

            _ => Err(Error::auth("This auth scheme has no token endpoint")),
        }
    }
}

fn prefixed(prefix: Option<&str>, value: &str) -> String {
    format!("{}{}", prefix.unwrap_or_default(), value)
}

fn fresh_value(slot: &Option<IssuedToken>) -> Option<String> {
    slot.as_ref()
        .filter(|token| token.is_fresh())
        .map(|token| token.value.clone())
}

/// Send a login or token request and return its JSON body
async fn grant(request: RequestBuilder, rejected: impl FnOnce(String) -> Error) -> Result<Value> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();
        return Err(rejected(format!(
            "{url} answered with status {}: {body}",
            status.as_u16()
        )));
    }
    Ok(response.json().await?)
}

#[derive(Debug, Deserialize)]
struct ClientCredentialsGrant {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Read a scalar from a dotted path such as `$.data.ticket` or `data.ticket`
pub fn extract_path(value: &Value, path: &str) -> Option<String> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let pointer: String = path
        .split('.')
        .map(|key| format!("/{}", key.replace('~', "~0").replace('/', "~1")))
        .collect();

    match value.pointer(&pointer)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
