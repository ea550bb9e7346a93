//! Docstore HTTP transport
//!
//! [`HttpClient::send`] is the single path every call takes to the server.
//! Each attempt is throttled, authenticated and then assessed: transient
//! failures are retried on the [`Backoff`] schedule, a rejected session
//! ticket triggers one fresh login, and any other non-success response is
//! decoded into an [`Error`].

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::retry::{self, Backoff, RetryBudget};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::types::BackoffType;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Transport settings shared by every request of a client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    pub backoff: Backoff,
    /// Client-side throttle; none by default
    pub rate_limit: Option<RateLimiterConfig>,
    /// Headers sent with every request
    pub default_headers: HashMap<String, String>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            backoff: Backoff::default(),
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), crate::VERSION),
        }
    }
}

impl HttpClientConfig {
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for [`HttpClientConfig`]
#[derive(Debug, Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    #[must_use]
    pub fn backoff(mut self, kind: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff = Backoff::new(kind, initial, max);
        self
    }

    #[must_use]
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Query string, extra headers and JSON body for one request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query pairs in the order they are sent
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
    /// Only re-send when the server cannot have acted on the request:
    /// connect failures, 429 and the re-login after a 401
    pub no_retry: bool,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// For requests that must reach the server at most once
    #[must_use]
    pub fn no_retry(mut self) -> Self {
        self.no_retry = true;
        self
    }
}

/// What to do after one attempt
enum Step {
    Done(Response),
    RetryAfter(Duration),
    Relogin,
}

/// HTTP client with retry, re-login and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    auth: Option<Authenticator>,
    limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Anonymous client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            limiter: config.rate_limit.as_ref().map(RateLimiter::new),
            client,
            config,
            auth: None,
        })
    }

    /// Client that authenticates every request; token fetches reuse the same pool
    pub fn with_auth(config: HttpClientConfig, auth: AuthConfig) -> Result<Self> {
        let mut http = Self::with_config(config)?;
        http.auth = match auth {
            AuthConfig::None => None,
            auth => Some(Authenticator::with_client(auth, http.client.clone())),
        };
        Ok(http)
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Send a request until it succeeds, fails permanently or runs out of retries
    pub async fn send(&self, method: Method, url: &str, request: &RequestConfig) -> Result<Response> {
        let mut budget = RetryBudget::new(self.config.max_retries);

        loop {
            if let Some(limiter) = &self.limiter {
                limiter.wait().await;
            }

            let builder = self.prepare(method.clone(), url, request).await?;
            debug!(
                "{} {} (attempt {}/{})",
                method,
                url,
                budget.attempt(),
                budget.total()
            );

            match self
                .assess(builder.send().await, url, request.no_retry, &mut budget)
                .await?
            {
                Step::Done(response) => return Ok(response),
                Step::RetryAfter(delay) => tokio::time::sleep(delay).await,
                Step::Relogin => {}
            }
        }
    }

    async fn prepare(&self, method: Method, url: &str, request: &RequestConfig) -> Result<RequestBuilder> {
        let mut builder = self.client.request(method, url);

        for (key, value) in self.config.default_headers.iter().chain(&request.headers) {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        match &self.auth {
            Some(auth) => auth.apply(builder).await,
            None => Ok(builder),
        }
    }

    async fn assess(
        &self,
        outcome: reqwest::Result<Response>,
        url: &str,
        no_retry: bool,
        budget: &mut RetryBudget,
    ) -> Result<Step> {
        let response = match outcome {
            Ok(response) => response,
            Err(e) if e.is_connect() || (e.is_timeout() && !no_retry) => {
                let Some(retry) = budget.take() else {
                    return Err(if e.is_timeout() {
                        Error::Timeout {
                            timeout_ms: self.config.timeout.as_millis() as u64,
                        }
                    } else {
                        Error::Http(e)
                    });
                };
                let delay = self.config.backoff.delay(retry);
                warn!("{} failed ({}), retrying in {:?}", url, e, delay);
                return Ok(Step::RetryAfter(delay));
            }
            Err(e) if e.is_timeout() => {
                return Err(Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                })
            }
            Err(e) => return Err(Error::Http(e)),
        };

        let status = response.status();
        if status.is_success() {
            return Ok(Step::Done(response));
        }

        if status == StatusCode::UNAUTHORIZED {
            if let Some(auth) = self.auth.as_ref().filter(|a| a.config().uses_token_cache()) {
                if budget.take_relogin() {
                    warn!("{} rejected the cached token, logging in again", url);
                    auth.clear_cache().await;
                    return Ok(Step::Relogin);
                }
            }
        }

        if retry::is_transient(status) && (!no_retry || status == StatusCode::TOO_MANY_REQUESTS) {
            let server_delay = retry::retry_after(&response);
            match budget.take() {
                Some(retry) => {
                    let delay = server_delay.unwrap_or_else(|| self.config.backoff.delay(retry));
                    warn!(
                        "{} returned {}, retrying in {:?}",
                        url,
                        status.as_u16(),
                        delay
                    );
                    return Ok(Step::RetryAfter(delay));
                }
                None if status == StatusCode::TOO_MANY_REQUESTS => {
                    return Err(Error::RateLimited {
                        retry_after_seconds: server_delay.map_or(0, |d| d.as_secs()),
                    });
                }
                None => {}
            }
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::from_response(status.as_u16(), &body))
    }

    /// Send and decode the JSON response body
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        request: RequestConfig,
    ) -> Result<T> {
        let bytes = self.send(method, url, &request).await?.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::decode(format!("Invalid response body from {url}: {e}")))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.request_json(Method::GET, url, RequestConfig::new())
            .await
    }

    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = RequestConfig::new().json(serde_json::to_value(body)?);
        self.request_json(Method::POST, url, request).await
    }

    /// POST that is sent at most once; see [`RequestConfig::no_retry`]
    pub async fn post_json_once<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = RequestConfig::new().json(serde_json::to_value(body)?).no_retry();
        self.request_json(Method::POST, url, request).await
    }

    pub async fn put_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = RequestConfig::new().json(serde_json::to_value(body)?);
        self.request_json(Method::PUT, url, request).await
    }

    /// DELETE; any success status is accepted and the body is ignored
    pub async fn delete(&self, url: &str) -> Result<()> {
        self.send(Method::DELETE, url, &RequestConfig::new())
            .await
            .map(drop)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("authenticated", &self.auth.is_some())
            .field("rate_limited", &self.limiter.is_some())
            .finish_non_exhaustive()
    }
}
