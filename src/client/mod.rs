//! Docstore REST client
//!
//! [`DocClient`] maps every server operation onto a single async method.
//! Operations are grouped by resource:
//!
//! - **Nodes**: get, get by path, children, create, update, move, delete
//! - **Namespaces**: list, get, create, delete
//! - **Schemas / auxiliary schemas**: list, get, create, update, delete
//! - **Search**: single pages and full aggregation, for structured filters
//!   and OQL strings
//!
//! The client is cheap to clone; clones share the connection pool, the
//! auth token cache and the rate limiter.

mod namespaces;
mod nodes;
mod schemas;
mod search;

pub use search::{FilterSearch, OqlSearch};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use std::sync::Arc;
use url::Url;

/// Async client for a docstore server
#[derive(Debug, Clone)]
pub struct DocClient {
    http: Arc<HttpClient>,
    base: Url,
    page_size: Option<u32>,
}

impl DocClient {
    /// Anonymous client with default transport settings
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_http(base_url, HttpClient::with_config(HttpClientConfig::default())?)
    }

    /// Client configured from a [`ClientConfig`] (auth, timeouts, page size)
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_auth(config.to_http_config(), config.to_auth_config()?)?;
        let client = Self::with_http(&config.base_url, http)?;
        Ok(match config.page_size {
            Some(size) => client.with_page_size(size),
            None => client,
        })
    }

    /// Client over an existing transport
    pub fn with_http(base_url: &str, http: HttpClient) -> Result<Self> {
        let base = Url::parse(base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("'{base_url}' is not an http(s) URL"),
            ));
        }
        if base.cannot_be_a_base() {
            return Err(Error::invalid_value(
                "base_url",
                format!("'{base_url}' cannot be used as a base URL"),
            ));
        }

        Ok(Self {
            http: Arc::new(http),
            base,
            page_size: None,
        })
    }

    /// Page size sent with every search request
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Absolute URL for the given path segments; each segment is percent-encoded
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<String> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::config(format!("Base URL has no path: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests;
