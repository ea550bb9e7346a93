//! HTTP transport
//!
//! Provides the HTTP client every docstore operation is built on.
//!
//! # Features
//!
//! - **Retries**: transient statuses and connection failures, on a backoff schedule
//! - **Re-login**: one fresh session ticket when the server answers 401
//! - **Rate limiting**: token bucket built on governor
//! - **Error decoding**: non-success responses become [`crate::Error`] values

mod client;
mod rate_limit;
mod retry;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use retry::Backoff;
pub(crate) use retry::is_transient;
