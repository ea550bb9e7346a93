//! # Docstore Client
//!
//! Async client for a document-management REST server: nodes, namespaces,
//! schemas, auxiliary schemas and search.
//!
//! ## Features
//!
//! - **Typed resources**: nodes, namespaces, schemas and auxiliary schemas
//! - **Search**: structured filters and OQL strings, one page at a time or
//!   aggregated across every page
//! - **Auth**: API key, basic, bearer, session ticket, OAuth2 client credentials
//! - **Transport**: retries with backoff, optional client-side rate limiting
//! - **Three calling styles**: `async`, blocking, and completion callbacks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docstore_client::{DocClient, models::Filter, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = DocClient::new("https://docs.example.com/api")?.with_page_size(100);
//!
//!     let report = client.get_node_by_path("/projects/alpha/report").await?;
//!     println!("{} has {} properties", report.name, report.properties.len());
//!
//!     let all = client.query_all(&Filter::eq("schema", "document")).await?;
//!     println!("{} documents", all.result_count);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │      DocClient (async)  ·  BlockingClient  ·  callback     │
//! └───────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────┬─────────────────┴───┬──────────────┬──────────┐
//! │   Auth   │        HTTP         │  Pagination  │  Models  │
//! ├──────────┼─────────────────────┼──────────────┼──────────┤
//! │ API Key  │ Retry + Backoff     │ aggregate_all│ Node     │
//! │ OAuth2   │ Rate Limit          │ PageFetcher  │ Schema   │
//! │ Session  │ Error decoding      │              │ Page     │
//! └──────────┴─────────────────────┴──────────────┴──────────┘
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::needless_pass_by_value)]

pub mod error;
pub mod types;

/// Credentials and token caching
pub mod auth;
/// Transport: retries, re-login, throttling
pub mod http;

pub mod config;
pub mod models;
pub mod pagination;

/// Async docstore client
pub mod client;
pub mod blocking;
pub mod callback;

/// `docstore` command-line tool
pub mod cli;

pub use blocking::BlockingClient;
pub use client::DocClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use pagination::aggregate_all;

/// Package version, also sent in the default user agent
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
