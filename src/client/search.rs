//! Search: single pages and full aggregation for both query dialects

use super::DocClient;
use crate::callback::spawn_with_callback;
use crate::error::Result;
use crate::models::{AggregatedResult, Filter, Node, Page, SearchRequest};
use crate::pagination::{aggregate_all, PageFetcher};
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::debug;

impl DocClient {
    /// One page of nodes matching a structured filter
    pub async fn query(&self, filter: &Filter, page: u32) -> Result<Page<Node>> {
        let url = self.endpoint(&["search"])?;
        debug!("Filter search, page {}", page);
        self.http().post_json_once(&url, &self.search_request(filter, page)).await
    }

    /// One page of nodes matching an OQL query string
    pub async fn oql_query(&self, oql: &str, page: u32) -> Result<Page<Node>> {
        let url = self.endpoint(&["search", "oql"])?;
        debug!("OQL search, page {}: {}", page, oql);
        self.http().post_json_once(&url, &self.search_request(oql, page)).await
    }

    /// Every node matching a structured filter, fetched page by page
    pub async fn query_all(&self, filter: &Filter) -> Result<AggregatedResult<Node>> {
        aggregate_all(filter, &FilterSearch::new(self)).await
    }

    /// Every node matching an OQL query string, fetched page by page
    pub async fn oql_query_all(&self, oql: &str) -> Result<AggregatedResult<Node>> {
        aggregate_all(oql, &OqlSearch::new(self)).await
    }

    /// Run [`query_all`](Self::query_all) in the background and hand the
    /// outcome to `callback`. Requires a tokio runtime.
    pub fn query_all_with_callback<C>(&self, filter: Filter, callback: C) -> JoinHandle<()>
    where
        C: FnOnce(Result<AggregatedResult<Node>>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(async move { client.query_all(&filter).await }, callback)
    }

    /// Callback flavour of [`oql_query_all`](Self::oql_query_all)
    pub fn oql_query_all_with_callback<C>(
        &self,
        oql: impl Into<String>,
        callback: C,
    ) -> JoinHandle<()>
    where
        C: FnOnce(Result<AggregatedResult<Node>>) + Send + 'static,
    {
        let client = self.clone();
        let oql = oql.into();
        spawn_with_callback(async move { client.oql_query_all(&oql).await }, callback)
    }

    fn search_request<'a, Q: serde::Serialize + ?Sized>(
        &self,
        query: &'a Q,
        page: u32,
    ) -> SearchRequest<'a, Q> {
        SearchRequest {
            query,
            page,
            page_size: self.page_size(),
        }
    }
}

/// Page fetcher for structured filters
#[derive(Debug, Clone, Copy)]
pub struct FilterSearch<'a> {
    client: &'a DocClient,
}

impl<'a> FilterSearch<'a> {
    pub fn new(client: &'a DocClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<'a> PageFetcher<Filter, Node> for FilterSearch<'a> {
    async fn fetch_page(&self, query: &Filter, page: u32) -> Result<Page<Node>> {
        self.client.query(query, page).await
    }
}

/// Page fetcher for OQL query strings
#[derive(Debug, Clone, Copy)]
pub struct OqlSearch<'a> {
    client: &'a DocClient,
}

impl<'a> OqlSearch<'a> {
    pub fn new(client: &'a DocClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<'a> PageFetcher<str, Node> for OqlSearch<'a> {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<Page<Node>> {
        self.client.oql_query(query, page).await
    }
}
