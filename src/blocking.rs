//! Synchronous facade over [`DocClient`]
//!
//! Each call drives the async operation to completion on a private
//! current-thread runtime. Must not be used from inside an async context;
//! tokio panics when `block_on` is nested.

use crate::client::DocClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::models::{
    AggregatedResult, AuxSchema, Filter, Namespace, NewNode, Node, NodeUpdate, Page, Schema,
};
use std::future::Future;
use tokio::runtime::{Builder, Runtime};

/// Blocking docstore client
pub struct BlockingClient {
    runtime: Runtime,
    client: DocClient,
}

impl BlockingClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(DocClient::new(base_url)?)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::with_client(DocClient::from_config(config)?)
    }

    /// Wrap an existing async client
    pub fn with_client(client: DocClient) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { runtime, client })
    }

    /// The wrapped async client
    pub fn inner(&self) -> &DocClient {
        &self.client
    }

    fn run<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    // ============================================================================
    // Nodes
    // ============================================================================

    pub fn get_node(&self, id: &str) -> Result<Node> {
        self.run(self.client.get_node(id))
    }

    pub fn get_node_by_path(&self, path: &str) -> Result<Node> {
        self.run(self.client.get_node_by_path(path))
    }

    pub fn get_children(&self, id: &str) -> Result<Vec<Node>> {
        self.run(self.client.get_children(id))
    }

    pub fn create_node(&self, node: &NewNode) -> Result<Node> {
        self.run(self.client.create_node(node))
    }

    pub fn update_node(&self, id: &str, update: &NodeUpdate) -> Result<Node> {
        self.run(self.client.update_node(id, update))
    }

    pub fn move_node(&self, id: &str, new_parent_id: &str) -> Result<Node> {
        self.run(self.client.move_node(id, new_parent_id))
    }

    pub fn delete_node(&self, id: &str) -> Result<()> {
        self.run(self.client.delete_node(id))
    }

    // ============================================================================
    // Namespaces
    // ============================================================================

    pub fn list_namespaces(&self) -> Result<Vec<Namespace>> {
        self.run(self.client.list_namespaces())
    }

    pub fn get_namespace(&self, prefix: &str) -> Result<Namespace> {
        self.run(self.client.get_namespace(prefix))
    }

    pub fn create_namespace(&self, namespace: &Namespace) -> Result<Namespace> {
        self.run(self.client.create_namespace(namespace))
    }

    pub fn delete_namespace(&self, prefix: &str) -> Result<()> {
        self.run(self.client.delete_namespace(prefix))
    }

    // ============================================================================
    // Schemas
    // ============================================================================

    pub fn list_schemas(&self) -> Result<Vec<Schema>> {
        self.run(self.client.list_schemas())
    }

    pub fn get_schema(&self, name: &str) -> Result<Schema> {
        self.run(self.client.get_schema(name))
    }

    pub fn create_schema(&self, schema: &Schema) -> Result<Schema> {
        self.run(self.client.create_schema(schema))
    }

    pub fn update_schema(&self, name: &str, schema: &Schema) -> Result<Schema> {
        self.run(self.client.update_schema(name, schema))
    }

    pub fn delete_schema(&self, name: &str) -> Result<()> {
        self.run(self.client.delete_schema(name))
    }

    pub fn list_aux_schemas(&self) -> Result<Vec<AuxSchema>> {
        self.run(self.client.list_aux_schemas())
    }

    pub fn get_aux_schema(&self, name: &str) -> Result<AuxSchema> {
        self.run(self.client.get_aux_schema(name))
    }

    pub fn create_aux_schema(&self, schema: &AuxSchema) -> Result<AuxSchema> {
        self.run(self.client.create_aux_schema(schema))
    }

    pub fn update_aux_schema(&self, name: &str, schema: &AuxSchema) -> Result<AuxSchema> {
        self.run(self.client.update_aux_schema(name, schema))
    }

    pub fn delete_aux_schema(&self, name: &str) -> Result<()> {
        self.run(self.client.delete_aux_schema(name))
    }

    // ============================================================================
    // Search
    // ============================================================================

    pub fn query(&self, filter: &Filter, page: u32) -> Result<Page<Node>> {
        self.run(self.client.query(filter, page))
    }

    pub fn oql_query(&self, oql: &str, page: u32) -> Result<Page<Node>> {
        self.run(self.client.oql_query(oql, page))
    }

    /// Every node matching `filter`; blocks until the last page is read
    pub fn query_all(&self, filter: &Filter) -> Result<AggregatedResult<Node>> {
        self.run(self.client.query_all(filter))
    }

    pub fn oql_query_all(&self, oql: &str) -> Result<AggregatedResult<Node>> {
        self.run(self.client.oql_query_all(oql))
    }
}

impl std::fmt::Debug for BlockingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingClient")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
