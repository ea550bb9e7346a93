//! Wire types exchanged with the docstore server
//!
//! Resources (nodes, namespaces, schemas, auxiliary schemas) plus the
//! search request/response shapes used by the pagination module.

mod node;
mod schema;
mod search;

pub use node::{NewNode, Node, NodeUpdate};
pub use schema::{AuxSchema, Namespace, PropertyType, Schema, SchemaProperty};
pub use search::{AggregatedResult, Filter, Page, SearchRequest};
