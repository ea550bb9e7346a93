//! CLI module
//!
//! Command-line front end for a docstore server.
//!
//! # Commands
//!
//! - `node` - get, children, create, update, move, delete
//! - `namespace` - list, get, delete
//! - `schema` / `aux-schema` - list, get, delete
//! - `query` - structured filter search, one page or `--all`
//! - `oql` - OQL search, one page or `--all`

mod commands;
mod runner;

pub use commands::{
    Cli, Commands, NamespaceCommand, NodeCommand, OutputFormat, PageSelection, SchemaCommand,
};
pub use runner::Runner;
