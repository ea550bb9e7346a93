//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for a docstore server
#[derive(Parser, Debug)]
#[command(name = "docstore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Server base URL (overrides the config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read and modify nodes
    #[command(subcommand)]
    Node(NodeCommand),

    /// Manage namespaces
    #[command(subcommand)]
    Namespace(NamespaceCommand),

    /// Inspect schemas
    #[command(subcommand)]
    Schema(SchemaCommand),

    /// Inspect auxiliary schemas
    #[command(subcommand)]
    AuxSchema(SchemaCommand),

    /// Search with a structured JSON filter
    Query {
        /// Filter as JSON, e.g. '{"schema": "document"}'
        filter: String,

        #[command(flatten)]
        pages: PageSelection,
    },

    /// Search with an OQL query string
    Oql {
        query: String,

        #[command(flatten)]
        pages: PageSelection,
    },
}

#[derive(Subcommand, Debug)]
pub enum NodeCommand {
    /// Fetch a node by id
    Get { id: String },

    /// List direct children of a node
    Children { id: String },

    /// Create a node from a JSON body
    Create {
        #[arg(long)]
        json: String,
    },

    /// Update a node from a JSON body
    Update {
        id: String,
        #[arg(long)]
        json: String,
    },

    /// Move a node under a new parent
    Move { id: String, parent: String },

    /// Delete a node
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum NamespaceCommand {
    List,
    Get { prefix: String },
    Delete { prefix: String },
}

#[derive(Subcommand, Debug)]
pub enum SchemaCommand {
    List,
    Get { name: String },
    Delete { name: String },
}

/// Which result pages a search prints
#[derive(Args, Debug, Clone, Copy)]
pub struct PageSelection {
    /// Single page to fetch
    #[arg(long, default_value = "1", conflicts_with = "all")]
    pub page: u32,

    /// Fetch every page and print the aggregated result
    #[arg(long)]
    pub all: bool,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
