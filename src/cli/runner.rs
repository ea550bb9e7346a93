//! CLI runner - executes commands

use crate::cli::commands::{
    Cli, Commands, NamespaceCommand, NodeCommand, OutputFormat, PageSelection, SchemaCommand,
};
use crate::client::DocClient;
use crate::config::ClientConfig;
use crate::error::{Error, Result, ResultExt};
use crate::models::{AggregatedResult, Filter, NewNode, Node, NodeUpdate, Page};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::future::Future;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command and print its result to stdout
    pub async fn run(&self) -> Result<()> {
        let config = self.client_config()?;
        debug!("Using server {}", config.base_url);

        let client = DocClient::from_config(&config)?;
        let output = self.execute(&client).await?;
        self.emit(&output)
    }

    /// Config file, then `DOCSTORE_*` variables, then `--url`
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::load(path)
                .with_context(|| format!("Invalid config file '{}'", path.display()))?,
            None => ClientConfig::default(),
        };
        config.apply_env();
        if let Some(url) = &self.cli.url {
            config.base_url.clone_from(url);
        }
        Ok(config)
    }

    /// Dispatch the subcommand against `client`
    pub async fn execute(&self, client: &DocClient) -> Result<Value> {
        match &self.cli.command {
            Commands::Node(cmd) => Self::node(client, cmd).await,
            Commands::Namespace(cmd) => Self::namespace(client, cmd).await,
            Commands::Schema(cmd) => Self::schema(client, cmd).await,
            Commands::AuxSchema(cmd) => Self::aux_schema(client, cmd).await,
            Commands::Query { filter, pages } => {
                let filter = Filter::new(parse_json("filter", filter)?);
                Self::search(pages, client.query_all(&filter), |page| {
                    client.query(&filter, page)
                })
                .await
            }
            Commands::Oql { query, pages } => {
                Self::search(pages, client.oql_query_all(query), |page| {
                    client.oql_query(query, page)
                })
                .await
            }
        }
    }

    async fn node(client: &DocClient, cmd: &NodeCommand) -> Result<Value> {
        match cmd {
            NodeCommand::Get { id } => to_value(client.get_node(id).await?),
            NodeCommand::Children { id } => to_value(client.get_children(id).await?),
            NodeCommand::Create { json } => {
                let node: NewNode = parse_json("json", json)?;
                to_value(client.create_node(&node).await?)
            }
            NodeCommand::Update { id, json } => {
                let update: NodeUpdate = parse_json("json", json)?;
                to_value(client.update_node(id, &update).await?)
            }
            NodeCommand::Move { id, parent } => to_value(client.move_node(id, parent).await?),
            NodeCommand::Delete { id } => {
                client.delete_node(id).await?;
                Ok(deleted(id))
            }
        }
    }

    async fn namespace(client: &DocClient, cmd: &NamespaceCommand) -> Result<Value> {
        match cmd {
            NamespaceCommand::List => to_value(client.list_namespaces().await?),
            NamespaceCommand::Get { prefix } => to_value(client.get_namespace(prefix).await?),
            NamespaceCommand::Delete { prefix } => {
                client.delete_namespace(prefix).await?;
                Ok(deleted(prefix))
            }
        }
    }

    async fn schema(client: &DocClient, cmd: &SchemaCommand) -> Result<Value> {
        match cmd {
            SchemaCommand::List => to_value(client.list_schemas().await?),
            SchemaCommand::Get { name } => to_value(client.get_schema(name).await?),
            SchemaCommand::Delete { name } => {
                client.delete_schema(name).await?;
                Ok(deleted(name))
            }
        }
    }

    async fn aux_schema(client: &DocClient, cmd: &SchemaCommand) -> Result<Value> {
        match cmd {
            SchemaCommand::List => to_value(client.list_aux_schemas().await?),
            SchemaCommand::Get { name } => to_value(client.get_aux_schema(name).await?),
            SchemaCommand::Delete { name } => {
                client.delete_aux_schema(name).await?;
                Ok(deleted(name))
            }
        }
    }

    /// `--all` awaits the aggregation; otherwise only the requested page is fetched
    async fn search<A, F, P>(pages: &PageSelection, all: A, single: F) -> Result<Value>
    where
        A: Future<Output = Result<AggregatedResult<Node>>>,
        F: FnOnce(u32) -> P,
        P: Future<Output = Result<Page<Node>>>,
    {
        if pages.all {
            to_value(all.await?)
        } else {
            to_value(single(pages.page).await?)
        }
    }

    fn emit(&self, value: &Value) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

fn parse_json<T: DeserializeOwned>(field: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| Error::invalid_value(field, e.to_string()))
}

fn to_value<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn deleted(id: &str) -> Value {
    json!({ "deleted": id })
}
