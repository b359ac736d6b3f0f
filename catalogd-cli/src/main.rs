//! catalogd - boots the catalog directory from static configuration and runs
//! one operation against it
//!
//! Results go to stdout as JSON envelopes; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use catalogd_core::announce::DiscoveryTransport;
use catalogd_core::catalog::{ActiveCatalogView, ApiResponse, CatalogRequest};
use catalogd_core::local::{LocalConnectors, LocalDiscovery, LocalTopology};
use catalogd_core::{respond, CatalogService, CoordinatorConfig};

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "catalogd",
    about = "Runtime catalog directory for a query engine coordinator",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Coordinator configuration file (YAML); built-in defaults when omitted
    #[clap(long, short, global = true)]
    config: Option<PathBuf>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Emit logs as JSON lines
    #[clap(long, global = true)]
    json_logs: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// List catalogs with their active nodes
    List {
        /// Only catalogs whose name starts with this literal prefix
        #[clap(long)]
        prefix: Option<String>,

        /// Display results in a compact table format
        #[clap(short, long)]
        table: bool,
    },

    /// Show one catalog by exact name
    Get {
        /// Catalog name
        name: String,
    },

    /// Add or replace catalogs from a JSON array of requests
    Add {
        /// JSON file with `[{catalogName, connectorName, properties}]`, or '-' for stdin
        #[clap(long, short)]
        file: PathBuf,
    },

    /// Delete one catalog by name
    Delete {
        /// Catalog name
        name: String,
    },

    /// Show the connector announcement this node publishes
    Announce,
}

/// Initialize tracing; logs must go to stderr so stdout stays parseable
fn initialize_tracing(log_level: &LogLevel, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "Catalog")]
    catalog: String,
    #[tabled(rename = "Connector")]
    connector: String,
    #[tabled(rename = "Properties")]
    properties: usize,
    #[tabled(rename = "Active Nodes")]
    nodes: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&ActiveCatalogView> for CatalogRow {
    fn from(view: &ActiveCatalogView) -> Self {
        let nodes = if view.nodes.is_empty() {
            "-".to_string()
        } else {
            view.nodes
                .iter()
                .map(|n| n.identifier.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        Self {
            catalog: view.catalog.catalog_name.clone(),
            connector: view.catalog.connector_name.clone(),
            properties: view.catalog.properties.len(),
            nodes,
            created: view.catalog.create_time.to_rfc3339(),
        }
    }
}

/// Service plus the local discovery handle needed by `announce`
struct Node {
    service: CatalogService,
    discovery: Arc<LocalDiscovery>,
    config: CoordinatorConfig,
}

fn load_config(path: Option<&Path>) -> Result<CoordinatorConfig> {
    match path {
        Some(path) => CoordinatorConfig::load_from_path(path),
        None => Ok(CoordinatorConfig::default()),
    }
}

async fn boot(config: CoordinatorConfig) -> Result<Node> {
    let discovery = Arc::new(LocalDiscovery::for_node(
        &config.announcement.service_type,
        &config.node.version,
        config.node.coordinator,
    ));
    let topology = Arc::new(LocalTopology::new(
        config.local_node(),
        discovery.clone(),
        config.announcement.service_type.clone(),
        config.announcement.connector_ids_property.clone(),
    ));
    let connectors = Arc::new(if config.installed_connectors.is_empty() {
        LocalConnectors::new()
    } else {
        LocalConnectors::with_installed(config.installed_connectors.clone())
    });

    let service = CatalogService::start(&config, connectors, topology, discovery.clone())
        .await
        .context("Failed to start catalog service")?;

    Ok(Node {
        service,
        discovery,
        config,
    })
}

fn read_requests(file: &Path) -> Result<Vec<CatalogRequest>> {
    let content = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read requests from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read requests: {}", file.display()))?
    };
    serde_json::from_str(&content).context("Requests must be a JSON array of catalog entries")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the envelope and turn a failed one into a non-zero exit
fn finish<T: Serialize>(response: ApiResponse<T>) -> Result<()> {
    print_json(&response)?;
    if response.is_success() {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{} (code {})",
            response.msg.unwrap_or_default(),
            response.code
        ))
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    debug!(
        config = ?cli.config,
        catalogs = config.catalogs.len(),
        "Booting catalog directory"
    );
    let node = boot(config).await?;

    match cli.command {
        Command::List { prefix, table } => {
            let views = match prefix {
                Some(prefix) => node.service.list_by_prefix(&prefix).await,
                None => node.service.list_all().await,
            };
            if table {
                let rows: Vec<CatalogRow> = views.iter().map(CatalogRow::from).collect();
                let table = Table::new(&rows)
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()))
                    .to_string();
                println!("Found {} catalogs\n", rows.len());
                println!("{table}");
                Ok(())
            } else {
                finish(ApiResponse::ok(views))
            }
        }
        Command::Get { name } => finish(respond(node.service.get_info(&name).await)),
        Command::Add { file } => {
            let requests = read_requests(&file)?;
            finish(respond(node.service.add(requests).await))
        }
        Command::Delete { name } => finish(respond(node.service.delete(&name).await)),
        Command::Announce => {
            let announcement = node
                .discovery
                .current_announcement(&node.config.announcement.service_type)
                .await;
            finish(ApiResponse::ok(announcement))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_level, cli.json_logs);
    run(cli).await
}
