use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use serde::Deserialize;

use crate::cache::ResultCache;
use crate::catalog::{CatalogError, EntityCatalog};
use crate::config::{self, Config, ConfigError};
use crate::contract::SearchReport;
use crate::entities::{CalendarEvent, Calculator, Contact, Matter, Task};
use crate::model::{EntityType, SearchFilter};
use crate::orchestrator::SearchOrchestrator;
use crate::remote::{HttpSearchClient, RemoteSearch, RemoteSearchError};
use crate::state::SearchStore;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("remote client error: {0}")]
    Remote(#[from] RemoteSearchError),
    #[error("failed to read collections from {path}: {source}")]
    Collections {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid collections file {path}: {source}")]
    CollectionsFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Parser)]
#[command(name = "lexsearch-core", about = "Federated command-palette search")]
pub struct CliOptions {
    /// Config file (TOML, or JSON5 for .json/.json5).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// JSON file with `folders`, `contacts`, `calculators`, `tasks`, `events`.
    #[arg(long)]
    pub collections: Option<PathBuf>,
    /// Restrict the search to these entity types (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<EntityType>,
    /// Skip local collections and ask the server directly.
    #[arg(long)]
    pub force_server: bool,
    /// Write the effective config to disk if it does not exist yet.
    #[arg(long)]
    pub init_config: bool,
    pub query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CollectionsFile {
    pub folders: Option<Vec<Matter>>,
    pub contacts: Option<Vec<Contact>>,
    pub calculators: Option<Vec<Calculator>>,
    pub tasks: Option<Vec<Task>>,
    pub events: Option<Vec<CalendarEvent>>,
}

pub fn load_collections(path: &Path, catalog: &EntityCatalog) -> Result<(), RuntimeError> {
    let raw = std::fs::read_to_string(path).map_err(|source| RuntimeError::Collections {
        path: path.to_path_buf(),
        source,
    })?;
    let file: CollectionsFile =
        serde_json::from_str(&raw).map_err(|source| RuntimeError::CollectionsFormat {
            path: path.to_path_buf(),
            source,
        })?;
    install_collections(file, catalog)
}

pub fn install_collections(
    file: CollectionsFile,
    catalog: &EntityCatalog,
) -> Result<(), RuntimeError> {
    if let Some(records) = file.folders {
        catalog.install_matters(records)?;
    }
    if let Some(records) = file.contacts {
        catalog.install_contacts(records)?;
    }
    if let Some(records) = file.calculators {
        catalog.install_calculators(records)?;
    }
    if let Some(records) = file.tasks {
        catalog.install_tasks(records)?;
    }
    if let Some(records) = file.events {
        catalog.install_events(records)?;
    }
    Ok(())
}

pub fn build_orchestrator(
    cfg: &Config,
    catalog: Arc<EntityCatalog>,
    remote: Arc<dyn RemoteSearch>,
) -> SearchOrchestrator {
    SearchOrchestrator::new(
        catalog,
        remote,
        ResultCache::new(cfg.cache_capacity, cfg.cache_ttl()),
        Arc::new(SearchStore::new(cfg.recent_limit)),
    )
}

pub fn prepare_config(options: &CliOptions) -> Result<Config, RuntimeError> {
    let cfg = config::load(options.config.as_deref())?;
    if options.init_config && !cfg.config_path.exists() {
        config::save(&cfg)?;
        tracing::info!(path = %cfg.config_path.display(), "wrote default config");
    }
    Ok(cfg)
}

pub async fn run_with_options(options: CliOptions) -> Result<SearchReport, RuntimeError> {
    let cfg = prepare_config(&options)?;
    tracing::info!(config_path = %cfg.config_path.display(), "search runtime starting");

    let catalog = Arc::new(EntityCatalog::new());
    if let Some(path) = options.collections.as_deref() {
        load_collections(path, &catalog)?;
    }
    let client = HttpSearchClient::from_config(&cfg)?;
    if client.endpoint().is_empty() {
        tracing::info!("remote search disabled; unloaded types will be reported");
    } else {
        tracing::info!(endpoint = client.endpoint(), "remote search enabled");
    }
    let remote: Arc<dyn RemoteSearch> = Arc::new(client);
    let orchestrator = build_orchestrator(&cfg, catalog, remote);

    let query = options.query.unwrap_or_default();
    let filters = if options.types.is_empty() {
        None
    } else {
        Some(SearchFilter::only(&options.types))
    };

    let outcome = if options.force_server {
        orchestrator
            .force_server_search(&query, filters.as_ref())
            .await
    } else {
        orchestrator.perform_search(&query, filters.as_ref()).await
    };
    tracing::info!(?outcome, "search finished");

    let state = orchestrator.store().snapshot();
    Ok(SearchReport {
        query,
        results: state.results,
        error: state.error,
    })
}
