//! access-check - inspect ownership-scoped access decisions
//!
//! Resolves list filters and mutation decisions against a snapshot or a database

#![allow(missing_docs)]

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use intime_access::core::models::{EntityType, RecordId, UserId};
use intime_access::storage::StorageLayer;
use intime_access::storage::memory::Snapshot;
use intime_access::utils::logging::init_logging;
use intime_access::{AccessEngine, Config, Decision, MutationAction};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_CONFIG_PATH: &str = "config/access.yaml";

/// Exit status of a denied mutation check
const EXIT_DENIED: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "access-check", version, about = "Inspect ownership-scoped access decisions")]
struct Cli {
    /// Configuration file (defaults to config/access.yaml, then the environment)
    #[arg(long, short, env = "INTIME_ACCESS_CONFIG")]
    config: Option<PathBuf>,

    /// YAML snapshot to serve from memory instead of the database
    #[arg(long, short)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Authorize and run a list query
    List {
        /// Requesting user
        #[arg(long)]
        user: UserId,
        /// Entity type name
        #[arg(long)]
        entity: String,
        /// Ownership filter mode (defaults to the configured mode)
        #[arg(long)]
        mode: Option<String>,
    },
    /// Decide whether a user may mutate a record
    Check {
        /// Requesting user
        #[arg(long)]
        user: UserId,
        /// Entity type name
        #[arg(long)]
        entity: String,
        /// Record to mutate
        #[arg(long)]
        record: RecordId,
        /// Mutation action
        #[arg(long, default_value = "update")]
        action: MutationAction,
    },
    /// Run database migrations
    Migrate,
    /// Import the snapshot into the database
    Seed,
    /// Validate and print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // Alternate Display keeps the context chain on one line
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref()).await?;
    init_logging(config.logging()).context("failed to initialize logging")?;
    debug!("Configuration: {:?}", config);

    match cli.command {
        Command::Config => {
            println!("{}", config.to_yaml()?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Migrate => {
            let storage = connect_database(&config).await?;
            let stats = match storage.db() {
                Some(db) => db.stats().await?,
                None => bail!("storage layer has no database"),
            };
            info!("Database ready: {:?}", stats);
            Ok(ExitCode::SUCCESS)
        }
        Command::Seed => {
            let path = cli
                .snapshot
                .as_deref()
                .context("seed requires --snapshot")?;
            let snapshot = Snapshot::from_file(path).await?;
            let storage = connect_database(&config).await?;
            match storage.db() {
                Some(db) => db.import_snapshot(&snapshot).await?,
                None => bail!("storage layer has no database"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::List { user, entity, mode } => {
            let engine = build_engine(config, cli.snapshot.as_deref()).await?;
            let mode = engine.policy().parse_mode(mode.as_deref())?;
            let result = engine.list(user, mode, &EntityType::new(entity)).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check {
            user,
            entity,
            record,
            action,
        } => {
            let engine = build_engine(config, cli.snapshot.as_deref()).await?;
            let decision = engine
                .check_mutation(user, &EntityType::new(entity), record, action)
                .await?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
            Ok(match decision {
                Decision::Allow => ExitCode::SUCCESS,
                Decision::Deny(_) => ExitCode::from(EXIT_DENIED),
            })
        }
    }
}

async fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path)
            .await
            .with_context(|| format!("failed to load {}", path.display()));
    }
    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        return Config::from_file(DEFAULT_CONFIG_PATH)
            .await
            .with_context(|| format!("failed to load {}", DEFAULT_CONFIG_PATH));
    }
    Config::from_env().context("failed to load configuration from the environment")
}

async fn connect_database(config: &Config) -> Result<StorageLayer> {
    if !config.database().enabled {
        bail!("database is disabled; set database.enabled or INTIME_ACCESS_DATABASE_URL");
    }
    let registry = Arc::new(config.registry());
    Ok(StorageLayer::connect(config.database(), registry).await?)
}

async fn build_engine(config: Config, snapshot: Option<&Path>) -> Result<AccessEngine> {
    match snapshot {
        Some(path) => {
            let snapshot = Snapshot::from_file(path)
                .await
                .with_context(|| format!("failed to load snapshot {}", path.display()))?;
            let storage = StorageLayer::in_memory(snapshot.load()?);
            Ok(AccessEngine::with_storage(config, storage))
        }
        None => Ok(AccessEngine::new(config).await?),
    }
}
