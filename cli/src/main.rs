//! wldindex CLI — project decoded WLD token events into an entity store.
//!
//! # Commands
//! ```text
//! wldindex project --input <path|-> [--db <path>] [--config <file>]
//!                  [--skip-errors] [--no-trace] [--json-logs]
//! wldindex info
//! ```
//!
//! `project` reads one decoded event per line as JSON:
//! ```json
//! {"schema":"Transfer","address":"0x163f…","txHash":"0x…","blockNumber":100,
//!  "blockTimestamp":1700000000,"logIndex":3,
//!  "fields":{"from":"0x…","to":"0x…","value":"1000"}}
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wldindex_core::{
    DecodedEvent, EntityKind, EntityStore, ErrorPolicy, EventFilter, HandlerRegistry,
    IndexerConfig, LogConfig, NoopSink, ProjectionHandler, Projector, StorageConfig, TraceSink,
    TracingSink,
};
use wldindex_storage::{MemoryEntityStore, SqliteEntityStore};

#[derive(Parser)]
#[command(
    name = "wldindex",
    about = "WLD token event indexer — project decoded events into entities",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project decoded events (JSON lines) into the configured store
    Project {
        /// Input file with one decoded event per line, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
        /// SQLite database path (overrides the config's storage)
        #[arg(long)]
        db: Option<PathBuf>,
        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Log and skip events that fail instead of stopping
        #[arg(long)]
        skip_errors: bool,
        /// Disable the per-event trace line
        #[arg(long)]
        no_trace: bool,
        /// Emit JSON structured logs
        #[arg(long)]
        json_logs: bool,
    },

    /// Show the event kinds and the fields each entity persists
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Project {
            input,
            db,
            config,
            skip_errors,
            no_trace,
            json_logs,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            if let Some(path) = db {
                cfg.storage = StorageConfig::Sqlite { path };
            }
            if skip_errors {
                cfg.on_error = ErrorPolicy::Skip;
            }
            if no_trace {
                cfg.trace = false;
            }
            if json_logs {
                cfg.log.json = true;
            }
            init_tracing(&cfg.log);
            cmd_project(&cfg, &input).await
        }

        Commands::Info => cmd_info(),
    }
}

// ─── Setup ───────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<IndexerConfig> {
    let Some(path) = path else {
        return Ok(IndexerConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid config '{}'", path.display()))
}

/// Initialise tracing once at startup. Logs go to stderr; stdout carries the
/// run summary.
fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_new(config.directives()).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// The configured store, kept concrete so the summary can read it back.
enum Backend {
    Memory(Arc<MemoryEntityStore>),
    Sqlite(SqliteEntityStore),
}

impl Backend {
    fn open(config: &StorageConfig) -> Result<Self> {
        match config {
            StorageConfig::Memory => Ok(Self::Memory(Arc::new(MemoryEntityStore::new()))),
            StorageConfig::Sqlite { path } => SqliteEntityStore::open(path)
                .map(Self::Sqlite)
                .with_context(|| format!("cannot open database '{}'", path.display())),
        }
    }

    fn store(&self) -> Arc<dyn EntityStore> {
        match self {
            Self::Memory(store) => store.clone() as Arc<dyn EntityStore>,
            Self::Sqlite(store) => Arc::new(store.clone()),
        }
    }

    fn stored(&self) -> Result<u64> {
        match self {
            Self::Memory(store) => Ok(store.len() as u64),
            Self::Sqlite(store) => Ok(store.count()?),
        }
    }
}

async fn open_input(input: &str) -> Result<Box<dyn AsyncBufRead + Unpin>> {
    if input == "-" {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }
    let file = tokio::fs::File::open(input)
        .await
        .with_context(|| format!("cannot open input '{input}'"))?;
    Ok(Box::new(BufReader::new(file)))
}

// ─── Command implementations ─────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, Eq)]
struct RunStats {
    projected: u64,
    ignored: u64,
    skipped: u64,
}

async fn cmd_project(cfg: &IndexerConfig, input: &str) -> Result<()> {
    let backend = Backend::open(&cfg.storage)?;
    let trace: Box<dyn TraceSink> = if cfg.trace {
        Box::new(TracingSink)
    } else {
        Box::new(NoopSink)
    };

    let projector = Projector::with_trace(backend.store(), trace);
    let mut registry = HandlerRegistry::new();
    registry.on_event(Arc::new(ProjectionHandler::new(projector, cfg.filter.clone())));

    info!(
        id = %cfg.id,
        chain = %cfg.chain,
        storage = ?cfg.storage,
        on_error = ?cfg.on_error,
        "Projection started"
    );

    let stats = run_lines(&registry, cfg, open_input(input).await?).await?;

    let stored = backend.stored()?;
    info!(
        projected = stats.projected,
        ignored = stats.ignored,
        skipped = stats.skipped,
        stored,
        "Projection finished"
    );
    println!(
        "projected: {}  ignored: {}  skipped: {}  stored entities: {}",
        stats.projected, stats.ignored, stats.skipped, stored
    );
    Ok(())
}

/// What happened to one input line that did not fail.
#[derive(Debug, PartialEq, Eq)]
enum LineOutcome {
    Projected,
    /// Not a WLD event, or emitted by a contract outside the filter.
    Ignored,
}

async fn project_line(
    registry: &HandlerRegistry,
    filter: &EventFilter,
    line: &str,
) -> Result<LineOutcome> {
    let event: DecodedEvent = serde_json::from_str(line).context("malformed event JSON")?;
    if !registry.handles(&event.schema) || !filter.matches_address(&event.address) {
        debug!(schema = %event.schema, address = %event.address, "Event ignored");
        return Ok(LineOutcome::Ignored);
    }
    registry.dispatch_event(&event).await?;
    Ok(LineOutcome::Projected)
}

/// Feed every non-blank line through the registry, applying the error policy.
async fn run_lines<R>(registry: &HandlerRegistry, cfg: &IndexerConfig, reader: R) -> Result<RunStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = RunStats::default();
    let mut line_no = 0u64;

    while let Some(line) = lines.next_line().await.context("failed reading input")? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        match (project_line(registry, &cfg.filter, &line).await, cfg.on_error) {
            (Ok(LineOutcome::Projected), _) => stats.projected += 1,
            (Ok(LineOutcome::Ignored), _) => stats.ignored += 1,
            (Err(e), ErrorPolicy::Skip) => {
                warn!(line = line_no, error = %format!("{e:#}"), "Event skipped");
                stats.skipped += 1;
            }
            (Err(e), ErrorPolicy::Abort) => {
                return Err(e.context(format!(
                    "line {line_no}: projection aborted after {} events",
                    stats.projected
                )));
            }
        }
    }
    Ok(stats)
}

fn cmd_info() -> Result<()> {
    println!("wldindex v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Event kinds and persisted entity fields:");
    for kind in EntityKind::ALL {
        println!(
            "  {:<26} id, {}, block_number, block_timestamp, transaction_hash",
            kind.as_str(),
            kind.entity_fields().join(", ")
        );
    }
    println!();
    println!("Entity id:  transaction_hash (32 bytes) ‖ log_index (4 bytes, big-endian)");
    println!("Storage:    memory | sqlite (rusqlite, WAL)");
    Ok(())
}
