use clap::Parser;
use miette::{IntoDiagnostic, Result};
use points_ledger::application::engine::LedgerEngine;
use points_ledger::config::{self, LedgerConfig, SeedConfig};
use points_ledger::domain::ports::StateStoreBox;
use points_ledger::infrastructure::clock::SystemClock;
use points_ledger::infrastructure::in_memory::InMemoryStateStore;
use points_ledger::interfaces::csv::invocation_reader::InvocationReader;
use points_ledger::interfaces::dispatch::Dispatcher;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file of invocations, one `operation,arg1,arg2,...` per line
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// TOML file with accounts and contracts to seed the ledger with before
    /// replaying the input. Also enables the `init` operation.
    #[arg(long)]
    seed: Option<PathBuf>,

    /// TOML file with engine settings
    #[arg(long)]
    config: Option<PathBuf>,
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<PathBuf>) -> Result<StateStoreBox> {
    use points_ledger::infrastructure::rocksdb::RocksDBStore;

    Ok(match db_path {
        Some(path) => Box::new(RocksDBStore::open(path).into_diagnostic()?),
        None => Box::new(InMemoryStateStore::new()),
    })
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<PathBuf>) -> Result<StateStoreBox> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Box::new(InMemoryStateStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let ledger_config: LedgerConfig = match &cli.config {
        Some(path) => config::load(path).into_diagnostic()?,
        None => LedgerConfig::default(),
    };
    let seed: Option<SeedConfig> = match &cli.seed {
        Some(path) => Some(config::load(path).into_diagnostic()?),
        None => None,
    };

    let store = open_store(cli.db_path)?;
    let engine = LedgerEngine::new(store, Box::new(SystemClock), ledger_config);
    let dispatcher = match seed {
        Some(seed) => {
            engine.seed(&seed).await.into_diagnostic()?;
            Dispatcher::new(engine).with_seed(seed)
        }
        None => Dispatcher::new(engine),
    };

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = InvocationReader::new(file);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for invocation in reader.invocations() {
        match invocation {
            Ok(invocation) => {
                match dispatcher
                    .invoke(&invocation.operation, &invocation.args)
                    .await
                {
                    Ok(bytes) => {
                        out.write_all(&bytes).into_diagnostic()?;
                        writeln!(out).into_diagnostic()?;
                    }
                    Err(e) => {
                        eprintln!("Error invoking {}: {}", invocation.operation, e);
                    }
                }
            }
            Err(e) => {
                eprintln!("Error reading invocation: {}", e);
            }
        }
    }

    out.flush().into_diagnostic()?;
    Ok(())
}
