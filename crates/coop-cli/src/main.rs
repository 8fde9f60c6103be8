use clap::{Parser, Subcommand};
use colored::Colorize;
use coop_core::{LookupTables, Normalizer, NormalizerConfig, WeaponTable};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// coop - normalize cooperative match payloads into canonical records
///
/// Reads a raw payload, validates it, and prints the canonical record
/// together with its warnings and asset URLs as JSON.
#[derive(Parser)]
#[command(name = "coop", version, about, long_about = None)]
struct Cli {
    /// Weapon table: JSON object of image content hash → weapon id
    #[arg(long, global = true)]
    weapons: Option<PathBuf>,

    /// Normalizer configuration (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a history detail payload
    Detail {
        /// Path to payload .json file
        file: PathBuf,
    },

    /// Normalize a history summary payload
    History {
        /// Path to payload .json file
        file: PathBuf,
    },

    /// Normalize a schedule payload
    Schedule {
        /// Path to payload .json file
        file: PathBuf,
    },

    /// Show version information
    Version,
}

/// Why a command did not produce output
enum Failure {
    /// The payload was read but rejected (exit 1)
    Rejected(String),
    /// Files, tables or configuration could not be loaded (exit 2)
    Setup(String),
}

impl Failure {
    fn exit_code(&self) -> i32 {
        match self {
            Failure::Rejected(_) => 1,
            Failure::Setup(_) => 2,
        }
    }

    fn message(&self) -> &str {
        match self {
            Failure::Rejected(msg) | Failure::Setup(msg) => msg,
        }
    }
}

impl From<coop_core::Error> for Failure {
    fn from(err: coop_core::Error) -> Self {
        match err {
            coop_core::Error::Config(msg) => Failure::Setup(msg),
            other => Failure::Rejected(format!("[{}] {}", other.kind(), other)),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coop_core=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Detail { file } => normalize(&cli, file, |n, raw| n.normalize_history_detail(raw)),
        Commands::History { file } => normalize(&cli, file, |n, raw| n.normalize_history_summary(raw)),
        Commands::Schedule { file } => normalize(&cli, file, |n, raw| n.normalize_schedule(raw)),
        Commands::Version => {
            println!(
                "{} {} (coop-core {})",
                "coop".bold(),
                env!("CARGO_PKG_VERSION"),
                coop_core::VERSION
            );
            Ok(())
        }
    };

    let exit_code = match result {
        Ok(()) => 0,
        Err(failure) => {
            eprintln!("{} {}", "error:".red().bold(), failure.message());
            failure.exit_code()
        }
    };

    process::exit(exit_code);
}

fn normalize<T: Serialize>(
    cli: &Cli,
    file: &Path,
    run: impl FnOnce(&Normalizer, &serde_json::Value) -> coop_core::Result<T>,
) -> Result<(), Failure> {
    let tables = load_tables(cli.weapons.as_deref())?;
    let config = load_config(cli.config.as_deref())?;
    let text = read(file)?;
    let raw: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| Failure::Rejected(format!("[malformed_input] {} is not valid JSON: {}", file.display(), e)))?;

    let normalizer = Normalizer::new(&tables, config);
    let output = run(&normalizer, &raw)?;

    let json = if cli.compact {
        serde_json::to_string(&output)
    } else {
        serde_json::to_string_pretty(&output)
    }
    .map_err(|e| Failure::Setup(format!("could not serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn load_tables(weapons: Option<&Path>) -> Result<LookupTables, Failure> {
    match weapons {
        Some(path) => {
            let table = WeaponTable::from_json_str(&read(path)?)?;
            debug!(entries = table.len(), path = %path.display(), "loaded weapon table");
            Ok(LookupTables::new(table))
        }
        None => Ok(LookupTables::default()),
    }
}

fn load_config(config: Option<&Path>) -> Result<NormalizerConfig, Failure> {
    match config {
        Some(path) => toml::from_str(&read(path)?)
            .map_err(|e| Failure::Setup(format!("invalid config {}: {}", path.display(), e))),
        None => Ok(NormalizerConfig::default()),
    }
}

fn read(path: &Path) -> Result<String, Failure> {
    std::fs::read_to_string(path).map_err(|e| Failure::Setup(format!("cannot read {}: {}", path.display(), e)))
}
