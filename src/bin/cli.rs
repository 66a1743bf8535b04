//! TreeStore CLI
//!
//! Command-line interface for a local TreeStore directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use treestore::{Config, GetOptions, ListOptions, Result, Store, Value};

/// TreeStore CLI
#[derive(Parser, Debug)]
#[command(name = "treestore-cli")]
#[command(about = "CLI for the TreeStore directory-trie key-value store")]
#[command(version)]
struct Args {
    /// Store root directory
    #[arg(short, long, default_value = "./treestore_data")]
    root: PathBuf,

    /// JSON config file (overrides --root when given)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,

        /// Print nothing instead of failing on missing or malformed values
        #[arg(long)]
        lenient: bool,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,

        #[command(flatten)]
        kind: ValueKind,
    },

    /// Check whether a key exists
    Has {
        /// The key to check
        key: String,
    },

    /// Remove a key
    Remove {
        /// The key to remove
        key: String,
    },

    /// List present keys
    List {
        /// Skip compacting the listing log
        #[arg(long)]
        no_compact: bool,
    },

    /// Compact the listing log
    Compact,
}

/// How to interpret the value argument (string by default)
#[derive(ClapArgs, Debug)]
#[group(multiple = false)]
struct ValueKind {
    /// Store as a 64-bit integer
    #[arg(long)]
    int: bool,

    /// Store as a 64-bit float
    #[arg(long)]
    float: bool,

    /// Store as a boolean
    #[arg(long)]
    bool: bool,

    /// Store as a JSON object or array
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,treestore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::builder().root_dir(&args.root).build(),
    };
    let store = Store::open(config)?;

    match args.command {
        Commands::Get { key, lenient } => {
            let options = if lenient {
                GetOptions::lenient()
            } else {
                GetOptions::default()
            };
            if let Some(value) = store.get_with(&key, options)? {
                println!("{}", render(&value));
            }
        }
        Commands::Set { key, value, kind } => {
            store.set(&key, parse_value(&value, &kind)?)?;
        }
        Commands::Has { key } => {
            println!("{}", store.has(&key)?);
        }
        Commands::Remove { key } => {
            let report = store.remove(&key)?;
            if let Some(e) = report.prune_error {
                tracing::warn!("Value removed, directory pruning incomplete: {}", e);
            }
        }
        Commands::List { no_compact } => {
            for key in store.list_with(ListOptions { compact: !no_compact })? {
                println!("{}", key);
            }
        }
        Commands::Compact => {
            let dropped = store.compact()?;
            println!("{} lines dropped", dropped);
        }
    }

    store.close()
}

fn parse_value(raw: &str, kind: &ValueKind) -> Result<Value> {
    let invalid = |what: &str| treestore::StoreError::Config(format!("{:?} is not a valid {}", raw, what));

    if kind.int {
        raw.parse::<i64>().map(Value::Integer).map_err(|_| invalid("integer"))
    } else if kind.float {
        raw.parse::<f64>().map(Value::Float).map_err(|_| invalid("float"))
    } else if kind.bool {
        raw.parse::<bool>().map(Value::Boolean).map_err(|_| invalid("boolean"))
    } else if kind.json {
        serde_json::from_str(raw).map(Value::Json).map_err(|_| invalid("JSON document"))
    } else {
        Ok(Value::String(raw.to_string()))
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Boolean(b) => b.to_string(),
        Value::Json(json) => json.to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::Array(array) => format!("{:?}", array),
    }
}
