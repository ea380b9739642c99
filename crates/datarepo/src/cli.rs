//! CLI command definitions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use datarepo_core::keys::{KeyConfig, KeyType};
use datarepo_core::object::DataObject;

/// Load objects into a data repository and query them by key.
#[derive(Debug, Parser)]
#[command(name = "datarepo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Storage backend.
    #[arg(long, value_enum, default_value_t = Backend::Memory, env = "DATAREPO_BACKEND")]
    pub backend: Backend,

    /// Primary index key field as `name[:str|num|date]`. Repeat in key
    /// order; the first one is required for lookups.
    #[arg(long = "key", short = 'k', required = true, value_parser = parse_key_config)]
    pub keys: Vec<KeyConfig>,

    /// JSON file holding an array of objects to load before the command runs.
    #[arg(long, short, env = "DATAREPO_DATA")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Storage backend options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Sorted in-memory records, lost on exit.
    Memory,
    /// DynamoDB table (requires the `dynamodb` feature).
    Dynamodb,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the data file objects and print one write response per object.
    Put,
    /// Look up one object by its full primary key.
    Get {
        /// JSON object carrying the primary key fields.
        #[arg(value_parser = parse_object)]
        template: DataObject,
    },
    /// List objects matching a primary key prefix.
    List {
        /// JSON object carrying a leading subset of the primary key fields.
        #[arg(value_parser = parse_object, default_value = "{}")]
        template: DataObject,
    },
}

/// Parse a `name[:type]` key flag.
pub fn parse_key_config(s: &str) -> Result<KeyConfig, String> {
    let (name, key_type) = match s.split_once(':') {
        Some((name, key_type)) => (name, Some(key_type)),
        None => (s, None),
    };
    if name.is_empty() {
        return Err("key name must not be empty".to_string());
    }

    let config = KeyConfig::new(name);
    match key_type {
        Some(key_type) => {
            let key_type = key_type.parse::<KeyType>().map_err(|e| e.to_string())?;
            Ok(config.with_type(key_type))
        }
        None => Ok(config),
    }
}

/// Parse a JSON object argument.
pub fn parse_object(s: &str) -> Result<DataObject, String> {
    serde_json::from_str(s).map_err(|e| format!("expected a JSON object: {e}"))
}

/// Read a JSON array of objects from a file.
pub fn load_objects(path: &Path) -> Result<Vec<DataObject>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} must hold a JSON array of objects", path.display()))
}
