use std::env;

use datarepo_core::keys::{is_valid_separator, KEY_SEPARATOR};

/// Repository configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// DynamoDB table name (default: "datarepo")
    pub table_name: String,
    /// Separator between key segments in DynamoDB keys (default: "||")
    pub key_separator: String,
    /// Hash key attribute name (default: "hashKey")
    pub hash_key_name: String,
    /// Range key attribute name (default: "rangeKey")
    pub range_key_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DATAREPO_TABLE_NAME` - DynamoDB table name (default: "datarepo")
    /// - `DATAREPO_KEY_SEPARATOR` - Key segment separator (default: "||");
    ///   empty separators and ones containing `%` or hex digits are ignored
    /// - `DATAREPO_HASH_KEY_NAME` - Hash key attribute (default: "hashKey")
    /// - `DATAREPO_RANGE_KEY_NAME` - Range key attribute (default: "rangeKey")
    pub fn from_env() -> Self {
        Self {
            table_name: env_or("DATAREPO_TABLE_NAME", "datarepo"),
            key_separator: key_separator(env::var("DATAREPO_KEY_SEPARATOR").ok()),
            hash_key_name: env_or("DATAREPO_HASH_KEY_NAME", "hashKey"),
            range_key_name: env_or("DATAREPO_RANGE_KEY_NAME", "rangeKey"),
        }
    }
}

fn key_separator(value: Option<String>) -> String {
    match value {
        Some(separator) if is_valid_separator(&separator) => separator,
        Some(separator) => {
            tracing::warn!(
                separator = %separator,
                "Ignoring DATAREPO_KEY_SEPARATOR: it must be non-empty without '%' or hex digits"
            );
            KEY_SEPARATOR.to_string()
        }
        None => KEY_SEPARATOR.to_string(),
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
