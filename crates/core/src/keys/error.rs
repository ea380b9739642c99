use thiserror::Error;

use super::KeyType;

/// Errors raised while extracting key values from an object.
///
/// These are request or index-configuration defects, never transient
/// conditions, so callers should surface them rather than retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Cannot use {shape} value as key field; type must be string, number, or date")]
    InvalidKeyType { shape: &'static str },
    #[error("Config specified type for {key_name} should be {expected}; got {actual} instead")]
    KeyTypeMismatch {
        key_name: String,
        expected: KeyType,
        actual: KeyType,
    },
    #[error("Value for {key_name} is required")]
    MissingRequiredKey { key_name: String },
    #[error("Must specify all fields in index; did not find value for {key_name}")]
    IncompleteKey { key_name: String },
    #[error(
        "Must only specify a prefix of key fields; found value for {key_name} after skipping one or more index fields"
    )]
    NonPrefixKey { key_name: String },
}

/// Error returned when a key type name cannot be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown key type: {0} (expected str, num, or date)")]
pub struct ParseKeyTypeError(pub String);
