//! DynamoDB key layout.
//!
//! Pure functions that map resolved primary keys onto a hash key and a range
//! key. Required key fields go into the hash key, the others into the range
//! key; each part is the escaped canonical values joined by the separator.

use datarepo_core::index::ResolvedIndex;
use datarepo_core::keys::{escape_segment, IndexableScalar, KeyConfig, KeyError, Keys};
use datarepo_core::storage::{RepositoryError, Result};

/// Range key value stored when the index has no optional fields.
pub const EMPTY_RANGE_KEY: &str = "~";

/// Hash and range key values of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdbKeys {
    pub hash_key: String,
    pub range_key: String,
}

/// How a listing constrains the range key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeCondition {
    /// No range fields given: every item under the hash key.
    Any,
    /// Every range field given.
    Equals(String),
    /// A leading subset of the range fields; the string ends with the
    /// separator so `ab` does not match `abc`.
    BeginsWith(String),
}

/// Key condition of a Query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdbKeyCondition {
    pub hash_key: String,
    pub range: RangeCondition,
}

fn segment(value: &IndexableScalar, separator: &str) -> String {
    escape_segment(&value.canonical_string(), separator).into_owned()
}

fn split_configs(index: &ResolvedIndex) -> Result<(Vec<&KeyConfig>, Vec<&KeyConfig>)> {
    let (hash, range): (Vec<&KeyConfig>, Vec<&KeyConfig>) =
        index.key_configs.iter().partition(|config| config.is_required());
    if hash.is_empty() {
        return Err(RepositoryError::InvalidData(format!(
            "Index {} has no required key field to use as hash key",
            index.index_name
        )));
    }
    Ok((hash, range))
}

/// Builds the hash and range keys of a fully keyed object.
pub fn ddb_keys(index: &ResolvedIndex, keys: &Keys, separator: &str) -> Result<DdbKeys> {
    let (hash, range) = split_configs(index)?;

    let join = |configs: &[&KeyConfig]| -> Result<String> {
        let segments = configs
            .iter()
            .map(|config| {
                keys.get(&config.key_name)
                    .map(|value| segment(value, separator))
                    .ok_or_else(|| KeyError::IncompleteKey {
                        key_name: config.key_name.clone(),
                    })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(segments.join(separator))
    };

    let hash_key = join(&hash)?;
    let range_key = if range.is_empty() {
        EMPTY_RANGE_KEY.to_string()
    } else {
        join(&range)?
    };

    Ok(DdbKeys {
        hash_key,
        range_key,
    })
}

/// Builds the Query key condition for a key prefix.
///
/// Every hash key field must be present; range fields may be a leading
/// subset.
pub fn ddb_key_condition(
    index: &ResolvedIndex,
    keys: &Keys,
    separator: &str,
) -> Result<DdbKeyCondition> {
    let (hash, range) = split_configs(index)?;

    let hash_key = hash
        .iter()
        .map(|config| {
            keys.get(&config.key_name)
                .map(|value| segment(value, separator))
                .ok_or_else(|| KeyError::MissingRequiredKey {
                    key_name: config.key_name.clone(),
                })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?
        .join(separator);

    let range_segments: Vec<String> = range
        .iter()
        .map_while(|config| keys.get(&config.key_name))
        .map(|value| segment(value, separator))
        .collect();

    let range = if range_segments.is_empty() {
        RangeCondition::Any
    } else if range_segments.len() == range.len() {
        RangeCondition::Equals(range_segments.join(separator))
    } else {
        RangeCondition::BeginsWith(format!("{}{separator}", range_segments.join(separator)))
    };

    Ok(DdbKeyCondition { hash_key, range })
}
