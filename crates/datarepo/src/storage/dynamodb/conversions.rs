//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! data objects. These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use datarepo_core::datetime::to_iso_millis;
use datarepo_core::object::{DataObject, Value};
use datarepo_core::storage::RepositoryError;

use super::keys::DdbKeys;

pub type Item = HashMap<String, AttributeValue>;

/// Convert a field value to an attribute value.
///
/// Dates are stored as ISO strings. Non-finite numbers cannot be stored.
pub fn value_to_attribute(value: &Value) -> Result<AttributeValue, RepositoryError> {
    Ok(match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) if n.is_finite() => AttributeValue::N(n.to_string()),
        Value::Number(n) => {
            return Err(RepositoryError::InvalidData(format!(
                "Cannot store non-finite number {n}"
            )))
        }
        Value::Date(d) => AttributeValue::S(to_iso_millis(d)),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(
            values
                .iter()
                .map(value_to_attribute)
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(object) => AttributeValue::M(object_to_map(object)?),
    })
}

/// Convert an attribute value back to a field value.
///
/// Strings come back as strings, like JSON input; dates stored as ISO text
/// are read as dates again by date-typed key configs.
pub fn attribute_to_value(attribute: &AttributeValue) -> Result<Value, RepositoryError> {
    Ok(match attribute {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::L(values) => Value::Array(
            values
                .iter()
                .map(attribute_to_value)
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(map) => Value::Object(map_to_object(map)?),
        AttributeValue::Ss(values) => {
            Value::Array(values.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(values) => Value::Array(
            values
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<_, _>>()?,
        ),
        other => {
            return Err(RepositoryError::Serialization(format!(
                "Unsupported attribute value: {:?}",
                other
            )))
        }
    })
}

/// Convert a data object to a DynamoDB item with its key attributes.
///
/// Key attributes are written last, so an object field with the same name
/// as a key attribute is overwritten.
pub fn object_to_item(
    object: &DataObject,
    keys: &DdbKeys,
    hash_key_name: &str,
    range_key_name: &str,
) -> Result<Item, RepositoryError> {
    let mut item = object_to_map(object)?;

    // Keys
    item.insert(
        hash_key_name.to_string(),
        AttributeValue::S(keys.hash_key.clone()),
    );
    item.insert(
        range_key_name.to_string(),
        AttributeValue::S(keys.range_key.clone()),
    );

    Ok(item)
}

/// Convert a DynamoDB item to a data object, dropping the key attributes.
pub fn item_to_object(
    item: &Item,
    hash_key_name: &str,
    range_key_name: &str,
) -> Result<DataObject, RepositoryError> {
    item.iter()
        .filter(|(name, _)| name.as_str() != hash_key_name && name.as_str() != range_key_name)
        .map(|(name, attribute)| Ok((name.clone(), attribute_to_value(attribute)?)))
        .collect()
}

// ============================================================================
// Helpers
// ============================================================================

fn object_to_map(object: &DataObject) -> Result<Item, RepositoryError> {
    object
        .iter()
        .map(|(name, value)| Ok((name.clone(), value_to_attribute(value)?)))
        .collect()
}

fn map_to_object(map: &Item) -> Result<DataObject, RepositoryError> {
    map.iter()
        .map(|(name, attribute)| Ok((name.clone(), attribute_to_value(attribute)?)))
        .collect()
}

fn parse_number(n: &str) -> Result<f64, RepositoryError> {
    n.parse()
        .map_err(|_| RepositoryError::Serialization(format!("Invalid number attribute: {n}")))
}
