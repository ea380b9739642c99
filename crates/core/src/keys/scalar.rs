//! Indexable scalars and their canonical string form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::datetime::{iso_millis, to_iso_millis};
use crate::object::{serialize_number, Value};

use super::{KeyError, ParseKeyTypeError};

/// The runtime types a key field may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    #[serde(rename = "str")]
    Str,
    #[serde(rename = "num")]
    Num,
    #[serde(rename = "date")]
    Date,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Str => "str",
            KeyType::Num => "num",
            KeyType::Date => "date",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = ParseKeyTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "str" | "string" => Ok(KeyType::Str),
            "num" | "number" => Ok(KeyType::Num),
            "date" => Ok(KeyType::Date),
            _ => Err(ParseKeyTypeError(s.to_string())),
        }
    }
}

/// A value that can take part in a key: a string, a number or a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexableScalar {
    Number(#[serde(serialize_with = "serialize_number")] f64),
    #[serde(skip_deserializing)]
    Date(#[serde(serialize_with = "iso_millis::serialize")] DateTime<Utc>),
    String(String),
}

impl IndexableScalar {
    pub fn key_type(&self) -> KeyType {
        match self {
            IndexableScalar::String(_) => KeyType::Str,
            IndexableScalar::Number(_) => KeyType::Num,
            IndexableScalar::Date(_) => KeyType::Date,
        }
    }

    /// The lookup-safe string form of the scalar.
    pub fn canonical_string(&self) -> String {
        match self {
            IndexableScalar::String(s) => s.clone(),
            IndexableScalar::Number(n) => number_to_string(*n),
            IndexableScalar::Date(d) => to_iso_millis(d),
        }
    }
}

/// Textual form of a number; `-0` and `0` are the same key.
fn number_to_string(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl TryFrom<&Value> for IndexableScalar {
    type Error = KeyError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(IndexableScalar::String(s.clone())),
            Value::Number(n) => Ok(IndexableScalar::Number(*n)),
            Value::Date(d) => Ok(IndexableScalar::Date(*d)),
            other => Err(KeyError::InvalidKeyType {
                shape: other.shape(),
            }),
        }
    }
}

impl From<IndexableScalar> for Value {
    fn from(scalar: IndexableScalar) -> Self {
        match scalar {
            IndexableScalar::String(s) => Value::String(s),
            IndexableScalar::Number(n) => Value::Number(n),
            IndexableScalar::Date(d) => Value::Date(d),
        }
    }
}

impl From<&str> for IndexableScalar {
    fn from(value: &str) -> Self {
        IndexableScalar::String(value.to_string())
    }
}

impl From<String> for IndexableScalar {
    fn from(value: String) -> Self {
        IndexableScalar::String(value)
    }
}

impl From<f64> for IndexableScalar {
    fn from(value: f64) -> Self {
        IndexableScalar::Number(value)
    }
}

impl From<i32> for IndexableScalar {
    fn from(value: i32) -> Self {
        IndexableScalar::Number(f64::from(value))
    }
}

impl From<DateTime<Utc>> for IndexableScalar {
    fn from(value: DateTime<Utc>) -> Self {
        IndexableScalar::Date(value)
    }
}

/// Classifies a field value as a key type.
///
/// `None` (the field is absent) classifies as `Ok(None)`. Any present value
/// that is not a string, number or date, including `null` and booleans, is
/// an [`KeyError::InvalidKeyType`].
pub fn key_type_of(value: Option<&Value>) -> Result<Option<KeyType>, KeyError> {
    value
        .map(|v| IndexableScalar::try_from(v).map(|scalar| scalar.key_type()))
        .transpose()
}

/// Canonicalizes any scalar field value into a string.
///
/// Booleans render as `true`/`false`. Absent fields, `null`, arrays and
/// objects have no canonical string and yield `None`; they must never end up
/// inside a composite key.
pub fn scalar_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_to_string(*n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Date(d) => Some(to_iso_millis(d)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::DataObject;

    fn date(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    // ==================== key_type_of ====================

    #[test]
    fn test_key_type_of_string() {
        let value = Value::from("This is a string");
        assert_eq!(key_type_of(Some(&value)), Ok(Some(KeyType::Str)));
    }

    #[test]
    fn test_key_type_of_number() {
        let value = Value::from(852);
        assert_eq!(key_type_of(Some(&value)), Ok(Some(KeyType::Num)));
    }

    #[test]
    fn test_key_type_of_date() {
        let value = Value::from(Utc::now());
        assert_eq!(key_type_of(Some(&value)), Ok(Some(KeyType::Date)));
    }

    #[test]
    fn test_key_type_of_absent() {
        assert_eq!(key_type_of(None), Ok(None));
    }

    #[test]
    fn test_key_type_of_object_fails() {
        let value = Value::Object(DataObject::new().with("an", "object"));
        assert_eq!(
            key_type_of(Some(&value)),
            Err(KeyError::InvalidKeyType { shape: "object" })
        );
    }

    #[test]
    fn test_key_type_of_array_fails() {
        let value = Value::Array(vec![Value::from(1)]);
        assert!(matches!(
            key_type_of(Some(&value)),
            Err(KeyError::InvalidKeyType { shape: "array" })
        ));
    }

    #[test]
    fn test_key_type_of_boolean_and_null_fail() {
        assert!(key_type_of(Some(&Value::Bool(false))).is_err());
        assert!(key_type_of(Some(&Value::Null)).is_err());
    }

    // ==================== scalar_to_string ====================

    #[test]
    fn test_scalar_to_string_string() {
        let value = Value::from("Data-driven testing is cool");
        assert_eq!(
            scalar_to_string(Some(&value)),
            Some("Data-driven testing is cool".to_string())
        );
    }

    #[test]
    fn test_scalar_to_string_date() {
        let value = Value::Date(date("1977-12-19T03:30:45.912-08:00"));
        assert_eq!(
            scalar_to_string(Some(&value)),
            Some("1977-12-19T11:30:45.912Z".to_string())
        );
    }

    #[test]
    fn test_scalar_to_string_numbers() {
        assert_eq!(scalar_to_string(Some(&Value::from(382))), Some("382".into()));
        assert_eq!(
            scalar_to_string(Some(&Value::from(691.49))),
            Some("691.49".into())
        );
        assert_eq!(scalar_to_string(Some(&Value::from("382"))), Some("382".into()));
    }

    #[test]
    fn test_negative_zero_renders_as_zero() {
        assert_eq!(scalar_to_string(Some(&Value::from(-0.0))), Some("0".into()));
        assert_eq!(IndexableScalar::Number(-0.0).canonical_string(), "0");
        assert_eq!(IndexableScalar::Number(0.0).canonical_string(), "0");
    }

    #[test]
    fn test_scalar_to_string_boolean() {
        assert_eq!(scalar_to_string(Some(&Value::Bool(true))), Some("true".into()));
    }

    #[test]
    fn test_scalar_to_string_absent_and_null() {
        assert_eq!(scalar_to_string(None), None);
        assert_eq!(scalar_to_string(Some(&Value::Null)), None);
    }

    // ==================== KeyType ====================

    #[test]
    fn test_key_type_from_str() {
        assert_eq!("str".parse::<KeyType>(), Ok(KeyType::Str));
        assert_eq!("Number".parse::<KeyType>(), Ok(KeyType::Num));
        assert_eq!("date".parse::<KeyType>(), Ok(KeyType::Date));
        assert_eq!(
            "bool".parse::<KeyType>(),
            Err(ParseKeyTypeError("bool".to_string()))
        );
    }

    #[test]
    fn test_key_type_serde_names() {
        assert_eq!(serde_json::to_string(&KeyType::Num).unwrap(), r#""num""#);
        let parsed: KeyType = serde_json::from_str(r#""date""#).unwrap();
        assert_eq!(parsed, KeyType::Date);
    }

    #[test]
    fn test_canonical_string_matches_scalar_to_string() {
        let when = date("2023-01-01T00:00:00Z");
        for (scalar, value) in [
            (IndexableScalar::from("abc"), Value::from("abc")),
            (IndexableScalar::from(103), Value::from(103)),
            (IndexableScalar::from(when), Value::from(when)),
        ] {
            assert_eq!(Some(scalar.canonical_string()), scalar_to_string(Some(&value)));
        }
    }
}
