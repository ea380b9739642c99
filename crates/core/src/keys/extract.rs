//! Key extraction: pulling validated key values out of objects.

use serde::{Deserialize, Serialize};

use crate::datetime::parse_iso;
use crate::object::{DataObject, Value};

use super::{IndexableScalar, KeyError, KeyType};

/// Describes one field of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyConfig {
    pub key_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<KeyType>,
    /// Whether a value is mandatory for a lookup. Unset means "not required",
    /// except for the first field of a registered index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_for_lookup: Option<bool>,
}

impl KeyConfig {
    pub fn new(key_name: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            key_type: None,
            required_for_lookup: None,
        }
    }

    pub fn with_type(mut self, key_type: KeyType) -> Self {
        self.key_type = Some(key_type);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required_for_lookup = Some(required);
        self
    }

    pub fn is_required(&self) -> bool {
        self.required_for_lookup.unwrap_or(false)
    }
}

/// Controls how strict a key extraction is.
///
/// Point reads and writes need every key field ([`KeyOptions::FULL`]);
/// listing accepts a leading prefix of them ([`KeyOptions::PREFIX`]).
/// A `required_for_lookup` flag on a config always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOptions {
    pub allow_partial: bool,
    pub allow_skips: bool,
}

impl KeyOptions {
    pub const FULL: Self = Self {
        allow_partial: false,
        allow_skips: false,
    };

    pub const PREFIX: Self = Self {
        allow_partial: true,
        allow_skips: false,
    };
}

impl Default for KeyOptions {
    fn default() -> Self {
        Self::PREFIX
    }
}

/// A resolved key field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    pub key_name: String,
    pub value: IndexableScalar,
}

impl Key {
    pub fn new(key_name: impl Into<String>, value: impl Into<IndexableScalar>) -> Self {
        Self {
            key_name: key_name.into(),
            value: value.into(),
        }
    }
}

/// The resolved key values of an object, in index order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keys(Vec<Key>);

impl Keys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: Key) {
        self.0.push(key);
    }

    pub fn get(&self, key_name: &str) -> Option<&IndexableScalar> {
        self.0
            .iter()
            .find(|key| key.key_name == key_name)
            .map(|key| &key.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Key> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Turns the keys back into a lookup template.
    pub fn to_object(&self) -> DataObject {
        self.0
            .iter()
            .map(|key| (key.key_name.clone(), Value::from(key.value.clone())))
            .collect()
    }
}

impl FromIterator<Key> for Keys {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Keys {
    type Item = Key;
    type IntoIter = std::vec::IntoIter<Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Keys {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Anything key values can be looked up in: a (partial) object or an
/// already-resolved [`Keys`] list.
pub trait KeySource {
    /// Finds the field named `key_name` and classifies it.
    ///
    /// Returns `Ok(None)` when the field is absent.
    fn key_value(&self, key_name: &str) -> Result<Option<IndexableScalar>, KeyError>;
}

impl KeySource for DataObject {
    fn key_value(&self, key_name: &str) -> Result<Option<IndexableScalar>, KeyError> {
        self.get(key_name).map(IndexableScalar::try_from).transpose()
    }
}

impl KeySource for Keys {
    fn key_value(&self, key_name: &str) -> Result<Option<IndexableScalar>, KeyError> {
        Ok(self.get(key_name).cloned())
    }
}

/// Gets the value of a single key field from `source`.
///
/// Returns `Ok(None)` when the field is absent and not required. A string
/// holding an RFC 3339 timestamp is read as a date when the config is typed
/// `date`. A present value whose type disagrees with `config.key_type` is a
/// [`KeyError::KeyTypeMismatch`].
pub fn get_value_for_key<S>(
    source: &S,
    config: &KeyConfig,
) -> Result<Option<IndexableScalar>, KeyError>
where
    S: KeySource + ?Sized,
{
    let Some(value) = source.key_value(&config.key_name)? else {
        if config.is_required() {
            return Err(KeyError::MissingRequiredKey {
                key_name: config.key_name.clone(),
            });
        }
        return Ok(None);
    };

    // Dates arrive from JSON as strings; a date key reads them as dates.
    let value = match (config.key_type, value) {
        (Some(KeyType::Date), IndexableScalar::String(s)) => match parse_iso(&s) {
            Some(date) => IndexableScalar::Date(date),
            None => IndexableScalar::String(s),
        },
        (_, value) => value,
    };

    if let Some(expected) = config.key_type {
        let actual = value.key_type();
        if expected != actual {
            return Err(KeyError::KeyTypeMismatch {
                key_name: config.key_name.clone(),
                expected,
                actual,
            });
        }
    }

    Ok(Some(value))
}

/// Gets the values of every field in `configs`, in order.
///
/// Absent fields are left out of the result. Without `allow_partial` an
/// absent field is an [`KeyError::IncompleteKey`]; without `allow_skips` a
/// value that follows an absent field is a [`KeyError::NonPrefixKey`], so
/// the result is always a prefix of `configs` unless skips are allowed.
pub fn get_values_for_keys<S>(
    source: &S,
    configs: &[KeyConfig],
    options: KeyOptions,
) -> Result<Keys, KeyError>
where
    S: KeySource + ?Sized,
{
    let mut keys = Keys::new();
    let mut skipped = false;

    for config in configs {
        match get_value_for_key(source, config)? {
            Some(value) => {
                if skipped && !options.allow_skips {
                    return Err(KeyError::NonPrefixKey {
                        key_name: config.key_name.clone(),
                    });
                }
                keys.push(Key {
                    key_name: config.key_name.clone(),
                    value,
                });
            }
            None if !options.allow_partial => {
                return Err(KeyError::IncompleteKey {
                    key_name: config.key_name.clone(),
                });
            }
            None => skipped = true,
        }
    }

    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    const ALL_TYPES: [KeyType; 3] = [KeyType::Str, KeyType::Num, KeyType::Date];

    fn jan_first() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()
    }

    fn single_field_object() -> DataObject {
        DataObject::new()
            .with("strValue", "This is a string")
            .with("numValue", 818)
            .with("dateValue", jan_first())
            .with("objectValue", DataObject::new().with("should", "fail"))
            .with("boolValue", false)
    }

    fn test_data_object() -> DataObject {
        DataObject::new()
            .with("boolValue", false)
            .with("strValue", "value1")
            .with("strValue2", "value2")
            .with("dateValue", Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
            .with("dateValue2", jan_first())
            .with("numValue", 103)
            .with("numValue2", 691.49)
    }

    fn str_config() -> KeyConfig {
        KeyConfig::new("strValue")
            .with_type(KeyType::Str)
            .required(true)
    }

    fn num_config() -> KeyConfig {
        KeyConfig::new("numValue")
            .with_type(KeyType::Num)
            .required(false)
    }

    fn date_config() -> KeyConfig {
        KeyConfig::new("dateValue")
            .with_type(KeyType::Date)
            .required(false)
    }

    // ==================== get_value_for_key ====================

    #[test]
    fn test_gets_typed_values() {
        let obj = single_field_object();
        let cases = [
            ("strValue", KeyType::Str, IndexableScalar::from("This is a string")),
            ("numValue", KeyType::Num, IndexableScalar::from(818)),
            ("dateValue", KeyType::Date, IndexableScalar::from(jan_first())),
        ];

        for (name, key_type, expected) in cases {
            let config = KeyConfig::new(name).with_type(key_type).required(true);
            assert_eq!(get_value_for_key(&obj, &config), Ok(Some(expected)));

            for other in ALL_TYPES.into_iter().filter(|t| *t != key_type) {
                let config = KeyConfig::new(name).with_type(other).required(true);
                let err = get_value_for_key(&obj, &config).unwrap_err();
                assert!(
                    err.to_string().starts_with("Config specified type"),
                    "{name} as {other}: {err}"
                );
            }
        }
    }

    #[test]
    fn test_untyped_config_accepts_any_scalar() {
        let obj = single_field_object();
        let config = KeyConfig::new("numValue");
        assert_eq!(
            get_value_for_key(&obj, &config),
            Ok(Some(IndexableScalar::Number(818.0)))
        );
    }

    #[test]
    fn test_object_value_is_invalid_key_type() {
        let obj = single_field_object();
        let config = KeyConfig::new("objectValue")
            .with_type(KeyType::Str)
            .required(true);
        assert_eq!(
            get_value_for_key(&obj, &config),
            Err(KeyError::InvalidKeyType { shape: "object" })
        );
    }

    #[test]
    fn test_boolean_value_is_invalid_key_type() {
        let obj = single_field_object();
        let config = KeyConfig::new("boolValue")
            .with_type(KeyType::Num)
            .required(true);
        assert_eq!(
            get_value_for_key(&obj, &config),
            Err(KeyError::InvalidKeyType { shape: "boolean" })
        );
    }

    #[test]
    fn test_absent_required_value_fails() {
        let obj = single_field_object();
        let config = KeyConfig::new("undefValue")
            .with_type(KeyType::Str)
            .required(true);
        let err = get_value_for_key(&obj, &config).unwrap_err();
        assert!(err.to_string().contains("is required"));
    }

    #[test]
    fn test_absent_optional_value_is_none() {
        let obj = single_field_object();
        let config = KeyConfig::new("undefValue")
            .with_type(KeyType::Str)
            .required(false);
        assert_eq!(get_value_for_key(&obj, &config), Ok(None));
    }

    #[test]
    fn test_looks_up_in_resolved_keys() {
        let keys: Keys = [Key::new("a", "x"), Key::new("b", 5)].into_iter().collect();
        let config = KeyConfig::new("b").with_type(KeyType::Num);
        assert_eq!(
            get_value_for_key(&keys, &config),
            Ok(Some(IndexableScalar::Number(5.0)))
        );
        assert_eq!(get_value_for_key(&keys, &KeyConfig::new("c")), Ok(None));
    }

    // ==================== get_values_for_keys ====================

    #[test]
    fn test_gets_one_key() {
        let keys =
            get_values_for_keys(&test_data_object(), &[str_config()], KeyOptions::default())
                .unwrap();
        assert_eq!(keys, [Key::new("strValue", "value1")].into_iter().collect());
    }

    #[test]
    fn test_gets_two_keys() {
        let keys = get_values_for_keys(
            &test_data_object(),
            &[str_config(), num_config()],
            KeyOptions::default(),
        )
        .unwrap();
        assert_eq!(
            keys,
            [Key::new("strValue", "value1"), Key::new("numValue", 103)]
                .into_iter()
                .collect()
        );
    }

    #[test]
    fn test_fails_on_missing_key() {
        let mut obj = test_data_object();
        obj.remove("numValue");
        let err = get_values_for_keys(
            &obj,
            &[str_config(), num_config()],
            KeyOptions {
                allow_partial: false,
                allow_skips: false,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("did not find value for numValue"));
    }

    #[test]
    fn test_partial_prefix_omits_missing_tail() {
        let mut obj = test_data_object();
        obj.remove("numValue");
        obj.remove("dateValue");
        let keys = get_values_for_keys(
            &obj,
            &[str_config(), num_config(), date_config()],
            KeyOptions::PREFIX,
        )
        .unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys.get("strValue"), Some(&IndexableScalar::from("value1")));
    }

    #[test]
    fn test_allows_skipped_key() {
        let mut obj = test_data_object();
        obj.remove("numValue");
        let keys = get_values_for_keys(
            &obj,
            &[str_config(), num_config(), date_config()],
            KeyOptions {
                allow_partial: true,
                allow_skips: true,
            },
        )
        .unwrap();

        let names: Vec<&str> = keys.iter().map(|k| k.key_name.as_str()).collect();
        assert_eq!(names, ["strValue", "dateValue"]);
        assert_eq!(
            keys.get("dateValue"),
            Some(&IndexableScalar::from(
                Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
            ))
        );
    }

    #[test]
    fn test_fails_on_skipped_key() {
        let mut obj = test_data_object();
        obj.remove("numValue");
        let err = get_values_for_keys(
            &obj,
            &[str_config(), num_config(), date_config()],
            KeyOptions::PREFIX,
        )
        .unwrap_err();
        assert_eq!(
            err,
            KeyError::NonPrefixKey {
                key_name: "dateValue".to_string()
            }
        );
    }

    #[test]
    fn test_skip_before_only_value() {
        let obj = DataObject::new().with("b", 5);
        let configs = [KeyConfig::new("a"), KeyConfig::new("b"), KeyConfig::new("c")];

        let err = get_values_for_keys(&obj, &configs, KeyOptions::PREFIX).unwrap_err();
        assert!(matches!(err, KeyError::NonPrefixKey { key_name } if key_name == "b"));

        let keys = get_values_for_keys(
            &obj,
            &configs,
            KeyOptions {
                allow_partial: true,
                allow_skips: true,
            },
        )
        .unwrap();
        assert_eq!(keys, [Key::new("b", 5)].into_iter().collect());
    }

    #[test]
    fn test_required_flag_wins_over_allow_partial() {
        let obj = DataObject::new().with("b", 5);
        let configs = [KeyConfig::new("a").required(true), KeyConfig::new("b")];
        let err = get_values_for_keys(
            &obj,
            &configs,
            KeyOptions {
                allow_partial: true,
                allow_skips: true,
            },
        )
        .unwrap_err();
        assert!(matches!(err, KeyError::MissingRequiredKey { .. }));
    }

    #[test]
    fn test_str_key_keeps_timestamp_text() {
        let obj = DataObject::new().with("id", "2023-01-01T00:00:00+02:00");
        let config = KeyConfig::new("id").with_type(KeyType::Str).required(true);
        assert_eq!(
            get_value_for_key(&obj, &config),
            Ok(Some(IndexableScalar::from("2023-01-01T00:00:00+02:00")))
        );
    }

    #[test]
    fn test_date_key_reads_timestamp_strings() {
        let obj = DataObject::new()
            .with("ts", "2022-01-01T02:00:00+02:00")
            .with("label", "jan");

        let config = KeyConfig::new("ts").with_type(KeyType::Date);
        assert_eq!(
            get_value_for_key(&obj, &config),
            Ok(Some(IndexableScalar::from(jan_first())))
        );

        let config = KeyConfig::new("label").with_type(KeyType::Date);
        assert!(matches!(
            get_value_for_key(&obj, &config),
            Err(KeyError::KeyTypeMismatch {
                expected: KeyType::Date,
                actual: KeyType::Str,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_and_empty_string_are_values() {
        let obj = DataObject::new().with("a", "").with("b", 0);
        let keys = get_values_for_keys(
            &obj,
            &[KeyConfig::new("a"), KeyConfig::new("b")],
            KeyOptions::FULL,
        )
        .unwrap();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_keys_to_object_round_trips_through_lookup() {
        let keys: Keys = [Key::new("name", "measure1"), Key::new("ts", jan_first())]
            .into_iter()
            .collect();
        let template = keys.to_object();
        let configs = [KeyConfig::new("name"), KeyConfig::new("ts")];
        assert_eq!(
            get_values_for_keys(&template, &configs, KeyOptions::FULL),
            Ok(keys)
        );
    }

    #[test]
    fn test_key_config_serde_camel_case() {
        let config: KeyConfig = serde_json::from_str(
            r#"{"keyName": "userId", "keyType": "num", "requiredForLookup": true}"#,
        )
        .unwrap();
        assert_eq!(
            config,
            KeyConfig::new("userId").with_type(KeyType::Num).required(true)
        );
    }
}
