use std::fmt;
use std::sync::Arc;

use crate::keys::{get_values_for_keys, KeyConfig, KeyError, KeyOptions, KeySource, Keys};

/// Extracts the key fields of an index from an object or a partial object.
///
/// Custom extractors may derive key values, including keys whose names do
/// not exist on the object.
pub type GetKeys =
    Arc<dyn Fn(&dyn KeySource, KeyOptions) -> Result<Keys, KeyError> + Send + Sync>;

/// Builds the default extractor for a list of key configs.
pub fn default_get_keys(configs: Vec<KeyConfig>) -> GetKeys {
    Arc::new(move |source: &dyn KeySource, options: KeyOptions| {
        get_values_for_keys(source, &configs, options)
    })
}

/// An index as supplied by the caller, before defaults are applied.
#[derive(Clone)]
pub struct IndexDescription {
    pub index_name: Option<String>,
    /// The fields of the index, in key order.
    pub key_configs: Vec<KeyConfig>,
    /// Custom extractor. `None` uses [`default_get_keys`] over the resolved
    /// key configs.
    pub get_keys: Option<GetKeys>,
    pub is_primary: Option<bool>,
    pub is_unique: Option<bool>,
}

impl IndexDescription {
    pub fn new(key_configs: Vec<KeyConfig>) -> Self {
        Self {
            index_name: None,
            key_configs,
            get_keys: None,
            is_primary: None,
            is_unique: None,
        }
    }

    pub fn with_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    pub fn with_get_keys<F>(mut self, get_keys: F) -> Self
    where
        F: Fn(&dyn KeySource, KeyOptions) -> Result<Keys, KeyError> + Send + Sync + 'static,
    {
        self.get_keys = Some(Arc::new(get_keys));
        self
    }

    pub fn primary(mut self, is_primary: bool) -> Self {
        self.is_primary = Some(is_primary);
        self
    }

    pub fn unique(mut self, is_unique: bool) -> Self {
        self.is_unique = Some(is_unique);
        self
    }
}

impl fmt::Debug for IndexDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexDescription")
            .field("index_name", &self.index_name)
            .field("key_configs", &self.key_configs)
            .field("custom_get_keys", &self.get_keys.is_some())
            .field("is_primary", &self.is_primary)
            .field("is_unique", &self.is_unique)
            .finish()
    }
}

/// An index with every default filled in.
#[derive(Clone)]
pub struct ResolvedIndex {
    pub index_name: String,
    pub key_configs: Vec<KeyConfig>,
    pub is_primary: bool,
    pub is_unique: bool,
    get_keys: GetKeys,
}

impl ResolvedIndex {
    /// Resolves `index` as the registration at position `position`.
    ///
    /// This is a pure function: the description is consumed and a new value
    /// returned. Defaults:
    /// - `is_primary`: true only for the first registration
    /// - `is_unique`: same as `is_primary`
    /// - `index_name`: `index_<position>`
    /// - the first key config is required for lookup unless it says otherwise
    pub fn resolve(index: IndexDescription, position: usize) -> Self {
        let is_primary = index.is_primary.unwrap_or(position == 0);
        let is_unique = index.is_unique.unwrap_or(is_primary);
        let index_name = index
            .index_name
            .unwrap_or_else(|| format!("index_{position}"));

        let mut key_configs = index.key_configs;
        if let Some(first) = key_configs.first_mut() {
            first.required_for_lookup.get_or_insert(true);
        }

        let get_keys = index
            .get_keys
            .unwrap_or_else(|| default_get_keys(key_configs.clone()));

        Self {
            index_name,
            key_configs,
            is_primary,
            is_unique,
            get_keys,
        }
    }

    /// Runs the index's extractor against `source`.
    pub fn get_keys(&self, source: &dyn KeySource, options: KeyOptions) -> Result<Keys, KeyError> {
        (self.get_keys)(source, options)
    }
}

impl fmt::Debug for ResolvedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedIndex")
            .field("index_name", &self.index_name)
            .field("key_configs", &self.key_configs)
            .field("is_primary", &self.is_primary)
            .field("is_unique", &self.is_unique)
            .finish_non_exhaustive()
    }
}
