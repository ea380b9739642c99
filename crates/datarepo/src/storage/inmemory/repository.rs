//! In-memory repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use datarepo_core::index::{IndexDescription, IndexRegistry};
use datarepo_core::keys::{composite_key, KeyPrefix, KeySource};
use datarepo_core::object::DataObject;
use datarepo_core::storage::{DataRepo, GetResponse, ListResponse, Result, WriteResponse};

/// A stored object with its composite primary key.
#[derive(Debug, Clone)]
struct DataRecord {
    key_string: String,
    record: DataObject,
}

/// In-memory storage backend.
///
/// Records live in a single `Vec` kept sorted by composite key string and
/// wrapped in `Arc<RwLock<_>>`; clones share the same records. Lookups are a
/// binary search, inserts shift the tail of the vector, so writes are O(n).
/// Data is not persisted and is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataRepo {
    registry: IndexRegistry,
    records: Arc<RwLock<Vec<DataRecord>>>,
}

impl InMemoryDataRepo {
    /// Creates an empty repository with no indexes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`DataRepo::provide_index`].
    pub fn with_index(mut self, index: IndexDescription) -> Self {
        self.provide_index(index);
        self
    }

    pub fn registry(&self) -> &IndexRegistry {
        &self.registry
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn key_string(&self, source: &dyn KeySource) -> Result<String> {
        let keys = self.registry.primary_keys(source)?;
        Ok(composite_key(&keys))
    }
}

#[async_trait]
impl DataRepo for InMemoryDataRepo {
    fn provide_index(&mut self, index: IndexDescription) {
        let resolved = self.registry.provide_index(index);
        tracing::debug!(
            index = %resolved.index_name,
            primary = resolved.is_primary,
            unique = resolved.is_unique,
            "Registered index"
        );
    }

    async fn get_object(&self, template: &DataObject) -> Result<GetResponse> {
        let key_string = self.key_string(template)?;
        tracing::trace!(key = %key_string, "get_object");

        let records = self.records.read().await;
        let found = records
            .binary_search_by(|rec| rec.key_string.as_str().cmp(&key_string))
            .ok()
            .map(|position| records[position].record.clone());

        tracing::debug!(key = %key_string, found = found.is_some(), "Looked up object");
        Ok(GetResponse::from_option(found))
    }

    async fn put_object(&self, object: DataObject) -> Result<WriteResponse> {
        let key_string = self.key_string(&object)?;

        let mut records = self.records.write().await;
        match records.binary_search_by(|rec| rec.key_string.as_str().cmp(&key_string)) {
            Ok(position) => {
                records[position].record = object.clone();
                tracing::debug!(key = %key_string, "Updated object");
                Ok(WriteResponse::updated(object))
            }
            Err(position) => {
                records.insert(
                    position,
                    DataRecord {
                        key_string: key_string.clone(),
                        record: object.clone(),
                    },
                );
                tracing::debug!(key = %key_string, "Created object");
                Ok(WriteResponse::created(object))
            }
        }
    }

    async fn put_objects(&self, objects: Vec<DataObject>) -> Result<Vec<WriteResponse>> {
        let mut responses = Vec::with_capacity(objects.len());
        for object in objects {
            responses.push(self.put_object(object).await?);
        }
        Ok(responses)
    }

    async fn list_objects(&self, template: &DataObject) -> Result<ListResponse> {
        let keys = self.registry.primary_prefix_keys(template)?;
        let prefix = KeyPrefix::from_keys(&keys);
        tracing::trace!(prefix = %prefix.as_str(), segments = prefix.segments(), "list_objects");

        let records = self.records.read().await;
        let start = records.partition_point(|rec| rec.key_string.as_str() < prefix.as_str());

        // Every match starts with the raw prefix string, and those keys are
        // contiguous in sorted order. Within that run, keys such as `abc`
        // for the prefix `ab` share bytes but not segments, so filter them.
        let found: Vec<DataObject> = records[start..]
            .iter()
            .take_while(|rec| rec.key_string.starts_with(prefix.as_str()))
            .filter(|rec| prefix.matches(&rec.key_string))
            .map(|rec| rec.record.clone())
            .collect();

        tracing::debug!(prefix = %prefix.as_str(), count = found.len(), "Listed objects");
        Ok(ListResponse::from_records(found))
    }
}
