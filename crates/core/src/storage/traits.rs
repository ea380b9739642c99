use async_trait::async_trait;

use crate::index::IndexDescription;
use crate::object::DataObject;

use super::{GetResponse, ListResponse, Result, WriteResponse};

/// A store of data objects keyed by the fields of its primary index.
///
/// Backends receive resolved keys from an [`crate::index::IndexRegistry`]
/// and are only responsible for physical storage and retrieval. Key and
/// configuration errors come back as `Err`; misses and write outcomes are
/// ordinary responses.
#[async_trait]
pub trait DataRepo: Send + Sync {
    /// Registers an index. The first index registered becomes the primary
    /// index unless it says otherwise. Call before any reads or writes.
    fn provide_index(&mut self, index: IndexDescription);

    /// Looks up one object by its full primary key.
    async fn get_object(&self, template: &DataObject) -> Result<GetResponse>;

    /// Creates or replaces the object with the same primary key.
    async fn put_object(&self, object: DataObject) -> Result<WriteResponse>;

    /// Writes each object in order. Not atomic: an error stops the batch and
    /// leaves earlier writes in place.
    async fn put_objects(&self, objects: Vec<DataObject>) -> Result<Vec<WriteResponse>>;

    /// Lists every object whose primary key starts with the key fields given
    /// in `template`, in key order.
    async fn list_objects(&self, template: &DataObject) -> Result<ListResponse>;
}
