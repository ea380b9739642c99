use crate::keys::{KeyOptions, KeySource, Keys};
use crate::storage::{RepositoryError, Result};

use super::{IndexDescription, ResolvedIndex};

/// Per-repository store of index descriptions.
///
/// Indexes are registered while the repository is being set up and never
/// change afterwards. The first index that resolves as primary determines
/// the physical key layout; later primary indexes are stored but ignored.
#[derive(Debug, Clone, Default)]
pub struct IndexRegistry {
    indexes: Vec<ResolvedIndex>,
    first_primary: Option<usize>,
}

impl IndexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves and stores an index, returning the resolved description.
    pub fn provide_index(&mut self, index: IndexDescription) -> &ResolvedIndex {
        let position = self.indexes.len();
        let resolved = ResolvedIndex::resolve(index, position);

        if resolved.is_primary && self.first_primary.is_none() {
            self.first_primary = Some(position);
        }

        self.indexes.push(resolved);
        &self.indexes[position]
    }

    /// Every registered index, in registration order.
    pub fn indexes(&self) -> &[ResolvedIndex] {
        &self.indexes
    }

    pub fn get_index(&self, index_name: &str) -> Option<&ResolvedIndex> {
        self.indexes.iter().find(|index| index.index_name == index_name)
    }

    /// The first index registered as primary.
    pub fn first_primary_index(&self) -> Result<&ResolvedIndex> {
        self.first_primary
            .map(|position| &self.indexes[position])
            .ok_or(RepositoryError::NoPrimaryIndex)
    }

    /// Fully specified primary keys of `source`, as needed by point reads
    /// and writes.
    pub fn primary_keys(&self, source: &dyn KeySource) -> Result<Keys> {
        let index = self.first_primary_index()?;
        Ok(index.get_keys(source, KeyOptions::FULL)?)
    }

    /// A leading prefix of the primary keys of `source`, as needed by
    /// listing.
    pub fn primary_prefix_keys(&self, source: &dyn KeySource) -> Result<Keys> {
        let index = self.first_primary_index()?;
        Ok(index.get_keys(source, KeyOptions::PREFIX)?)
    }
}
