//! In-memory storage backend.
//!
//! This is the reference implementation of [`datarepo_core::storage::DataRepo`]:
//! records are kept in one vector sorted by composite primary key, which
//! gives binary-search point lookups and contiguous prefix scans. It is meant
//! for tests and development, not for large data sets.
//!
//! # Example
//!
//! ```rust,ignore
//! use datarepo::storage::inmemory::InMemoryDataRepo;
//! use datarepo_core::index::IndexDescription;
//! use datarepo_core::keys::KeyConfig;
//!
//! let repo = InMemoryDataRepo::new()
//!     .with_index(IndexDescription::new(vec![KeyConfig::new("userId")]));
//! ```

mod repository;

pub use repository::InMemoryDataRepo;
