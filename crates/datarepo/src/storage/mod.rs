//! Storage backend implementations.
//!
//! This module provides concrete implementations of the
//! `datarepo_core::storage::DataRepo` trait, selected via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): sorted in-memory records
//! - `dynamodb`: AWS DynamoDB storage backend using `aws-sdk-dynamodb`
//!
//! Both backends may be enabled at once; the CLI picks one at runtime.

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryDataRepo;

#[cfg(feature = "dynamodb")]
pub use dynamodb::{DynamoDbDataRepo, DynamoDbOptions};
