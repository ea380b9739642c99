//! DynamoDB storage backend implementation.
//!
//! Stores objects of the first primary index in a single table keyed by a
//! string hash key (required key fields) and a string range key (the
//! remaining key fields) using `aws-sdk-dynamodb`.

mod conversions;
mod error;
mod keys;
mod repository;

pub use keys::EMPTY_RANGE_KEY;
pub use repository::{DynamoDbDataRepo, DynamoDbOptions};
