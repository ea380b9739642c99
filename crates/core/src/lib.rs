//! Backend-agnostic data repository core.
//!
//! This crate holds the pure parts of the repository abstraction: the value
//! model for data objects, key extraction and validation, index registration,
//! and the [`storage::DataRepo`] contract that every backend implements.
//! Nothing in here performs I/O.

pub mod datetime;
pub mod index;
pub mod keys;
pub mod object;
pub mod storage;
