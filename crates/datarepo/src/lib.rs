//! Storage backends for the datarepo repository abstraction.
//!
//! The pure key model, index registry and the [`DataRepo`] trait live in
//! `datarepo_core`; this crate provides the I/O side: the in-memory and
//! DynamoDB backends, environment configuration and the CLI definitions.
//!
//! [`DataRepo`]: datarepo_core::storage::DataRepo

pub mod cli;
pub mod config;
pub mod storage;
