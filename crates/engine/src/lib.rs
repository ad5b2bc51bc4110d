//! Shard engine for Chronoshard
//!
//! This crate owns the per-shard state and the write path:
//! - [`Shard`]: registry of open database stores with lazy open, database
//!   drop and bulk close, all serialized by one lock
//! - [`write`]: the batched write transaction that keeps the `series` and
//!   `fields` indexes consistent with point data
//! - [`ShardBuilder`] / [`ShardConfig`]: shard configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod shard;
pub mod write;

pub use chronoshard_storage::DurabilityMode;
pub use config::{ShardBuilder, ShardConfig};
pub use shard::Shard;
pub use write::WriteSummary;
