//! Storage layer for Chronoshard
//!
//! This crate implements the embedded store adapter and the on-disk format:
//! - [`format`]: key codec and value codec for the `series`, `fields` and
//!   `data` buckets
//! - [`StorageEngine`] / [`KvStore`]: the capability interface the shard
//!   consumes (open, destroy, atomic update, snapshot view)
//! - [`RedbEngine`]: one redb file per database
//! - [`MemoryEngine`]: ephemeral engine with the same transactional contract

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod durability;
pub mod format;
pub mod memory;
pub mod redb_engine;
pub mod traits;

pub use durability::DurabilityMode;
pub use format::Bucket;
pub use memory::{MemoryEngine, MemoryStore};
pub use redb_engine::{RedbEngine, RedbStore};
pub use traits::{KvStore, ReadTxn, StorageEngine, WriteTxn};
