//! # Chronoshard
//!
//! Per-shard storage layer for a time-series database.
//!
//! A shard owns one base directory. Every database inside it is backed by
//! its own embedded key-value store, opened lazily on first use and cached
//! until it is dropped or the shard is closed. Writes arrive as batches of
//! [`Series`]; each batch commits atomically to one database. Queries are
//! dispatched by the [`Executor`] to one of four handlers.
//!
//! ## Quick Start
//!
//! ```ignore
//! use chronoshard::prelude::*;
//! use std::sync::Arc;
//!
//! let shard = Arc::new(Shard::open("/data/shards/0001")?);
//!
//! let batch = vec![Series::new("cpu", ["idle", "user"])
//!     .with_point(1_700_000_000, 0, vec![FieldValue::Float(0.93), FieldValue::Float(0.04)])];
//! shard.write("metrics", &batch)?;
//!
//! let executor = Executor::new(Arc::clone(&shard));
//! let mut results: Vec<Series> = Vec::new();
//! executor.query(&QuerySpec::select("metrics", ["cpu"]), &mut results)?;
//!
//! shard.close_all();
//! ```
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | `chronoshard-core` | [`Error`], [`Series`], [`Point`], [`FieldValue`] |
//! | `chronoshard-storage` | key codec, value codec, storage engines |
//! | `chronoshard-engine` | [`Shard`] registry and the write path |
//! | `chronoshard-executor` | [`Executor`] and query handlers |

#![warn(missing_docs)]

pub mod prelude;

pub use chronoshard_core::{Error, FieldValue, Point, Result, Series};
pub use chronoshard_engine::{DurabilityMode, Shard, ShardBuilder, ShardConfig, WriteSummary};
pub use chronoshard_executor::{Executor, QueryDescription, QueryKind, QueryProcessor, QuerySpec};
pub use chronoshard_storage::{Bucket, KvStore, MemoryEngine, ReadTxn, RedbEngine, StorageEngine, WriteTxn};

/// Key and value encodings of the on-disk format
pub use chronoshard_storage::format;

/// Reference query handlers
pub use chronoshard_executor::handlers;
