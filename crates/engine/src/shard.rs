//! Shard registry and lifecycle.
//!
//! A [`Shard`] covers one base directory and owns the open store handle of
//! every database it has touched, keyed by database name.
//!
//! # Locking
//!
//! One mutex guards the handle map and the closed flag. Every path that may
//! insert or evict a handle takes it: the write path, the query path's lazy
//! open ([`Shard::open_or_get`]), [`Shard::drop_database`] and
//! [`Shard::close_all`]. The lock covers only the check-and-maybe-open step.
//! Transactions run on an `Arc` clone of the handle after the lock is
//! released, so batches against different databases never contend.
//!
//! # Lifecycle
//!
//! ```text
//! open_or_get(db) ──► cached? ──yes──► handle
//!                        │no
//!                        ▼
//!                  engine.open(base/db) ──► cache ──► handle
//!
//! drop_database(db): evict + close + engine.destroy(base/db)
//! close_all():       evict + close everything, closed = true (terminal)
//! ```
//!
//! A handle evicted while a transaction still holds a clone closes once
//! that transaction finishes.

use crate::config::ShardBuilder;
use crate::write;
use chronoshard_core::{Error, Result, Series};
use chronoshard_storage::{KvStore, MemoryEngine, RedbEngine, StorageEngine};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

struct ShardState<S> {
    stores: FxHashMap<String, Arc<S>>,
    closed: bool,
}

/// One node-local storage unit: a base directory and its database stores.
pub struct Shard<E: StorageEngine = RedbEngine> {
    base_dir: PathBuf,
    engine: E,
    state: Mutex<ShardState<E::Store>>,
}

impl Shard<RedbEngine> {
    /// Create a builder for shard configuration.
    pub fn builder() -> ShardBuilder {
        ShardBuilder::new()
    }

    /// Open a redb-backed shard at `path` with default settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path).open()
    }
}

impl Shard<MemoryEngine> {
    /// Create a shard whose stores live only in memory.
    pub fn ephemeral() -> Self {
        ShardBuilder::new().open_ephemeral()
    }
}

impl<E: StorageEngine> Shard<E> {
    /// Create a shard over `engine` rooted at `base_dir`.
    ///
    /// Nothing is opened until the first write or query.
    pub fn new(base_dir: impl Into<PathBuf>, engine: E) -> Self {
        Self {
            base_dir: base_dir.into(),
            engine,
            state: Mutex::new(ShardState {
                stores: FxHashMap::default(),
                closed: false,
            }),
        }
    }

    /// The shard's base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The storage engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Path of the store file backing `database`
    pub fn store_path(&self, database: &str) -> PathBuf {
        self.base_dir.join(database)
    }

    /// Check if [`Shard::close_all`] has run.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Names of the databases with an open handle, sorted.
    pub fn databases(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.lock().stores.keys().cloned().collect();
        names.sort();
        names
    }

    /// Return the cached handle for `database`, opening (and creating) its
    /// store on first use.
    ///
    /// # Errors
    ///
    /// - `ShardClosed` after [`Shard::close_all`], whatever the name
    /// - `InvalidInput` for a name that is not a single path component
    /// - `Open` if the engine cannot open or create the store
    pub fn open_or_get(&self, database: &str) -> Result<Arc<E::Store>> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(Error::ShardClosed);
        }
        validate_database_name(database)?;

        if let Some(store) = state.stores.get(database) {
            return Ok(Arc::clone(store));
        }

        let path = self.store_path(database);
        let store = Arc::new(self.engine.open(&path)?);
        state.stores.insert(database.to_string(), Arc::clone(&store));

        info!(
            database,
            path = %path.display(),
            engine = self.engine.name(),
            "opened database store"
        );
        Ok(store)
    }

    /// Write a batch of series to `database` in one atomic transaction.
    ///
    /// Series with an empty name are skipped. Null values write nothing.
    /// On any failure inside the transaction nothing from the batch is
    /// visible and `Error::Transaction` is returned; the batch can be
    /// retried as a whole.
    pub fn write(&self, database: &str, batch: &[Series]) -> Result<()> {
        let store = self.open_or_get(database)?;

        let summary = store
            .update(|txn| write::apply_batch(txn, batch))
            .map_err(|e| match e {
                Error::Transaction(_) => e,
                other => Error::Transaction(other.to_string()),
            })?;

        debug!(
            database,
            series = summary.series,
            skipped = summary.skipped_series,
            points = summary.points,
            values = summary.values,
            "committed write batch"
        );
        Ok(())
    }

    /// Close and forget `database`, then delete its backing storage.
    ///
    /// A database with no open handle is left alone and `Ok(())` is returned.
    /// If deletion fails the handle stays evicted and `Error::Drop` is
    /// returned; the orphaned storage must be cleaned up by the caller.
    pub fn drop_database(&self, database: &str) -> Result<()> {
        let mut state = self.state.lock();

        let Some(store) = state.stores.remove(database) else {
            debug!(database, "drop of database with no open handle");
            return Ok(());
        };
        drop(store);

        let path = self.store_path(database);
        match self.engine.destroy(&path) {
            Ok(()) => {
                info!(database, path = %path.display(), "dropped database");
                Ok(())
            }
            Err(source) => {
                warn!(
                    database,
                    path = %path.display(),
                    error = %source,
                    "database handle evicted but storage could not be removed"
                );
                Err(Error::Drop {
                    database: database.to_string(),
                    source,
                })
            }
        }
    }

    /// Close every open handle and mark the shard closed. Idempotent.
    pub fn close_all(&self) {
        let mut state = self.state.lock();
        let count = state.stores.len();
        state.stores.clear();

        if !state.closed {
            state.closed = true;
            info!(path = %self.base_dir.display(), closed_stores = count, "shard closed");
        }
    }
}

impl<E: StorageEngine> std::fmt::Debug for Shard<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Shard")
            .field("base_dir", &self.base_dir)
            .field("engine", &self.engine.name())
            .field("open_stores", &state.stores.len())
            .field("closed", &state.closed)
            .finish()
    }
}

fn validate_database_name(database: &str) -> Result<()> {
    let reason = if database.is_empty() {
        "database name is empty"
    } else if database == "." || database == ".." {
        "database name is a relative path component"
    } else if database.contains(|c: char| c == '/' || c == '\\') {
        "database name contains a path separator"
    } else if database.contains('\0') {
        "database name contains a NUL byte"
    } else {
        return Ok(());
    };
    Err(Error::InvalidInput(format!("{}: {:?}", reason, database)))
}
