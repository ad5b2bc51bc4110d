//! redb-backed storage engine.
//!
//! One redb file per database. Buckets map to redb tables with the same
//! names; keys and values are raw byte slices. redb provides the
//! single-writer / many-reader MVCC the transaction contract requires.

use crate::durability::DurabilityMode;
use crate::format::Bucket;
use crate::traits::{Entry, KvStore, ReadTxn, StorageEngine, WriteTxn};
use chronoshard_core::{Error, Result};
use redb::{ReadableTable, TableDefinition, TableError};
use std::path::Path;
use tracing::{debug, warn};

type BytesTable = TableDefinition<'static, &'static [u8], &'static [u8]>;

fn table(bucket: Bucket) -> BytesTable {
    TableDefinition::new(bucket.name())
}

fn storage_error(e: impl std::fmt::Display) -> Error {
    Error::Storage(e.to_string())
}

fn transaction_error(e: impl std::fmt::Display) -> Error {
    Error::Transaction(e.to_string())
}

fn collect_range<T>(table: &T, start: &[u8], end: Option<&[u8]>) -> Result<Vec<Entry>>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    if matches!(end, Some(end) if start >= end) {
        return Ok(Vec::new());
    }

    let iter = match end {
        Some(end) => table.range::<&[u8]>(start..end),
        None => table.range::<&[u8]>(start..),
    }
    .map_err(storage_error)?;

    let mut entries = Vec::new();
    for item in iter {
        let (key, value) = item.map_err(storage_error)?;
        entries.push((key.value().to_vec(), value.value().to_vec()));
    }
    Ok(entries)
}

/// Engine that stores each database in its own redb file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedbEngine {
    durability: DurabilityMode,
}

impl RedbEngine {
    /// Create an engine whose write transactions use `durability`
    pub fn new(durability: DurabilityMode) -> Self {
        Self { durability }
    }
}

impl StorageEngine for RedbEngine {
    type Store = RedbStore;

    fn name(&self) -> &'static str {
        "redb"
    }

    fn open(&self, path: &Path) -> Result<RedbStore> {
        let db = redb::Database::create(path).map_err(|e| Error::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "opened redb store");
        Ok(RedbStore {
            db,
            durability: self.durability,
        })
    }

    fn destroy(&self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// One open redb database file.
pub struct RedbStore {
    db: redb::Database,
    durability: DurabilityMode,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("durability", &self.durability)
            .finish_non_exhaustive()
    }
}

impl KvStore for RedbStore {
    fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T>,
    {
        let mut txn = self.db.begin_write().map_err(transaction_error)?;
        txn.set_durability(self.durability.into());

        let mut handle = RedbWriteTxn { txn };
        match f(&mut handle) {
            Ok(value) => {
                handle.txn.commit().map_err(transaction_error)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort_err) = handle.txn.abort() {
                    warn!(error = %abort_err, "failed to abort redb write transaction");
                }
                Err(e)
            }
        }
    }

    fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T>,
    {
        let txn = self.db.begin_read().map_err(storage_error)?;
        f(&RedbReadTxn { txn })
    }
}

struct RedbWriteTxn {
    txn: redb::WriteTransaction,
}

impl ReadTxn for RedbWriteTxn {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let table = self.txn.open_table(table(bucket)).map_err(storage_error)?;
        let value = table.get(key).map_err(storage_error)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn range(&self, bucket: Bucket, start: &[u8], end: Option<&[u8]>) -> Result<Vec<Entry>> {
        let table = self.txn.open_table(table(bucket)).map_err(storage_error)?;
        collect_range(&table, start, end)
    }
}

impl WriteTxn for RedbWriteTxn {
    fn put(&mut self, bucket: Bucket, key: &[u8], value: &[u8]) -> Result<()> {
        let mut table = self.txn.open_table(table(bucket)).map_err(storage_error)?;
        table.insert(key, value).map_err(storage_error)?;
        Ok(())
    }

    fn delete(&mut self, bucket: Bucket, key: &[u8]) -> Result<bool> {
        let mut table = self.txn.open_table(table(bucket)).map_err(storage_error)?;
        let removed = table.remove(key).map_err(storage_error)?;
        Ok(removed.is_some())
    }
}

struct RedbReadTxn {
    txn: redb::ReadTransaction,
}

impl ReadTxn for RedbReadTxn {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let table = match self.txn.open_table(table(bucket)) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(storage_error(e)),
        };
        let value = table.get(key).map_err(storage_error)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn range(&self, bucket: Bucket, start: &[u8], end: Option<&[u8]>) -> Result<Vec<Entry>> {
        let table = match self.txn.open_table(table(bucket)) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(e)),
        };
        collect_range(&table, start, end)
    }
}
