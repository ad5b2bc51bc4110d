//! Capability interface over an embedded ordered key-value engine.
//!
//! The shard only needs five capabilities from its engine: open-or-create a
//! store by path, delete a store's backing storage, run an atomic
//! multi-bucket write transaction, run a read transaction over a consistent
//! snapshot, and bucket-scoped ordered get/put/delete/range inside those
//! transactions. Any engine providing them can back a shard.
//!
//! # Transaction Contract
//!
//! - `update` runs the closure inside one write transaction. If the closure
//!   returns `Ok`, every mutation commits together; if it returns `Err`, the
//!   transaction is rolled back and the closure's error is returned as-is.
//!   Failures to begin or commit are reported as `Error::Transaction`.
//! - Write transactions on one store are serialized.
//! - `view` sees a committed snapshot and is not blocked by an in-flight
//!   write transaction.
//! - Buckets are created on first write; reading a bucket that was never
//!   written behaves like reading an empty bucket.

use crate::format::Bucket;
use chronoshard_core::Result;
use std::path::Path;

/// A key-value pair returned by a range scan.
pub type Entry = (Vec<u8>, Vec<u8>);

/// Read operations available inside any transaction.
pub trait ReadTxn {
    /// Get the value stored under `key`
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Entries with `start <= key < end`, in ascending key order.
    ///
    /// `end == None` means unbounded. Returns nothing when `start >= end`.
    fn range(&self, bucket: Bucket, start: &[u8], end: Option<&[u8]>) -> Result<Vec<Entry>>;

    /// Entries whose key starts with `prefix`, in ascending key order
    fn scan_prefix(&self, bucket: Bucket, prefix: &[u8]) -> Result<Vec<Entry>> {
        let end = prefix_successor(prefix);
        self.range(bucket, prefix, end.as_deref())
    }
}

/// Mutations available inside a write transaction.
pub trait WriteTxn: ReadTxn {
    /// Insert or overwrite `key`
    fn put(&mut self, bucket: Bucket, key: &[u8], value: &[u8]) -> Result<()>;

    /// Remove `key`, returning whether it existed
    fn delete(&mut self, bucket: Bucket, key: &[u8]) -> Result<bool>;

    /// Remove every key in `[start, end)`, returning how many were removed
    fn delete_range(&mut self, bucket: Bucket, start: &[u8], end: Option<&[u8]>) -> Result<usize> {
        let entries = self.range(bucket, start, end)?;
        for (key, _) in &entries {
            self.delete(bucket, key)?;
        }
        Ok(entries.len())
    }

    /// Remove every key starting with `prefix`, returning how many were removed
    fn delete_prefix(&mut self, bucket: Bucket, prefix: &[u8]) -> Result<usize> {
        let end = prefix_successor(prefix);
        self.delete_range(bucket, prefix, end.as_deref())
    }
}

/// One open database store.
///
/// Dropping the store closes it.
pub trait KvStore: Send + Sync + 'static {
    /// Run `f` inside one atomic write transaction
    fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T>;

    /// Run `f` against a consistent read-only snapshot
    fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T>;
}

/// Opens and destroys stores by path.
pub trait StorageEngine: Send + Sync + 'static {
    /// Store handle type
    type Store: KvStore;

    /// Short engine name for logs
    fn name(&self) -> &'static str;

    /// Open the store at `path`, creating it if missing
    fn open(&self, path: &Path) -> Result<Self::Store>;

    /// Delete the backing storage at `path`.
    ///
    /// The caller must have dropped every handle to the store first.
    fn destroy(&self, path: &Path) -> std::io::Result<()>;
}

/// Smallest byte string greater than every string starting with `prefix`.
///
/// Returns `None` when no such bound exists (empty or all-`0xFF` prefix).
pub fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}
