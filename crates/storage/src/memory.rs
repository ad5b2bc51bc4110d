//! In-memory storage engine.
//!
//! Keeps every bucket in a `BTreeMap` and honours the same transaction
//! contract as the redb engine, so shards can run without touching disk.
//!
//! # Design
//!
//! - Stores live in a `DashMap` keyed by path: reopening a path returns the
//!   same data, `destroy` forgets it.
//! - Committed data sits behind a `parking_lot::RwLock`. Readers take a
//!   shared guard for the duration of a view.
//! - A write transaction holds the upgradable guard (one writer at a time,
//!   readers unaffected) and stages mutations in a private overlay. Commit
//!   upgrades to exclusive and applies the overlay; rollback drops it.

use crate::format::Bucket;
use crate::traits::{Entry, KvStore, ReadTxn, StorageEngine, WriteTxn};
use chronoshard_core::Result;
use dashmap::DashMap;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type Buckets = [BTreeMap<Vec<u8>, Vec<u8>>; 3];
type Overlay = [BTreeMap<Vec<u8>, Option<Vec<u8>>>; 3];

fn bounds<'a>(start: &'a [u8], end: Option<&'a [u8]>) -> Option<(Bound<&'a [u8]>, Bound<&'a [u8]>)> {
    match end {
        Some(end) if start >= end => None,
        Some(end) => Some((Bound::Included(start), Bound::Excluded(end))),
        None => Some((Bound::Included(start), Bound::Unbounded)),
    }
}

/// Engine that keeps stores in process memory.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    stores: DashMap<PathBuf, Arc<RwLock<Buckets>>>,
}

impl MemoryEngine {
    /// Create an engine with no stores
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stores that currently exist
    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    /// Check if a store exists at `path`
    pub fn contains(&self, path: &Path) -> bool {
        self.stores.contains_key(path)
    }
}

impl StorageEngine for MemoryEngine {
    type Store = MemoryStore;

    fn name(&self) -> &'static str {
        "memory"
    }

    fn open(&self, path: &Path) -> Result<MemoryStore> {
        let data = self
            .stores
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(RwLock::new(Buckets::default())))
            .clone();
        Ok(MemoryStore { data })
    }

    fn destroy(&self, path: &Path) -> std::io::Result<()> {
        match self.stores.remove(path) {
            Some(_) => Ok(()),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no in-memory store at {}", path.display()),
            )),
        }
    }
}

/// Handle to one in-memory store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    data: Arc<RwLock<Buckets>>,
}

impl KvStore for MemoryStore {
    fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T>,
    {
        let guard = self.data.upgradable_read();
        let mut txn = MemoryWriteTxn {
            base: &guard,
            overlay: Overlay::default(),
        };

        let value = f(&mut txn)?;
        let overlay = txn.overlay;

        let mut data = RwLockUpgradableReadGuard::upgrade(guard);
        for bucket in Bucket::ALL {
            let committed = &mut data[bucket.index()];
            for (key, staged) in overlay[bucket.index()].iter() {
                match staged {
                    Some(value) => {
                        committed.insert(key.clone(), value.clone());
                    }
                    None => {
                        committed.remove(key);
                    }
                }
            }
        }
        Ok(value)
    }

    fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T>,
    {
        let guard = self.data.read();
        f(&MemoryReadTxn { data: &guard })
    }
}

struct MemoryReadTxn<'a> {
    data: &'a Buckets,
}

impl ReadTxn for MemoryReadTxn<'_> {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data[bucket.index()].get(key).cloned())
    }

    fn range(&self, bucket: Bucket, start: &[u8], end: Option<&[u8]>) -> Result<Vec<Entry>> {
        let Some(range) = bounds(start, end) else {
            return Ok(Vec::new());
        };
        Ok(self.data[bucket.index()]
            .range::<[u8], _>(range)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

struct MemoryWriteTxn<'a> {
    base: &'a Buckets,
    overlay: Overlay,
}

impl ReadTxn for MemoryWriteTxn<'_> {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.overlay[bucket.index()].get(key) {
            Some(staged) => Ok(staged.clone()),
            None => Ok(self.base[bucket.index()].get(key).cloned()),
        }
    }

    fn range(&self, bucket: Bucket, start: &[u8], end: Option<&[u8]>) -> Result<Vec<Entry>> {
        let Some(range) = bounds(start, end) else {
            return Ok(Vec::new());
        };

        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self.base[bucket.index()]
            .range::<[u8], _>(range)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for (key, staged) in self.overlay[bucket.index()].range::<[u8], _>(range) {
            match staged {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}

impl WriteTxn for MemoryWriteTxn<'_> {
    fn put(&mut self, bucket: Bucket, key: &[u8], value: &[u8]) -> Result<()> {
        self.overlay[bucket.index()].insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, bucket: Bucket, key: &[u8]) -> Result<bool> {
        let existed = self.get(bucket, key)?.is_some();
        self.overlay[bucket.index()].insert(key.to_vec(), None);
        Ok(existed)
    }
}
