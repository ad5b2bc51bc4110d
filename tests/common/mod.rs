//! Shared helpers for the integration suites.

#![allow(dead_code)]

pub use chronoshard::prelude::*;
pub use chronoshard::{format, Bucket, KvStore, MemoryEngine, RedbEngine, ReadTxn, StorageEngine};
pub use std::sync::Arc;
pub use tempfile::TempDir;

/// A redb-backed shard in a fresh temporary directory.
///
/// Keep the `TempDir` alive for as long as the shard is used.
pub fn disk_shard() -> (TempDir, Shard<RedbEngine>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let shard = Shard::builder()
        .path(dir.path())
        .no_durability()
        .open()
        .expect("open shard");
    (dir, shard)
}

/// A shard whose stores live in memory.
pub fn memory_shard() -> Shard<MemoryEngine> {
    Shard::ephemeral()
}

/// `count` float points for `name` with timestamps `1..=count`.
pub fn series_with_points(name: &str, fields: &[&str], count: i64) -> Series {
    let mut series = Series::new(name, fields.iter().copied());
    for ts in 1..=count {
        let values = (0..fields.len())
            .map(|i| FieldValue::Float(ts as f64 + i as f64 / 10.0))
            .collect();
        series = series.with_point(ts, 0, values);
    }
    series
}

/// Run a query and collect every result series.
pub fn query<E: StorageEngine>(shard: &Arc<Shard<E>>, spec: &QuerySpec) -> Result<Vec<Series>> {
    let mut out: Vec<Series> = Vec::new();
    Executor::new(Arc::clone(shard)).query(spec, &mut out)?;
    Ok(out)
}

/// Every series in `database`, as returned by a select over all series.
pub fn read_all<E: StorageEngine>(shard: &Arc<Shard<E>>, database: &str) -> Vec<Series> {
    query(shard, &QuerySpec::select_all(database)).expect("select all")
}

/// Names returned by `list series`.
pub fn list_names<E: StorageEngine>(shard: &Arc<Shard<E>>, database: &str) -> Vec<String> {
    let out = query(shard, &QuerySpec::list_series(database)).expect("list series");
    out[0]
        .points
        .iter()
        .filter_map(|p| p.values[0].as_str().map(str::to_string))
        .collect()
}

/// Raw keys of one bucket.
pub fn bucket_keys<E: StorageEngine>(shard: &Shard<E>, database: &str, bucket: Bucket) -> Vec<Vec<u8>> {
    let store = shard.open_or_get(database).expect("open store");
    store
        .view(|txn| txn.range(bucket, b"", None))
        .expect("range scan")
        .into_iter()
        .map(|(key, _)| key)
        .collect()
}
