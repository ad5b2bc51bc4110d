//! Database Lifecycle Tests
//!
//! Lazy open, persistence across shard instances, drop and close.

use crate::common::*;

// ============================================================================
// Lazy open
// ============================================================================

#[test]
fn first_write_creates_store_file() {
    let (dir, shard) = disk_shard();
    assert!(!dir.path().join("metrics").exists());

    shard
        .write("metrics", &[series_with_points("cpu", &["idle"], 1)])
        .unwrap();

    assert!(dir.path().join("metrics").is_file());
    assert_eq!(shard.databases(), vec!["metrics".to_string()]);
}

#[test]
fn databases_are_independent() {
    let shard = Arc::new(memory_shard());
    shard.write("a", &[series_with_points("cpu", &["v"], 2)]).unwrap();
    shard.write("b", &[series_with_points("mem", &["v"], 3)]).unwrap();

    assert_eq!(list_names(&shard, "a"), vec!["cpu".to_string()]);
    assert_eq!(list_names(&shard, "b"), vec!["mem".to_string()]);
    assert_eq!(shard.databases(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let shard = Shard::builder().path(dir.path()).strict().open().unwrap();
        shard
            .write("metrics", &[series_with_points("cpu", &["idle", "user"], 3)])
            .unwrap();
        shard.close_all();
    }

    let shard = Arc::new(Shard::open(dir.path()).unwrap());
    let out = read_all(&shard, "metrics");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].points.len(), 3);
    assert_eq!(out[0].points[2].values[1], FieldValue::Float(3.1));
}

#[test]
fn missing_base_dir_without_create_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = Shard::builder()
        .path(dir.path().join("absent"))
        .create_dir(false)
        .open()
        .unwrap_err();
    assert!(matches!(err, Error::Open { .. }));
}

// ============================================================================
// Drop
// ============================================================================

#[test]
fn drop_deletes_file_and_reopen_is_empty() {
    let (dir, shard) = disk_shard();
    let shard = Arc::new(shard);
    shard
        .write("metrics", &[series_with_points("cpu", &["idle"], 5)])
        .unwrap();

    shard.drop_database("metrics").unwrap();
    assert!(!dir.path().join("metrics").exists());
    assert!(shard.databases().is_empty());

    shard
        .write("metrics", &[series_with_points("mem", &["used"], 1)])
        .unwrap();
    assert_eq!(list_names(&shard, "metrics"), vec!["mem".to_string()]);
}

#[test]
fn drop_of_uncached_database_leaves_file() {
    let dir = tempfile::tempdir().unwrap();
    {
        let shard = Shard::builder().path(dir.path()).no_durability().open().unwrap();
        shard
            .write("metrics", &[series_with_points("cpu", &["idle"], 1)])
            .unwrap();
    }

    let shard = Shard::builder().path(dir.path()).no_durability().open().unwrap();
    shard.drop_database("metrics").unwrap();
    assert!(dir.path().join("metrics").is_file());
}

#[test]
fn drop_is_repeatable() {
    let shard = memory_shard();
    shard.write("metrics", &[series_with_points("cpu", &["v"], 1)]).unwrap();

    shard.drop_database("metrics").unwrap();
    shard.drop_database("metrics").unwrap();
    assert!(shard.databases().is_empty());
}

// ============================================================================
// Close
// ============================================================================

#[test]
fn closed_shard_rejects_writes_and_queries() {
    let shard = Arc::new(memory_shard());
    shard.write("metrics", &[series_with_points("cpu", &["v"], 1)]).unwrap();

    shard.close_all();

    let err = shard
        .write("metrics", &[series_with_points("cpu", &["v"], 1)])
        .unwrap_err();
    assert!(matches!(err, Error::ShardClosed));

    let err = query(&shard, &QuerySpec::list_series("metrics")).unwrap_err();
    assert!(err.is_closed());

    // Nothing is cached after close, so drop has nothing to do
    shard.drop_database("metrics").unwrap();
}

#[test]
fn closed_shard_reports_closed_before_validating_names() {
    let shard = Arc::new(memory_shard());
    shard.close_all();

    for name in ["", "a/b", "..", "a\0b"] {
        let err = shard
            .write(name, &[series_with_points("cpu", &["v"], 1)])
            .unwrap_err();
        assert!(matches!(err, Error::ShardClosed), "write to {:?}: {:?}", name, err);

        let err = query(&shard, &QuerySpec::list_series(name)).unwrap_err();
        assert!(err.is_closed(), "query on {:?}: {:?}", name, err);
    }
}

#[test]
fn close_all_releases_files_for_a_new_shard() {
    let dir = tempfile::tempdir().unwrap();
    let first = Shard::builder().path(dir.path()).no_durability().open().unwrap();
    first
        .write("metrics", &[series_with_points("cpu", &["v"], 1)])
        .unwrap();
    first.close_all();

    let second = Shard::builder().path(dir.path()).no_durability().open().unwrap();
    second
        .write("metrics", &[series_with_points("cpu", &["v"], 2)])
        .unwrap();
}
