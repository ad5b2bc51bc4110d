//! Write Path Tests
//!
//! Round trip, null handling, idempotence, batch atomicity and key order,
//! against both engines.

use crate::common::*;

fn mixed_series() -> Series {
    Series::new("events", ["flag", "count", "ratio", "label"])
        .with_point(
            -5,
            0,
            vec![
                FieldValue::Bool(true),
                FieldValue::Int(-7),
                FieldValue::Float(0.25),
                FieldValue::from("boot"),
            ],
        )
        .with_point(
            10,
            3,
            vec![
                FieldValue::Bool(false),
                FieldValue::Int(i64::MAX),
                FieldValue::Float(-1.5),
                FieldValue::from("ready"),
            ],
        )
}

fn assert_round_trip<E: StorageEngine>(shard: Arc<Shard<E>>) {
    shard.write("db", &[mixed_series()]).unwrap();

    let out = read_all(&shard, "db");
    assert_eq!(out.len(), 1);
    let events = &out[0];

    // Columns come back in field-index (key) order
    assert_eq!(events.fields, vec!["count", "flag", "label", "ratio"]);
    assert_eq!(events.points.len(), 2);

    let first = &events.points[0];
    assert_eq!((first.timestamp, first.sequence_number), (-5, 0));
    assert_eq!(
        first.values,
        vec![
            FieldValue::Int(-7),
            FieldValue::Bool(true),
            FieldValue::from("boot"),
            FieldValue::Float(0.25),
        ]
    );

    let second = &events.points[1];
    assert_eq!((second.timestamp, second.sequence_number), (10, 3));
    assert_eq!(second.values[0], FieldValue::Int(i64::MAX));
}

#[test]
fn round_trip_memory() {
    assert_round_trip(Arc::new(memory_shard()));
}

#[test]
fn round_trip_redb() {
    let (_dir, shard) = disk_shard();
    assert_round_trip(Arc::new(shard));
}

#[test]
fn null_values_write_nothing() {
    let shard = memory_shard();
    let batch = vec![Series::new("cpu", ["idle", "user"])
        .with_point(1, 0, vec![FieldValue::Null, FieldValue::Float(0.5)])
        .with_point(2, 0, vec![FieldValue::Null, FieldValue::Null])];
    shard.write("db", &batch).unwrap();

    assert_eq!(bucket_keys(&shard, "db", Bucket::Data).len(), 1);
    assert_eq!(
        bucket_keys(&shard, "db", Bucket::Fields),
        vec![format::fields_key("cpu", "user").unwrap()]
    );
    assert_eq!(bucket_keys(&shard, "db", Bucket::Series), vec![b"cpu".to_vec()]);
}

#[test]
fn all_null_series_is_still_indexed() {
    let shard = memory_shard();
    let batch = vec![Series::new("cpu", ["idle"]).with_point(1, 0, vec![FieldValue::Null])];
    shard.write("db", &batch).unwrap();

    assert_eq!(bucket_keys(&shard, "db", Bucket::Series), vec![b"cpu".to_vec()]);
    assert!(bucket_keys(&shard, "db", Bucket::Fields).is_empty());
    assert!(bucket_keys(&shard, "db", Bucket::Data).is_empty());
}

#[test]
fn writing_twice_is_idempotent() {
    let shard = Arc::new(memory_shard());
    let batch = vec![series_with_points("cpu", &["idle", "user"], 4)];

    shard.write("db", &batch).unwrap();
    let once = read_all(&shard, "db");
    let keys_once = bucket_keys(&shard, "db", Bucket::Data);

    shard.write("db", &batch).unwrap();
    assert_eq!(read_all(&shard, "db"), once);
    assert_eq!(bucket_keys(&shard, "db", Bucket::Data), keys_once);
}

#[test]
fn later_write_overwrites_value() {
    let shard = Arc::new(memory_shard());
    shard
        .write("db", &[Series::new("cpu", ["v"]).with_point(1, 0, vec![FieldValue::Int(1)])])
        .unwrap();
    shard
        .write("db", &[Series::new("cpu", ["v"]).with_point(1, 0, vec![FieldValue::Int(2)])])
        .unwrap();

    let out = read_all(&shard, "db");
    assert_eq!(out[0].points.len(), 1);
    assert_eq!(out[0].points[0].values, vec![FieldValue::Int(2)]);
}

fn assert_failed_batch_leaves_nothing<E: StorageEngine>(shard: Shard<E>) {
    let batch = vec![
        series_with_points("good", &["v"], 3),
        Series::new("bad", ["a\0b"]).with_point(1, 0, vec![FieldValue::Int(1)]),
    ];

    let err = shard.write("db", &batch).unwrap_err();
    assert!(matches!(err, Error::Transaction(_)));
    assert!(err.is_retryable());

    for bucket in Bucket::ALL {
        assert!(bucket_keys(&shard, "db", bucket).is_empty(), "{} bucket", bucket);
    }
}

#[test]
fn failed_batch_is_atomic_memory() {
    assert_failed_batch_leaves_nothing(memory_shard());
}

#[test]
fn failed_batch_is_atomic_redb() {
    let (_dir, shard) = disk_shard();
    assert_failed_batch_leaves_nothing(shard);
}

#[test]
fn failed_batch_keeps_earlier_commits() {
    let shard = Arc::new(memory_shard());
    shard.write("db", &[series_with_points("cpu", &["v"], 2)]).unwrap();

    let bad = vec![Series::new("cpu", ["a", "b"]).with_point(9, 0, vec![FieldValue::Int(1)])];
    assert!(shard.write("db", &bad).is_err());

    let out = read_all(&shard, "db");
    assert_eq!(out[0].points.len(), 2);
}

#[test]
fn empty_series_name_is_skipped() {
    let shard = Arc::new(memory_shard());
    let batch = vec![
        Series::new("", ["v"]).with_point(1, 0, vec![FieldValue::Int(1)]),
        series_with_points("cpu", &["v"], 1),
    ];
    shard.write("db", &batch).unwrap();

    assert_eq!(list_names(&shard, "db"), vec!["cpu".to_string()]);
    assert_eq!(bucket_keys(&shard, "db", Bucket::Data).len(), 1);
}

#[test]
fn data_keys_follow_series_time_sequence_field_order() {
    let (_dir, shard) = disk_shard();
    let batch = vec![
        Series::new("b", ["z", "a"])
            .with_point(5, 2, vec![FieldValue::Int(1), FieldValue::Int(2)])
            .with_point(5, 1, vec![FieldValue::Int(3), FieldValue::Int(4)])
            .with_point(-3, 9, vec![FieldValue::Int(5), FieldValue::Null]),
        Series::new("a", ["x"]).with_point(100, 0, vec![FieldValue::Int(6)]),
    ];
    shard.write("db", &batch).unwrap();

    let decoded: Vec<(String, i64, u64, String)> = bucket_keys(&shard, "db", Bucket::Data)
        .iter()
        .map(|key| {
            let k = format::decode_data_key(key).unwrap();
            (k.series.to_string(), k.timestamp, k.sequence_number, k.field.to_string())
        })
        .collect();

    let expected = vec![
        ("a".to_string(), 100, 0, "x".to_string()),
        ("b".to_string(), -3, 9, "z".to_string()),
        ("b".to_string(), 5, 1, "a".to_string()),
        ("b".to_string(), 5, 1, "z".to_string()),
        ("b".to_string(), 5, 2, "a".to_string()),
        ("b".to_string(), 5, 2, "z".to_string()),
    ];
    assert_eq!(decoded, expected);
}
