//! Generic select over series data.

use crate::processor::QueryProcessor;
use crate::query::QueryDescription;
use chronoshard_core::{Error, FieldValue, Point, Result, Series};
use chronoshard_storage::format::{self, Bucket};
use chronoshard_storage::{KvStore, ReadTxn};
use rustc_hash::FxHashMap;

/// Scan series data and yield one result series per series with matching
/// points.
///
/// Columns come from the series' field index, or from the query's field
/// list when one is given. Point values line up with the columns; a column
/// the point has no value for is `Null`. Everything is read from a single
/// snapshot. Stops as soon as the processor returns `false`.
pub fn select<S, Q, P>(store: &S, query: &Q, processor: &mut P) -> Result<()>
where
    S: KvStore,
    Q: QueryDescription + ?Sized,
    P: QueryProcessor + ?Sized,
{
    store.view(|txn| {
        let names = match query.series_names() {
            [] => all_series(txn)?,
            named => named.to_vec(),
        };

        for name in &names {
            let Some(series) = read_series(txn, name, query)? else {
                continue;
            };
            if !processor.yield_series(series) {
                break;
            }
        }
        Ok(())
    })
}

fn all_series(txn: &dyn ReadTxn) -> Result<Vec<String>> {
    txn.range(Bucket::Series, b"", None)?
        .into_iter()
        .map(|(key, _)| {
            String::from_utf8(key).map_err(|e| Error::Corruption(format!("series name is not UTF-8: {}", e)))
        })
        .collect()
}

fn indexed_fields(txn: &dyn ReadTxn, name: &str) -> Result<Vec<String>> {
    let prefix = format::series_prefix(name)?;
    txn.scan_prefix(Bucket::Fields, &prefix)?
        .iter()
        .map(|(key, _)| format::decode_fields_key(key).map(|(_, field)| field.to_string()))
        .collect()
}

fn read_series<Q>(txn: &dyn ReadTxn, name: &str, query: &Q) -> Result<Option<Series>>
where
    Q: QueryDescription + ?Sized,
{
    let columns = match query.fields() {
        Some(fields) => fields.to_vec(),
        None => indexed_fields(txn, name)?,
    };
    if columns.is_empty() {
        return Ok(None);
    }

    let column_index: FxHashMap<&str, usize> =
        columns.iter().enumerate().map(|(i, f)| (f.as_str(), i)).collect();

    let (lower, upper) = format::series_range(name, query.start_time(), query.end_time())?;
    let entries = txn.range(Bucket::Data, &lower, Some(&upper))?;

    // Keys are ordered by (timestamp, sequence), so a point's fields are adjacent
    let mut points: Vec<Point> = Vec::new();
    for (key, value) in &entries {
        let decoded = format::decode_data_key(key)?;
        let Some(&column) = column_index.get(decoded.field) else {
            continue;
        };

        let starts_new_point = points
            .last()
            .map_or(true, |p| (p.timestamp, p.sequence_number) != (decoded.timestamp, decoded.sequence_number));
        if starts_new_point {
            points.push(Point::new(
                decoded.timestamp,
                decoded.sequence_number,
                vec![FieldValue::Null; columns.len()],
            ));
        }
        if let Some(point) = points.last_mut() {
            point.values[column] = format::decode_value(value)?;
        }
    }

    if !query.ascending() {
        points.reverse();
    }
    if let Some(limit) = query.limit() {
        points.truncate(limit);
    }
    if points.is_empty() {
        return Ok(None);
    }

    Ok(Some(Series {
        name: name.to_string(),
        fields: columns,
        points,
    }))
}
