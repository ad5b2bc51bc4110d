//! `list series`: every series name in the database.

use crate::processor::QueryProcessor;
use chronoshard_core::{Error, FieldValue, Point, Result, Series};
use chronoshard_storage::format::Bucket;
use chronoshard_storage::KvStore;

/// Name of the series a `list series` query yields
pub const LIST_SERIES_NAME: &str = "list_series_result";

/// Yield one series with a `name` column and one point per stored series
/// name, in key order.
pub fn list_series<S, P>(store: &S, processor: &mut P) -> Result<()>
where
    S: KvStore,
    P: QueryProcessor + ?Sized,
{
    let entries = store.view(|txn| txn.range(Bucket::Series, b"", None))?;

    let mut result = Series::new(LIST_SERIES_NAME, ["name"]);
    result.points.reserve(entries.len());
    for (sequence, (key, _)) in entries.into_iter().enumerate() {
        let name = String::from_utf8(key)
            .map_err(|e| Error::Corruption(format!("series name is not UTF-8: {}", e)))?;
        result
            .points
            .push(Point::new(0, sequence as u64, vec![FieldValue::String(name)]));
    }

    processor.yield_series(result);
    Ok(())
}
