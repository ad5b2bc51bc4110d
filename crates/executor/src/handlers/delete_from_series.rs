//! `delete from`: remove series points within a time range.

use crate::query::QueryDescription;
use chronoshard_core::Result;
use chronoshard_storage::format::{self, Bucket};
use chronoshard_storage::KvStore;
use tracing::debug;

/// Remove the data points of each named series with
/// `start_time <= timestamp <= end_time`.
///
/// The series and field indexes are left in place, so a series emptied this
/// way still shows up in `list series`.
pub fn delete_from_series<S, Q>(store: &S, query: &Q) -> Result<()>
where
    S: KvStore,
    Q: QueryDescription + ?Sized,
{
    let names = query.series_names();
    let (start, end) = (query.start_time(), query.end_time());

    let removed = store.update(|txn| {
        let mut removed = 0;
        for name in names {
            let (lower, upper) = format::series_range(name, start, end)?;
            removed += txn.delete_range(Bucket::Data, &lower, Some(&upper))?;
        }
        Ok(removed)
    })?;

    debug!(database = query.database(), start, end, values = removed, "deleted series data");
    Ok(())
}
