//! `drop series`: remove series with their field index and data.

use crate::query::QueryDescription;
use chronoshard_core::{Error, Result};
use chronoshard_storage::format::{self, Bucket};
use chronoshard_storage::KvStore;
use tracing::debug;

/// Remove every named series: its data, its field index and its entry in
/// the series index, all in one write transaction.
pub fn drop_series<S, Q>(store: &S, query: &Q) -> Result<()>
where
    S: KvStore,
    Q: QueryDescription + ?Sized,
{
    let names = query.series_names();
    if names.is_empty() {
        return Err(Error::InvalidInput("drop series requires a series name".into()));
    }

    let removed = store.update(|txn| {
        let mut removed = 0;
        for name in names {
            let prefix = format::series_prefix(name)?;
            removed += txn.delete_prefix(Bucket::Data, &prefix)?;
            txn.delete_prefix(Bucket::Fields, &prefix)?;
            txn.delete(Bucket::Series, &format::series_key(name)?)?;
        }
        Ok(removed)
    })?;

    debug!(database = query.database(), series = names.len(), values = removed, "dropped series");
    Ok(())
}
