//! Batched write path.
//!
//! [`apply_batch`] performs every mutation of one write batch inside a
//! single write transaction:
//!
//! ```text
//! for each series with a non-empty name:
//!     series[name] = ""
//!     for each point:
//!         prefix = name 0x00 be(timestamp) be(sequence)
//!         for each non-null value:
//!             fields[name 0x00 field] = ""
//!             data[prefix field] = encode(value)
//! ```
//!
//! Any error aborts the enclosing transaction, so a batch is applied
//! entirely or not at all. Puts overwrite, so replaying a batch yields the
//! same final state.

use chronoshard_core::{Error, Result, Series};
use chronoshard_storage::format::{self, Bucket};
use chronoshard_storage::WriteTxn;
use rustc_hash::FxHashSet;
use tracing::debug;

/// What one batch wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Series entries touched
    pub series: usize,
    /// Series skipped because their name was empty
    pub skipped_series: usize,
    /// Points visited
    pub points: usize,
    /// Non-null values written to the `data` bucket
    pub values: usize,
}

/// Apply one write batch to an open write transaction.
pub fn apply_batch(txn: &mut dyn WriteTxn, batch: &[Series]) -> Result<WriteSummary> {
    let mut summary = WriteSummary::default();
    let mut seen_series: FxHashSet<&str> = FxHashSet::default();

    for series in batch {
        let name = series.name.as_str();
        if name.is_empty() {
            debug!(fields = series.fields.len(), points = series.points.len(), "skipping series with empty name");
            summary.skipped_series += 1;
            continue;
        }

        if seen_series.insert(name) {
            txn.put(Bucket::Series, &format::series_key(name)?, &[])?;
        }
        summary.series += 1;

        let fields_keys = series
            .fields
            .iter()
            .map(|field| format::fields_key(name, field))
            .collect::<Result<Vec<_>>>()?;
        let mut indexed = vec![false; series.fields.len()];

        for point in &series.points {
            if point.values.len() != series.fields.len() {
                return Err(Error::InvalidInput(format!(
                    "series {:?}: point at {}/{} has {} values for {} fields",
                    name,
                    point.timestamp,
                    point.sequence_number,
                    point.values.len(),
                    series.fields.len()
                )));
            }
            summary.points += 1;

            let prefix = format::point_prefix(name, point.timestamp, point.sequence_number)?;
            for (index, (field, value)) in series.fields.iter().zip(&point.values).enumerate() {
                if value.is_null() {
                    continue;
                }

                if !indexed[index] {
                    txn.put(Bucket::Fields, &fields_keys[index], &[])?;
                    indexed[index] = true;
                }

                let key = format::data_key_from_prefix(&prefix, field)?;
                txn.put(Bucket::Data, &key, &format::encode_value(value)?)?;
                summary.values += 1;
            }
        }
    }

    Ok(summary)
}
