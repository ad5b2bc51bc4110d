//! Binary key formats.
//!
//! ## Layout
//!
//! ```text
//! series bucket:  <series>
//! fields bucket:  <series> 0x00 <field>
//! data bucket:    <series> 0x00 <timestamp: u64 BE> <sequence: u64 BE> <field>
//! ```
//!
//! There is no separator before the field name in a data key: the prefix
//! after the series separator is always 16 bytes, so the field starts at a
//! fixed offset.
//!
//! ## Ordering
//!
//! Byte-lexicographic order of data keys equals (series, timestamp,
//! sequence, field) order. Timestamps are signed; [`encode_timestamp`] flips
//! the sign bit so negative times sort before positive ones.
//!
//! Names must not contain a NUL byte. Every encoder rejects such names with
//! `Error::InvalidInput` instead of producing a key that could collide with
//! a different (series, field) pair.

use byteorder::{BigEndian, ByteOrder};
use chronoshard_core::{Error, Result};

/// Separator between the series name and the rest of a key
pub const KEY_SEPARATOR: u8 = 0x00;

/// Length of the fixed-width timestamp + sequence section of a data key
pub const POINT_PREFIX_FIXED_LEN: usize = 16;

const SIGN_BIT: u64 = 1 << 63;

/// A decoded `data` bucket key, borrowing from the key bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataKey<'a> {
    /// Series name
    pub series: &'a str,
    /// Point timestamp
    pub timestamp: i64,
    /// Point sequence number
    pub sequence_number: u64,
    /// Field name
    pub field: &'a str,
}

fn check_name(kind: &str, name: &str) -> Result<()> {
    if name.as_bytes().contains(&KEY_SEPARATOR) {
        return Err(Error::InvalidInput(format!(
            "{} name {:?} contains a NUL byte",
            kind, name
        )));
    }
    Ok(())
}

/// Map a signed timestamp onto an unsigned value with the same ordering.
#[inline]
pub fn encode_timestamp(timestamp: i64) -> u64 {
    (timestamp as u64) ^ SIGN_BIT
}

#[inline]
fn decode_timestamp(encoded: u64) -> i64 {
    (encoded ^ SIGN_BIT) as i64
}

/// Key of a series in the `series` bucket.
pub fn series_key(series: &str) -> Result<Vec<u8>> {
    check_name("series", series)?;
    Ok(series.as_bytes().to_vec())
}

/// `<series> 0x00`, the prefix shared by a series' `fields` and `data` keys.
pub fn series_prefix(series: &str) -> Result<Vec<u8>> {
    check_name("series", series)?;
    let mut key = Vec::with_capacity(series.len() + 1);
    key.extend_from_slice(series.as_bytes());
    key.push(KEY_SEPARATOR);
    Ok(key)
}

/// Key of a (series, field) pair in the `fields` bucket.
pub fn fields_key(series: &str, field: &str) -> Result<Vec<u8>> {
    check_name("field", field)?;
    let mut key = series_prefix(series)?;
    key.extend_from_slice(field.as_bytes());
    Ok(key)
}

/// The part of a data key shared by every field of one point.
pub fn point_prefix(series: &str, timestamp: i64, sequence_number: u64) -> Result<Vec<u8>> {
    check_name("series", series)?;
    let mut key = Vec::with_capacity(series.len() + 1 + POINT_PREFIX_FIXED_LEN + 16);
    key.extend_from_slice(series.as_bytes());
    key.push(KEY_SEPARATOR);

    let mut fixed = [0u8; POINT_PREFIX_FIXED_LEN];
    BigEndian::write_u64(&mut fixed[..8], encode_timestamp(timestamp));
    BigEndian::write_u64(&mut fixed[8..], sequence_number);
    key.extend_from_slice(&fixed);
    Ok(key)
}

/// Extend a point prefix with a field name.
pub fn data_key_from_prefix(prefix: &[u8], field: &str) -> Result<Vec<u8>> {
    check_name("field", field)?;
    let mut key = Vec::with_capacity(prefix.len() + field.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(field.as_bytes());
    Ok(key)
}

/// Key of one field value in the `data` bucket.
pub fn data_key(series: &str, timestamp: i64, sequence_number: u64, field: &str) -> Result<Vec<u8>> {
    let prefix = point_prefix(series, timestamp, sequence_number)?;
    data_key_from_prefix(&prefix, field)
}

/// Half-open byte range `[lower, upper)` covering every data key of `series`
/// with `start <= timestamp <= end`.
///
/// Returns an empty range (`lower == upper`) when `start > end`.
pub fn series_range(series: &str, start: i64, end: i64) -> Result<(Vec<u8>, Vec<u8>)> {
    let prefix = series_prefix(series)?;

    let mut lower = prefix.clone();
    let mut ts = [0u8; 8];
    BigEndian::write_u64(&mut ts, encode_timestamp(start));
    lower.extend_from_slice(&ts);

    if start > end {
        let upper = lower.clone();
        return Ok((lower, upper));
    }

    let upper = match end.checked_add(1) {
        Some(next) => {
            let mut upper = prefix;
            BigEndian::write_u64(&mut ts, encode_timestamp(next));
            upper.extend_from_slice(&ts);
            upper
        }
        // i64::MAX: everything under the series prefix qualifies
        None => {
            let mut upper = series.as_bytes().to_vec();
            upper.push(KEY_SEPARATOR + 1);
            upper
        }
    };
    Ok((lower, upper))
}

/// Decode a `data` bucket key.
pub fn decode_data_key(key: &[u8]) -> Result<DataKey<'_>> {
    let sep = key
        .iter()
        .position(|b| *b == KEY_SEPARATOR)
        .ok_or_else(|| Error::Corruption("data key has no series separator".into()))?;

    let rest = &key[sep + 1..];
    if rest.len() < POINT_PREFIX_FIXED_LEN {
        return Err(Error::Corruption(format!(
            "data key too short: {} bytes after separator, need at least {}",
            rest.len(),
            POINT_PREFIX_FIXED_LEN
        )));
    }

    let series = std::str::from_utf8(&key[..sep])
        .map_err(|e| Error::Corruption(format!("series name is not UTF-8: {}", e)))?;
    let field = std::str::from_utf8(&rest[POINT_PREFIX_FIXED_LEN..])
        .map_err(|e| Error::Corruption(format!("field name is not UTF-8: {}", e)))?;

    Ok(DataKey {
        series,
        timestamp: decode_timestamp(BigEndian::read_u64(&rest[..8])),
        sequence_number: BigEndian::read_u64(&rest[8..POINT_PREFIX_FIXED_LEN]),
        field,
    })
}

/// Decode a `fields` bucket key into (series, field).
pub fn decode_fields_key(key: &[u8]) -> Result<(&str, &str)> {
    let sep = key
        .iter()
        .position(|b| *b == KEY_SEPARATOR)
        .ok_or_else(|| Error::Corruption("fields key has no series separator".into()))?;

    let series = std::str::from_utf8(&key[..sep])
        .map_err(|e| Error::Corruption(format!("series name is not UTF-8: {}", e)))?;
    let field = std::str::from_utf8(&key[sep + 1..])
        .map_err(|e| Error::Corruption(format!("field name is not UTF-8: {}", e)))?;
    Ok((series, field))
}
