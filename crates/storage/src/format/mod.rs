//! On-disk byte formats for database stores.
//!
//! This module centralizes all serialization logic for persistent storage.
//! Keeping serialization separate from the write and query paths makes the
//! format a named contract that can be versioned on its own.
//!
//! # Module Structure
//!
//! - `keys`: binary keys for the `series`, `fields` and `data` buckets
//! - `value`: field value payloads stored under `data` keys
//!
//! # Bucket Names
//!
//! The literal bucket names are part of the format. Renaming one breaks
//! compatibility with existing store files.

pub mod keys;
pub mod value;

pub use keys::{
    data_key, data_key_from_prefix, decode_data_key, decode_fields_key, encode_timestamp,
    fields_key, point_prefix, series_key, series_prefix, series_range, DataKey, KEY_SEPARATOR,
    POINT_PREFIX_FIXED_LEN,
};
pub use value::{decode_value, encode_value};

/// A named logical partition within one database store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    /// Set of series names
    Series,
    /// Set of `series \0 field` pairs that have ever held a non-null value
    Fields,
    /// Ordered point storage
    Data,
}

impl Bucket {
    /// All buckets, in a fixed order
    pub const ALL: [Bucket; 3] = [Bucket::Series, Bucket::Fields, Bucket::Data];

    /// The literal on-disk bucket name
    pub const fn name(self) -> &'static str {
        match self {
            Bucket::Series => "series",
            Bucket::Fields => "fields",
            Bucket::Data => "data",
        }
    }

    /// Dense index, used by engines that keep buckets in an array
    pub const fn index(self) -> usize {
        match self {
            Bucket::Series => 0,
            Bucket::Fields => 1,
            Bucket::Data => 2,
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
