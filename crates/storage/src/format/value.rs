//! Field value payloads.
//!
//! Values under `data` keys are MessagePack encodings of [`FieldValue`].
//! The payload is self-describing: the variant tag travels with the value,
//! so a reader needs nothing but the bytes to decode it.
//!
//! The write path never stores `FieldValue::Null`, but the codec accepts it
//! so the format has an explicit null marker.

use chronoshard_core::{Error, FieldValue, Result};

/// Serialize one field value.
pub fn encode_value(value: &FieldValue) -> Result<Vec<u8>> {
    rmp_serde::to_vec(value).map_err(|e| Error::Serialization(e.to_string()))
}

/// Deserialize a value written by [`encode_value`].
pub fn decode_value(bytes: &[u8]) -> Result<FieldValue> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::Serialization(e.to_string()))
}
