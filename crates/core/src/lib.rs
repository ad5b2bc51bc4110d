//! Core types for Chronoshard
//!
//! This crate defines the data model shared by every layer of the shard
//! storage engine:
//! - [`Series`] and [`Point`]: the write-batch payload and query result shape
//! - [`FieldValue`]: one typed field value, with an explicit null marker
//! - [`Error`]: the single error type returned by all operations

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use types::{Point, Series};
pub use value::FieldValue;
