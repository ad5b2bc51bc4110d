//! Series and point types.
//!
//! A [`Series`] is both the unit of a write batch and the unit of a query
//! result. Point values are positional: `point.values[i]` belongs to
//! `series.fields[i]`.

use crate::value::FieldValue;
use serde::{Deserialize, Serialize};

/// One timestamped, sequence-numbered observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Point time (epoch-relative, unit chosen by the producer)
    pub timestamp: i64,
    /// Disambiguates points that share a timestamp within one series
    pub sequence_number: u64,
    /// One value per field position; `FieldValue::Null` marks an absent value
    pub values: Vec<FieldValue>,
}

impl Point {
    /// Create a point
    pub fn new(timestamp: i64, sequence_number: u64, values: Vec<FieldValue>) -> Self {
        Self {
            timestamp,
            sequence_number,
            values,
        }
    }

    /// Check if every value of this point is null
    pub fn is_all_null(&self) -> bool {
        self.values.iter().all(FieldValue::is_null)
    }
}

/// A named time-indexed stream with a fixed set of fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Series {
    /// Series name; must not contain a NUL byte
    pub name: String,
    /// Ordered field names; must not contain a NUL byte
    pub fields: Vec<String>,
    /// Ordered points
    pub points: Vec<Point>,
}

impl Series {
    /// Create a series with no points
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            points: Vec::new(),
        }
    }

    /// Append a point, builder style
    pub fn with_point(mut self, timestamp: i64, sequence_number: u64, values: Vec<FieldValue>) -> Self {
        self.points.push(Point::new(timestamp, sequence_number, values));
        self
    }

    /// Position of a field by name
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    /// Number of non-null values across all points
    pub fn value_count(&self) -> usize {
        self.points
            .iter()
            .map(|p| p.values.iter().filter(|v| !v.is_null()).count())
            .sum()
    }
}
