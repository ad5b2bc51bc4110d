//! Convenient imports for Chronoshard.
//!
//! ```ignore
//! use chronoshard::prelude::*;
//!
//! let shard = Shard::open("./shard")?;
//! shard.write("metrics", &[Series::new("cpu", ["idle"])])?;
//! ```

// Main entry points
pub use crate::{Executor, Shard, ShardBuilder};

// Error handling
pub use crate::{Error, Result};

// Data model
pub use crate::{FieldValue, Point, Series};

// Queries
pub use crate::{QueryDescription, QueryProcessor, QuerySpec};

// Configuration
pub use crate::DurabilityMode;
