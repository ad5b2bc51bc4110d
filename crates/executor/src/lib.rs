//! Query dispatch layer for Chronoshard
//!
//! The [`Executor`] is the entry point for queries against a shard. It
//! obtains the target database store through the shard's locked lazy open,
//! classifies the query and hands it to one of four handlers:
//!
//! | Precedence | Category | Handler |
//! |------------|----------|---------|
//! | 1 | list series | [`handlers::list_series`] |
//! | 2 | drop series | [`handlers::drop_series`] |
//! | 3 | delete from series | [`handlers::delete_from_series`] |
//! | 4 | anything else | [`handlers::select`] |
//!
//! Handlers push result series into a [`QueryProcessor`]. Errors from store
//! access or from a handler are returned unchanged.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod executor;
pub mod handlers;
pub mod processor;
pub mod query;

pub use executor::Executor;
pub use processor::QueryProcessor;
pub use query::{QueryDescription, QueryKind, QuerySpec};
