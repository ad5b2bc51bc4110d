//! Query handlers, one per query category.
//!
//! Handlers only see a [`KvStore`](chronoshard_storage::KvStore) and the
//! key codec. They never touch the shard registry.

mod delete_from_series;
mod drop_series;
mod list_series;
mod select;

pub use delete_from_series::delete_from_series;
pub use drop_series::drop_series;
pub use list_series::{list_series, LIST_SERIES_NAME};
pub use select::select;
