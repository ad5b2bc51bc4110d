//! Query executor.

use crate::handlers;
use crate::processor::QueryProcessor;
use crate::query::{QueryDescription, QueryKind};
use chronoshard_core::Result;
use chronoshard_engine::Shard;
use chronoshard_storage::{RedbEngine, StorageEngine};
use std::sync::Arc;
use tracing::debug;

/// Dispatches queries against one shard.
///
/// The executor is a thin layer: it resolves the database store, picks the
/// handler for the query's category and reports failures to the processor.
/// It holds no state of its own and can be cloned freely across threads.
pub struct Executor<E: StorageEngine = RedbEngine> {
    shard: Arc<Shard<E>>,
}

impl<E: StorageEngine> Clone for Executor<E> {
    fn clone(&self) -> Self {
        Self {
            shard: Arc::clone(&self.shard),
        }
    }
}

impl<E: StorageEngine> Executor<E> {
    /// Create an executor over a shared shard.
    pub fn new(shard: Arc<Shard<E>>) -> Self {
        Self { shard }
    }

    /// The shard this executor reads from
    pub fn shard(&self) -> &Arc<Shard<E>> {
        &self.shard
    }

    /// Run `query` and stream its results into `processor`.
    ///
    /// The database store is opened through the shard lock if it has not
    /// been touched yet; querying an unknown database therefore creates an
    /// empty one. Any error is passed to [`QueryProcessor::fail`] and then
    /// returned unchanged.
    pub fn query<Q, P>(&self, query: &Q, processor: &mut P) -> Result<()>
    where
        Q: QueryDescription + ?Sized,
        P: QueryProcessor + ?Sized,
    {
        let result = self.dispatch(query, processor);
        if let Err(ref e) = result {
            debug!(database = query.database(), error = %e, "query failed");
            processor.fail(e);
        }
        result
    }

    fn dispatch<Q, P>(&self, query: &Q, processor: &mut P) -> Result<()>
    where
        Q: QueryDescription + ?Sized,
        P: QueryProcessor + ?Sized,
    {
        let store = self.shard.open_or_get(query.database())?;
        let kind = QueryKind::classify(query);
        debug!(database = query.database(), kind = ?kind, "dispatching query");

        match kind {
            QueryKind::ListSeries => handlers::list_series(store.as_ref(), processor),
            QueryKind::DropSeries => handlers::drop_series(store.as_ref(), query),
            QueryKind::DeleteFromSeries => handlers::delete_from_series(store.as_ref(), query),
            QueryKind::Select => handlers::select(store.as_ref(), query, processor),
        }
    }
}

impl<E: StorageEngine> std::fmt::Debug for Executor<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor").field("shard", &self.shard).finish()
    }
}
