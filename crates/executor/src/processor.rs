//! Result sink for query handlers.

use chronoshard_core::{Error, Series};

/// Receives the series a query produces.
///
/// Handlers call [`QueryProcessor::yield_series`] once per result series.
/// Returning `false` asks the handler to stop producing results; what was
/// already yielded stays yielded.
pub trait QueryProcessor {
    /// Accept one result series. Return `false` to stop the query.
    fn yield_series(&mut self, series: Series) -> bool;

    /// Called once with the error before a failed query returns it.
    fn fail(&mut self, _error: &Error) {}
}

/// Collects every yielded series.
impl QueryProcessor for Vec<Series> {
    fn yield_series(&mut self, series: Series) -> bool {
        self.push(series);
        true
    }
}
