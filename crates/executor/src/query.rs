//! Query descriptions.
//!
//! The query parser lives outside this crate. Whatever it produces only has
//! to implement [`QueryDescription`]: the database name, the three category
//! classifiers, and the handful of inputs the handlers read. [`QuerySpec`]
//! is a ready-made implementation.

/// What the dispatcher and handlers need to know about a parsed query.
pub trait QueryDescription {
    /// Target database
    fn database(&self) -> &str;

    /// `list series`
    fn is_list_series_query(&self) -> bool;

    /// `drop series <name>`
    fn is_drop_series_query(&self) -> bool;

    /// `delete from <name> [where time ...]`
    fn is_delete_from_series_query(&self) -> bool;

    /// Series the query targets. Empty means every series for a select.
    fn series_names(&self) -> &[String] {
        &[]
    }

    /// Inclusive lower time bound
    fn start_time(&self) -> i64 {
        i64::MIN
    }

    /// Inclusive upper time bound
    fn end_time(&self) -> i64 {
        i64::MAX
    }

    /// Requested columns; `None` selects every field in the series' index
    fn fields(&self) -> Option<&[String]> {
        None
    }

    /// Maximum points returned per series
    fn limit(&self) -> Option<usize> {
        None
    }

    /// Return points oldest first
    fn ascending(&self) -> bool {
        true
    }
}

/// The four mutually exclusive query categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// List every series name in the database
    ListSeries,
    /// Remove series, their field index and their data
    DropSeries,
    /// Remove points in a time range
    DeleteFromSeries,
    /// Generic scan over series data
    Select,
}

impl QueryKind {
    /// Classify a query. The first matching classifier wins, in the order
    /// list-series, drop-series, delete-from-series.
    pub fn classify<Q: QueryDescription + ?Sized>(query: &Q) -> Self {
        if query.is_list_series_query() {
            QueryKind::ListSeries
        } else if query.is_drop_series_query() {
            QueryKind::DropSeries
        } else if query.is_delete_from_series_query() {
            QueryKind::DeleteFromSeries
        } else {
            QueryKind::Select
        }
    }
}

/// A concrete query description.
///
/// # Example
///
/// ```ignore
/// let query = QuerySpec::select("metrics", ["cpu"])
///     .between(1_000, 2_000)
///     .with_fields(["idle"])
///     .descending()
///     .with_limit(10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    database: String,
    kind: QueryKind,
    series: Vec<String>,
    start: i64,
    end: i64,
    fields: Option<Vec<String>>,
    limit: Option<usize>,
    ascending: bool,
}

impl QuerySpec {
    fn new(database: impl Into<String>, kind: QueryKind, series: Vec<String>) -> Self {
        Self {
            database: database.into(),
            kind,
            series,
            start: i64::MIN,
            end: i64::MAX,
            fields: None,
            limit: None,
            ascending: true,
        }
    }

    /// `list series`
    pub fn list_series(database: impl Into<String>) -> Self {
        Self::new(database, QueryKind::ListSeries, Vec::new())
    }

    /// `drop series <series>`
    pub fn drop_series(database: impl Into<String>, series: impl Into<String>) -> Self {
        Self::new(database, QueryKind::DropSeries, vec![series.into()])
    }

    /// `delete from <series>`; narrow it with [`QuerySpec::between`]
    pub fn delete_from_series(database: impl Into<String>, series: impl Into<String>) -> Self {
        Self::new(database, QueryKind::DeleteFromSeries, vec![series.into()])
    }

    /// Select from the named series
    pub fn select<I, S>(database: impl Into<String>, series: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let series = series.into_iter().map(Into::into).collect();
        Self::new(database, QueryKind::Select, series)
    }

    /// Select from every series in the database
    pub fn select_all(database: impl Into<String>) -> Self {
        Self::new(database, QueryKind::Select, Vec::new())
    }

    /// Restrict to `start <= timestamp <= end`
    pub fn between(mut self, start: i64, end: i64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Project onto the given fields
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Return at most `limit` points per series
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Return newest points first
    pub fn descending(mut self) -> Self {
        self.ascending = false;
        self
    }

    /// The category this query was built as
    pub fn kind(&self) -> QueryKind {
        self.kind
    }
}

impl QueryDescription for QuerySpec {
    fn database(&self) -> &str {
        &self.database
    }

    fn is_list_series_query(&self) -> bool {
        self.kind == QueryKind::ListSeries
    }

    fn is_drop_series_query(&self) -> bool {
        self.kind == QueryKind::DropSeries
    }

    fn is_delete_from_series_query(&self) -> bool {
        self.kind == QueryKind::DeleteFromSeries
    }

    fn series_names(&self) -> &[String] {
        &self.series
    }

    fn start_time(&self) -> i64 {
        self.start
    }

    fn end_time(&self) -> i64 {
        self.end
    }

    fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    fn limit(&self) -> Option<usize> {
        self.limit
    }

    fn ascending(&self) -> bool {
        self.ascending
    }
}
