//! Query request issued once per changefeed.
//!
//! Mirrors the argument set of the backing store's live-query primitive:
//! the query object, the logical table it targets, per-query options, a
//! timeout enforced by the transport (not by this crate), and whether a
//! live changes binding should be kept alive after the initial result.

use serde_json::Value;
use std::time::Duration;

/// Default transport-side timeout for the initial query.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Arguments for one live query against the backing store.
///
/// # Examples
///
/// ```
/// use syncfeed::QueryRequest;
/// use serde_json::json;
///
/// let req = QueryRequest::new("patches", json!({"patches": {"string_id": "abc"}}))
///     .with_option(json!({"limit": 100}));
/// assert!(req.changes);
/// assert_eq!(req.timeout.as_secs(), 30);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct QueryRequest {
    /// Name of the logical table the query targets.
    pub table: String,

    /// The query object, opaque to this crate.
    pub query: Value,

    /// Additional query options, opaque to this crate.
    pub options: Vec<Value>,

    /// Timeout for the initial response, enforced by the transport.
    pub timeout: Duration,

    /// Whether to keep a live changes binding after the initial result.
    /// Always `true` for changefeeds.
    pub changes: bool,
}

impl QueryRequest {
    /// Create a changefeed query against `table` with default options.
    #[must_use]
    pub fn new(table: impl Into<String>, query: Value) -> Self {
        QueryRequest {
            table: table.into(),
            query,
            options: Vec::new(),
            timeout: DEFAULT_QUERY_TIMEOUT,
            changes: true,
        }
    }

    /// Append a query option.
    #[must_use]
    pub fn with_option(mut self, option: Value) -> Self {
        self.options.push(option);
        self
    }

    /// Override the transport-side timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
