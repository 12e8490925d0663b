//! Typed snapshot envelope returned by the initial query.
//!
//! The transport answers the first query with a [`TableSnapshot`] naming the
//! logical table and carrying its initial rows. The envelope is uniform for
//! every backing query, so no caller ever indexes into a response by an
//! opaque string key; a snapshot naming the wrong table is a hard connect
//! failure rather than a silent empty result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Initial result set of a live query.
///
/// # Examples
///
/// ```
/// use syncfeed::TableSnapshot;
/// use serde_json::json;
///
/// let snapshot = TableSnapshot::new("patches", vec![json!({"id": 1})]);
/// assert_eq!(snapshot.table, "patches");
/// assert_eq!(snapshot.rows.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Name of the logical table this snapshot belongs to.
    pub table: String,

    /// The table's rows at subscription time.
    pub rows: Vec<Value>,
}

impl TableSnapshot {
    /// Create a snapshot envelope.
    #[must_use]
    pub fn new(table: impl Into<String>, rows: Vec<Value>) -> Self {
        TableSnapshot {
            table: table.into(),
            rows,
        }
    }
}
