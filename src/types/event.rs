//! Event types flowing through a changefeed.
//!
//! Two event vocabularies live here:
//!
//! - [`QueryEvent`] is what the transport yields on its stream: exactly one
//!   snapshot first, then any number of row changes, optionally terminated
//!   by a transport-side cancellation.
//! - [`FeedEvent`] is what a [`Changefeed`](crate::Changefeed) emits to its
//!   consumer: `Update` per row change, then exactly one terminal `Close`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::TableSnapshot;

/// A single incremental change to one row of the subscribed table.
///
/// `old_val` is absent for inserts, `new_val` absent for deletes; both are
/// present for in-place updates.
///
/// # Examples
///
/// ```
/// use syncfeed::RowChange;
/// use serde_json::json;
///
/// let change = RowChange::update(json!({"id": 1, "val": "y"}), json!({"id": 1, "val": "x"}));
/// assert!(change.is_update());
///
/// let insert = RowChange::insert(json!({"id": 2}));
/// assert!(insert.is_insert());
/// ```
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct RowChange {
    /// The row's new value; `None` for deletes.
    pub new_val: Option<Value>,

    /// The row's previous value; `None` for inserts.
    pub old_val: Option<Value>,
}

impl RowChange {
    /// Change representing a newly inserted row.
    #[must_use]
    pub fn insert(new_val: Value) -> Self {
        RowChange {
            new_val: Some(new_val),
            old_val: None,
        }
    }

    /// Change representing a deleted row.
    #[must_use]
    pub fn delete(old_val: Value) -> Self {
        RowChange {
            new_val: None,
            old_val: Some(old_val),
        }
    }

    /// Change representing an in-place update.
    #[must_use]
    pub fn update(new_val: Value, old_val: Value) -> Self {
        RowChange {
            new_val: Some(new_val),
            old_val: Some(old_val),
        }
    }

    /// Check if this change is an insert (no previous value).
    #[inline]
    #[must_use]
    pub fn is_insert(&self) -> bool {
        self.new_val.is_some() && self.old_val.is_none()
    }

    /// Check if this change is a delete (no new value).
    #[inline]
    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.new_val.is_none() && self.old_val.is_some()
    }

    /// Check if this change is an in-place update.
    #[inline]
    #[must_use]
    pub fn is_update(&self) -> bool {
        self.new_val.is_some() && self.old_val.is_some()
    }
}

/// An item yielded by the transport's query stream.
///
/// The first item of a well-behaved stream is `Snapshot`; every later item
/// is `Change` until the stream ends or the transport pushes `Cancel`.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryEvent {
    /// Initial result set, carrying the opaque subscription id used to
    /// cancel the live query later.
    Snapshot {
        /// Transport-assigned subscription id.
        id: String,
        /// The table's initial state.
        snapshot: TableSnapshot,
    },

    /// An incremental row change.
    Change(RowChange),

    /// The transport cancelled the query. Forces an unconditional close;
    /// never retried at this layer.
    Cancel,
}

/// An event emitted by a changefeed to its consumer.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedEvent {
    /// A row changed in the subscribed table.
    Update(RowChange),

    /// Terminal event: the feed is closed. Emitted exactly once.
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ========== RowChange Tests ==========

    #[test]
    fn test_row_change_insert() {
        let change = RowChange::insert(json!({"id": 1}));
        assert!(change.is_insert());
        assert!(!change.is_delete());
        assert!(!change.is_update());
    }

    #[test]
    fn test_row_change_delete() {
        let change = RowChange::delete(json!({"id": 1}));
        assert!(change.is_delete());
        assert!(!change.is_insert());
        assert!(!change.is_update());
    }

    #[test]
    fn test_row_change_update() {
        let change = RowChange::update(json!({"id": 1, "v": 2}), json!({"id": 1, "v": 1}));
        assert!(change.is_update());
        assert!(!change.is_insert());
        assert!(!change.is_delete());
    }

    #[test]
    fn test_row_change_serde() {
        let change = RowChange::update(json!({"v": "y"}), json!({"v": "x"}));
        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(value["new_val"]["v"], "y");
        assert_eq!(value["old_val"]["v"], "x");
    }

    // ========== QueryEvent Tests ==========

    #[test]
    fn test_query_event_snapshot() {
        let event = QueryEvent::Snapshot {
            id: "s1".into(),
            snapshot: TableSnapshot::new("t", vec![]),
        };
        match event {
            QueryEvent::Snapshot { id, snapshot } => {
                assert_eq!(id, "s1");
                assert_eq!(snapshot.table, "t");
            }
            _ => panic!("expected snapshot"),
        }
    }
}
