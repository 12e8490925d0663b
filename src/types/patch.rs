//! Patch representing a compact diff between two document versions.
//!
//! A patch is an ordered sequence of [`Edit`] operations. Instead of sending
//! the entire document, peers exchange patches that identify the changed
//! regions and provide replacement content for them.
//!
//! # Overview
//!
//! Each edit consists of:
//!
//! - **at**: char offset into the *pre-image* document
//! - **delete**: number of chars removed at that offset
//! - **insert**: text inserted at that offset
//!
//! Edits are sorted ascending by offset and never overlap, so a patch can be
//! applied in a single left-to-right pass. A patch is self-describing: it
//! never needs the "before" value to know *where* to operate, only *what*
//! to operate on.
//!
//! # Ordering
//!
//! Patches are **not** commutative in general. `apply(apply(doc, a), b)` is
//! only defined when `b` was computed against the post-`a` state; sequencing
//! is the caller's responsibility. Patches touching disjoint regions are the
//! only commutative-compatible case.
//!
//! # Examples
//!
//! ```
//! use syncfeed::{make_patch, Patch};
//!
//! let patch = make_patch("hello world", "hello there, world");
//! assert!(!patch.is_empty());
//!
//! let empty = make_patch("same", "same");
//! assert!(empty.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A single edit operation within a [`Patch`].
///
/// Replaces `delete` chars starting at pre-image offset `at` with `insert`.
/// An insertion has `delete == 0`; a deletion has an empty `insert`.
///
/// Offsets count Unicode scalar values (`char`s), not bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// Char offset into the pre-image document.
    pub at: usize,

    /// Number of chars removed at `at`.
    pub delete: usize,

    /// Text inserted at `at` (after the deletion).
    pub insert: String,
}

impl Edit {
    /// Create an edit replacing `delete` chars at `at` with `insert`.
    #[must_use]
    pub fn replace(at: usize, delete: usize, insert: impl Into<String>) -> Self {
        Edit {
            at,
            delete,
            insert: insert.into(),
        }
    }

    /// Create a pure insertion at `at`.
    ///
    /// # Examples
    ///
    /// ```
    /// use syncfeed::Edit;
    ///
    /// let edit = Edit::insert(5, " beautiful");
    /// assert_eq!(edit.delete, 0);
    /// ```
    #[inline]
    #[must_use]
    pub fn insert(at: usize, insert: impl Into<String>) -> Self {
        Self::replace(at, 0, insert)
    }

    /// Create a pure deletion of `delete` chars at `at`.
    #[inline]
    #[must_use]
    pub fn delete(at: usize, delete: usize) -> Self {
        Self::replace(at, delete, "")
    }

    /// Check whether this edit changes nothing.
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.delete == 0 && self.insert.is_empty()
    }
}

/// A compact diff between two document versions.
///
/// Produced by [`make_patch`](crate::make_patch) and consumed by
/// [`apply_patch`](crate::apply_patch). Serde-derived so it can travel over
/// any JSON-shaped transport unchanged.
///
/// # Invariants
///
/// - Edits are sorted ascending by `at`.
/// - Edits never overlap: for consecutive edits `e1`, `e2`,
///   `e1.at + e1.delete <= e2.at`.
///
/// [`apply_patch`](crate::apply_patch) rejects patches violating these with
/// a `MalformedPatch` error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Patch {
    /// The ordered edit operations.
    pub edits: SmallVec<[Edit; 4]>,
}

impl Patch {
    /// Create the empty patch (applies as a no-op).
    #[must_use]
    pub fn empty() -> Self {
        Patch::default()
    }

    /// Create a patch from a list of edits.
    ///
    /// The edits must already satisfy the ordering invariants; this is not
    /// checked until application time.
    #[must_use]
    pub fn from_edits(edits: impl IntoIterator<Item = Edit>) -> Self {
        Patch {
            edits: edits.into_iter().collect(),
        }
    }

    /// Number of edit operations.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Check whether this patch changes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use syncfeed::Patch;
    ///
    /// assert!(Patch::empty().is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.iter().all(Edit::is_noop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_replace() {
        let edit = Edit::replace(6, 5, "universe");
        assert_eq!(edit.at, 6);
        assert_eq!(edit.delete, 5);
        assert_eq!(edit.insert, "universe");
    }

    #[test]
    fn test_edit_insert() {
        let edit = Edit::insert(0, "hi");
        assert_eq!(edit.delete, 0);
        assert!(!edit.is_noop());
    }

    #[test]
    fn test_edit_delete() {
        let edit = Edit::delete(3, 4);
        assert!(edit.insert.is_empty());
        assert!(!edit.is_noop());
    }

    #[test]
    fn test_edit_noop() {
        assert!(Edit::replace(7, 0, "").is_noop());
    }

    #[test]
    fn test_patch_empty() {
        let patch = Patch::empty();
        assert!(patch.is_empty());
        assert_eq!(patch.len(), 0);
    }

    #[test]
    fn test_patch_from_edits() {
        let patch = Patch::from_edits([Edit::insert(0, "a"), Edit::delete(5, 2)]);
        assert_eq!(patch.len(), 2);
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_serde_round_trip() {
        let patch = Patch::from_edits([Edit::replace(2, 3, "xyz")]);
        let json = serde_json::to_string(&patch).unwrap();
        let back: Patch = serde_json::from_str(&json).unwrap();
        assert_eq!(patch, back);
    }

    #[test]
    fn test_patch_serde_shape() {
        let patch = Patch::from_edits([Edit::insert(1, "x")]);
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value["edits"][0]["at"], 1);
        assert_eq!(value["edits"][0]["delete"], 0);
        assert_eq!(value["edits"][0]["insert"], "x");
    }
}
