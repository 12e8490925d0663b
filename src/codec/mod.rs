//! Pure diff/apply functions over text documents.
//!
//! The codec is the basis for merging concurrent edits without
//! full-document transmission: [`make_patch`] computes a compact diff
//! between two versions and [`apply_patch`] reconstructs the new version
//! from the old one plus the patch. Neither performs any I/O or holds any
//! state.
//!
//! # Laws
//!
//! - **Round trip**: `apply_patch(a, &make_patch(a, b)) == b` for all `a`,
//!   `b`.
//! - **Identity**: `make_patch(a, a)` is the empty patch, and applying the
//!   empty patch returns the document unchanged.
//!
//! # Diff strategy
//!
//! Deterministic and minimal-ish, not provably minimal:
//!
//! 1. trim the common prefix and suffix,
//! 2. pure insertion / pure deletion when one middle is empty,
//! 3. two edits when one middle contains the other,
//! 4. line-granularity LCS when both middles span multiple lines,
//! 5. otherwise a single replacement edit.
//!
//! Offsets count chars (Unicode scalar values), so patches are safe to
//! exchange between peers regardless of the UTF-8 byte layout.
//!
//! # Failure
//!
//! [`apply_patch`] fails with [`SyncError::MalformedPatch`] when an edit
//! references positions outside the document or overlaps a previous edit.
//! This signals version skew upstream and is deliberately never clamped:
//! clamping would produce silent data corruption instead of a resync.

use crate::error::{Result, SyncError};
use crate::types::{Edit, Patch};

/// Upper bound on the line-LCS table size; larger inputs fall back to a
/// single replacement edit.
const LCS_CELL_LIMIT: usize = 1 << 20;

/// Compute a patch transforming `a` into `b`.
///
/// Deterministic and side-effect free. `make_patch(a, a)` yields the empty
/// patch.
///
/// # Examples
///
/// ```
/// use syncfeed::{apply_patch, make_patch};
///
/// let patch = make_patch("hello world", "hello there, world");
/// assert_eq!(apply_patch("hello world", &patch).unwrap(), "hello there, world");
/// ```
#[must_use]
pub fn make_patch(a: &str, b: &str) -> Patch {
    if a == b {
        return Patch::empty();
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let prefix = common_prefix(&a, &b);
    let suffix = common_suffix(&a[prefix..], &b[prefix..]);
    let mid_a = &a[prefix..a.len() - suffix];
    let mid_b = &b[prefix..b.len() - suffix];

    Patch::from_edits(diff_middle(mid_a, mid_b, prefix))
}

/// Apply `patch` to `doc`, returning the new document value.
///
/// Pure and total over well-formed patches. Edits must be sorted ascending,
/// non-overlapping, and in bounds; anything else fails with
/// [`SyncError::MalformedPatch`] and leaves the input untouched.
///
/// # Errors
///
/// Returns [`SyncError::MalformedPatch`] if an edit range exceeds the
/// document length or edits overlap / are out of order.
pub fn apply_patch(doc: &str, patch: &Patch) -> Result<String> {
    if patch.edits.is_empty() {
        return Ok(doc.to_owned());
    }
    let chars: Vec<char> = doc.chars().collect();
    let mut out = String::with_capacity(doc.len());
    let mut cursor = 0usize;
    for edit in &patch.edits {
        if edit.at < cursor {
            return Err(SyncError::MalformedPatch(format!(
                "edit at {} overlaps previous edit ending at {}",
                edit.at, cursor
            )));
        }
        let end = edit.at.checked_add(edit.delete).ok_or_else(|| {
            SyncError::MalformedPatch(format!(
                "edit range {}+{} overflows",
                edit.at, edit.delete
            ))
        })?;
        if end > chars.len() {
            return Err(SyncError::MalformedPatch(format!(
                "edit range {}..{} exceeds document length {}",
                edit.at,
                end,
                chars.len()
            )));
        }
        out.extend(&chars[cursor..edit.at]);
        out.push_str(&edit.insert);
        cursor = end;
    }
    out.extend(&chars[cursor..]);
    Ok(out)
}

fn common_prefix(a: &[char], b: &[char]) -> usize {
    let len = a.len().min(b.len());
    let mut p = 0;
    while p < len && a[p] == b[p] {
        p += 1;
    }
    p
}

fn common_suffix(a: &[char], b: &[char]) -> usize {
    let len = a.len().min(b.len());
    let mut s = 0;
    while s < len && a[a.len() - s - 1] == b[b.len() - s - 1] {
        s += 1;
    }
    s
}

/// Diff the prefix/suffix-trimmed middles. `base` is the char offset of the
/// middle within the pre-image document.
fn diff_middle(a: &[char], b: &[char], base: usize) -> Vec<Edit> {
    if a.is_empty() {
        return vec![Edit::insert(base, collect(b))];
    }
    if b.is_empty() {
        return vec![Edit::delete(base, a.len())];
    }

    // One middle contained in the other: two edits around the shared run.
    if a.len() < b.len() {
        if let Some(i) = find_subslice(b, a) {
            let mut edits = Vec::with_capacity(2);
            if i > 0 {
                edits.push(Edit::insert(base, collect(&b[..i])));
            }
            let tail = &b[i + a.len()..];
            if !tail.is_empty() {
                edits.push(Edit::insert(base + a.len(), collect(tail)));
            }
            return edits;
        }
    } else if let Some(i) = find_subslice(a, b) {
        let mut edits = Vec::with_capacity(2);
        if i > 0 {
            edits.push(Edit::delete(base, i));
        }
        let tail_len = a.len() - i - b.len();
        if tail_len > 0 {
            edits.push(Edit::delete(base + i + b.len(), tail_len));
        }
        return edits;
    }

    if spans_lines(a) && spans_lines(b) {
        if let Some(edits) = diff_lines(a, b, base) {
            return edits;
        }
    }

    vec![Edit::replace(base, a.len(), collect(b))]
}

/// Line-granularity LCS diff. Returns `None` when the inputs are too large
/// for the quadratic table.
fn diff_lines(a: &[char], b: &[char], base: usize) -> Option<Vec<Edit>> {
    let la = split_lines(a);
    let lb = split_lines(b);
    let (n, m) = (la.len(), lb.len());
    if n.saturating_mul(m) > LCS_CELL_LIMIT {
        return None;
    }

    // dp[i][j] = LCS length of la[i..] and lb[j..]
    let mut dp = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i][j] = if la[i] == lb[j] {
                dp[i + 1][j + 1] + 1
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let mut edits = Vec::new();
    let (mut i, mut j) = (0, 0);
    let mut offset = base;
    while i < n || j < m {
        if i < n && j < m && la[i] == lb[j] {
            offset += la[i].len();
            i += 1;
            j += 1;
            continue;
        }
        // Coalesce a maximal mismatching run into one replacement.
        let run_start = offset;
        let mut delete = 0usize;
        let mut insert = String::new();
        while i < n || j < m {
            if i < n && j < m && la[i] == lb[j] {
                break;
            }
            if j < m && (i >= n || dp[i][j + 1] >= dp[i + 1][j]) {
                insert.extend(lb[j].iter());
                j += 1;
            } else {
                delete += la[i].len();
                offset += la[i].len();
                i += 1;
            }
        }
        edits.push(Edit::replace(run_start, delete, insert));
    }
    Some(edits)
}

fn spans_lines(text: &[char]) -> bool {
    text.iter().position(|&c| c == '\n').is_some_and(|i| i + 1 < text.len())
}

fn split_lines(text: &[char]) -> Vec<&[char]> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, &c) in text.iter().enumerate() {
        if c == '\n' {
            lines.push(&text[start..=i]);
            start = i + 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn find_subslice(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(a: &str, b: &str) {
        let patch = make_patch(a, b);
        assert_eq!(apply_patch(a, &patch).unwrap(), b, "a={a:?} b={b:?}");
    }

    // ========== Round-Trip Law ==========

    #[test]
    fn test_round_trip_insert_middle() {
        round_trip("hello world", "hello there, world");
    }

    #[test]
    fn test_round_trip_replace() {
        round_trip("hello world", "hello universe");
    }

    #[test]
    fn test_round_trip_delete() {
        round_trip("hello world", "hello");
    }

    #[test]
    fn test_round_trip_prepend_append() {
        round_trip("middle", "start middle end");
    }

    #[test]
    fn test_round_trip_from_empty() {
        round_trip("", "brand new content");
    }

    #[test]
    fn test_round_trip_to_empty() {
        round_trip("all gone", "");
    }

    #[test]
    fn test_round_trip_disjoint_changes() {
        round_trip("aaa bbb ccc ddd", "axa bbb cyc ddd");
    }

    #[test]
    fn test_round_trip_multiline() {
        let a = "line one\nline two\nline three\nline four\n";
        let b = "line one\nline 2\nline three\ninserted\nline four\n";
        round_trip(a, b);
    }

    #[test]
    fn test_round_trip_multiline_delete() {
        let a = "alpha\nbeta\ngamma\ndelta\n";
        let b = "alpha\ndelta\n";
        round_trip(a, b);
    }

    #[test]
    fn test_round_trip_unicode() {
        round_trip("héllo wörld", "héllo there wörld");
        round_trip("日本語のテスト", "日本語の新しいテスト");
    }

    #[test]
    fn test_round_trip_completely_different() {
        round_trip("abcdef", "uvwxyz");
    }

    #[test]
    fn test_round_trip_repeated_content() {
        round_trip("abab", "ababab");
        round_trip("aaaa", "aa");
    }

    // ========== Identity Law ==========

    #[test]
    fn test_identity_equal_inputs() {
        assert!(make_patch("same text", "same text").is_empty());
        assert!(make_patch("", "").is_empty());
    }

    #[test]
    fn test_identity_empty_patch_application() {
        let doc = "unchanged";
        assert_eq!(apply_patch(doc, &Patch::empty()).unwrap(), doc);
    }

    // ========== Diff Shape ==========

    #[test]
    fn test_insert_produces_single_edit() {
        let patch = make_patch("hello world", "hello beautiful world");
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.edits[0].delete, 0);
    }

    #[test]
    fn test_delete_produces_single_edit() {
        let patch = make_patch("hello beautiful world", "hello world");
        assert_eq!(patch.len(), 1);
        assert!(patch.edits[0].insert.is_empty());
    }

    #[test]
    fn test_containment_produces_two_edits() {
        // "bcd" is contained in "abcde"
        let patch = make_patch("xbcdx", "xabcdex");
        assert_eq!(patch.len(), 2);
        assert!(patch.edits.iter().all(|e| e.delete == 0));
    }

    #[test]
    fn test_disjoint_line_edits_stay_separate() {
        let a = "one\ntwo\nthree\nfour\nfive\n";
        let b = "one\nTWO\nthree\nfour\nFIVE\n";
        let patch = make_patch(a, b);
        assert_eq!(patch.len(), 2);
    }

    #[test]
    fn test_edits_sorted_and_disjoint() {
        let a = "alpha\nbeta\ngamma\ndelta\nepsilon\n";
        let b = "alpha\nB\ngamma\nD\nepsilon\n";
        let patch = make_patch(a, b);
        let mut cursor = 0;
        for edit in &patch.edits {
            assert!(edit.at >= cursor);
            cursor = edit.at + edit.delete;
        }
    }

    #[test]
    fn test_determinism() {
        let a = "some\nshared\ncontent\nhere\n";
        let b = "some\nother\ncontent\nthere\n";
        assert_eq!(make_patch(a, b), make_patch(a, b));
    }

    // ========== Malformed Patches ==========

    #[test]
    fn test_delete_past_end_fails() {
        let patch = Patch::from_edits([Edit::delete(2, 100)]);
        let err = apply_patch("short", &patch).unwrap_err();
        assert!(matches!(err, SyncError::MalformedPatch(_)));
    }

    #[test]
    fn test_offset_past_end_fails() {
        let patch = Patch::from_edits([Edit::insert(99, "x")]);
        assert!(apply_patch("tiny", &patch).is_err());
    }

    #[test]
    fn test_overlapping_edits_fail() {
        let patch = Patch::from_edits([Edit::delete(0, 5), Edit::delete(3, 2)]);
        let err = apply_patch("abcdefgh", &patch).unwrap_err();
        assert!(matches!(err, SyncError::MalformedPatch(_)));
    }

    #[test]
    fn test_out_of_order_edits_fail() {
        let patch = Patch::from_edits([Edit::insert(5, "x"), Edit::insert(1, "y")]);
        assert!(apply_patch("abcdefgh", &patch).is_err());
    }

    #[test]
    fn test_failed_apply_leaves_no_partial_result() {
        // The input is borrowed immutably; a failure returns only the error.
        let doc = "stable";
        let patch = Patch::from_edits([Edit::delete(0, 99)]);
        assert!(apply_patch(doc, &patch).is_err());
        assert_eq!(doc, "stable");
    }

    // ========== Edge Bounds ==========

    #[test]
    fn test_edit_exactly_at_end_is_valid() {
        let patch = Patch::from_edits([Edit::insert(5, "!")]);
        assert_eq!(apply_patch("hello", &patch).unwrap(), "hello!");
    }

    #[test]
    fn test_delete_entire_document() {
        let patch = Patch::from_edits([Edit::delete(0, 5)]);
        assert_eq!(apply_patch("hello", &patch).unwrap(), "");
    }

    #[test]
    fn test_unicode_offsets_count_chars_not_bytes() {
        // "é" is 2 bytes but 1 char; offset 1 lands after it.
        let patch = Patch::from_edits([Edit::insert(1, "x")]);
        assert_eq!(apply_patch("éa", &patch).unwrap(), "éxa");
    }
}
