//! Immutable document values layered over the patch codec.
//!
//! A [`Document`] wraps one immutable value so that higher layers (table
//! sync, editors) never touch raw diff/patch primitives directly. Documents
//! are value objects: equality is structural and every patch operation
//! returns a *new* document, never a mutation.
//!
//! Plain strings are the only value kind today; table/JSON variants are
//! structurally analogous and implement the same trait.

mod string_doc;

pub use string_doc::StringDocument;

use crate::error::Result;
use crate::types::Patch;

/// An immutable, patchable document value.
///
/// Implementations must behave as value objects: structurally comparable,
/// never mutated in place. Consumers serialize all patch applications for
/// one document identity through a single owner; the API returning fresh
/// documents means a violated ordering shows up as a lost update, not as
/// memory corruption, but it is still a caller bug.
pub trait Document: Sized {
    /// The current value as text.
    fn to_str(&self) -> &str;

    /// Structural equality; an absent `other` compares false.
    fn is_equal(&self, other: Option<&Self>) -> bool;

    /// Apply a patch, returning a new document.
    ///
    /// # Errors
    ///
    /// Only what the codec raises: a malformed patch surfaces as
    /// [`SyncError::MalformedPatch`](crate::SyncError::MalformedPatch) and
    /// leaves `self` untouched.
    fn apply_patch(&self, patch: &Patch) -> Result<Self>;

    /// Compute the patch transforming `self` into `other`.
    fn make_patch(&self, other: &Self) -> Patch;
}
