//! Immutable string document.

use crate::codec::{apply_patch, make_patch};
use crate::doc::Document;
use crate::error::Result;
use crate::types::Patch;

/// An immutable plain-text document.
///
/// # Examples
///
/// ```
/// use syncfeed::{Document, StringDocument};
///
/// let a = StringDocument::new("hello world");
/// let b = StringDocument::new("hello there, world");
///
/// let patch = a.make_patch(&b);
/// let c = a.apply_patch(&patch).unwrap();
/// assert!(c.is_equal(Some(&b)));
/// assert_eq!(a.to_str(), "hello world"); // `a` is untouched
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StringDocument {
    value: String,
}

impl StringDocument {
    /// Create a document from a raw value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        StringDocument {
            value: value.into(),
        }
    }
}

impl Document for StringDocument {
    fn to_str(&self) -> &str {
        &self.value
    }

    fn is_equal(&self, other: Option<&Self>) -> bool {
        other.is_some_and(|other| self.value == other.value)
    }

    fn apply_patch(&self, patch: &Patch) -> Result<Self> {
        Ok(StringDocument::new(apply_patch(&self.value, patch)?))
    }

    fn make_patch(&self, other: &Self) -> Patch {
        make_patch(&self.value, &other.value)
    }
}

impl From<&str> for StringDocument {
    fn from(value: &str) -> Self {
        StringDocument::new(value)
    }
}

impl From<String> for StringDocument {
    fn from(value: String) -> Self {
        StringDocument { value }
    }
}
