//! Error types for the synchronization core.
//!
//! This module defines all error types that can occur in the patch codec,
//! document layer, and changefeed. The [`Result`] type alias provides a
//! convenient shorthand for operations that may fail.
//!
//! # Error Categories
//!
//! | Category | Variants | Retryable |
//! |----------|----------|-----------|
//! | Codec | `MalformedPatch` | No |
//! | Connect | `Connect`, `Cancelled` | `Cancelled` only |
//! | Lifecycle | `Closed`, `State` | No |
//! | Transport | `Transport`, `Io` | Yes |
//! | Encoding | `Json` | No |
//!
//! # Error Recovery
//!
//! No component in this crate retries anything itself. Use
//! [`SyncError::is_retryable()`] in the owning layer to decide whether a
//! failed subscription should be rebuilt: transport faults and
//! transport-initiated cancellations are retryable with a *new* changefeed
//! instance, while a deliberate [`SyncError::Closed`] shutdown is not.
//!
//! A [`SyncError::MalformedPatch`] indicates version skew between peers; the
//! caller must re-synchronize from a fresh snapshot rather than retry the
//! same patch.
//!
//! # Examples
//!
//! ```
//! use syncfeed::SyncError;
//!
//! let err = SyncError::Transport("connection reset".into());
//! assert!(err.is_retryable());
//!
//! let err = SyncError::Closed;
//! assert!(!err.is_retryable());
//! ```

use std::io;
use thiserror::Error;

/// Result type for synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can occur in the synchronization core.
///
/// Each variant represents a different failure mode. Use pattern matching to
/// handle specific errors appropriately:
///
/// ```
/// use syncfeed::SyncError;
///
/// fn handle_error(err: SyncError) {
///     match err {
///         SyncError::MalformedPatch(_) => {
///             println!("version skew, resync from snapshot");
///         }
///         SyncError::Closed => {
///             println!("feed was shut down deliberately");
///         }
///         other => eprintln!("error: {}", other),
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SyncError {
    /// A patch references content outside the document's current bounds,
    /// or its edits overlap or are out of order.
    ///
    /// This signals a version mismatch upstream. It is always surfaced and
    /// never recovered locally: clamping the patch instead would silently
    /// corrupt the document.
    #[error("malformed patch: {0}")]
    MalformedPatch(String),

    /// `connect()` failed: the transport rejected the query or the first
    /// response was malformed (wrong table, no snapshot, stream ended).
    #[error("connect failed: {0}")]
    Connect(String),

    /// The transport cancelled the underlying query.
    ///
    /// Retryable, but never retried at this layer: the owner resubscribes
    /// by creating a new changefeed.
    #[error("query cancelled by transport")]
    Cancelled,

    /// The changefeed was closed locally while an operation was in flight.
    ///
    /// Distinguishable from a transport fault so that retry logic does not
    /// mistake a deliberate shutdown for a transient error.
    #[error("changefeed closed")]
    Closed,

    /// An operation was called in a state that does not permit it, e.g.
    /// `connect()` on a feed that is not disconnected.
    ///
    /// A programming-contract violation, not a runtime condition.
    #[error("invalid changefeed state: {0}")]
    State(String),

    /// Transport-level failure while connecting or connected.
    ///
    /// Constructed by [`QueryClient`](crate::QueryClient) implementations.
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Network or file I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SyncError {
    /// Check if the failed operation may succeed on a fresh attempt.
    ///
    /// Returns `true` for transient faults (transport errors, I/O errors,
    /// transport-initiated cancellations). Returns `false` for permanent
    /// conditions: contract violations, deliberate shutdown, and malformed
    /// patches (which require a full resync, not a retry).
    ///
    /// # Examples
    ///
    /// ```
    /// use syncfeed::SyncError;
    ///
    /// assert!(SyncError::Cancelled.is_retryable());
    /// assert!(!SyncError::State("connected".into()).is_retryable());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SyncError::Transport(_) | SyncError::Io(_) | SyncError::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_is_retryable() {
        assert!(SyncError::Transport("reset".into()).is_retryable());
    }

    #[test]
    fn test_cancelled_is_retryable() {
        assert!(SyncError::Cancelled.is_retryable());
    }

    #[test]
    fn test_closed_not_retryable() {
        assert!(!SyncError::Closed.is_retryable());
    }

    #[test]
    fn test_malformed_patch_not_retryable() {
        assert!(!SyncError::MalformedPatch("out of bounds".into()).is_retryable());
    }

    #[test]
    fn test_state_not_retryable() {
        assert!(!SyncError::State("connecting".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = SyncError::MalformedPatch("edit at 10 exceeds length 5".into());
        assert!(err.to_string().contains("exceeds length 5"));
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        let err: SyncError = io_err.into();
        assert!(err.is_retryable());
    }
}
