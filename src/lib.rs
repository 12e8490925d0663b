//! syncfeed: synchronization core for collaborative documents.
//!
//! This crate implements the two tightly coupled pieces that let many
//! independent clients and one authoritative backing store converge on a
//! shared mutable document despite concurrent edits and unreliable
//! connectivity:
//!
//! - **Patch codec + documents**: [`make_patch`]/[`apply_patch`] compute
//!   and apply compact diffs; [`StringDocument`] wraps an immutable value
//!   so higher layers never touch raw diff primitives. The round-trip law
//!   `apply_patch(a, make_patch(a, b)) == b` holds for all inputs.
//! - **Changefeed**: [`Changefeed`] turns a live backing query into a
//!   subscribable, incrementally-updated mirror with an explicit
//!   connection state machine, at most one active subscription per query,
//!   and deterministic shutdown on failure.
//!
//! Higher layers (table sync, editors) compose the two: fold incoming
//! [`FeedEvent::Update`]s into a document via patch application, and fold
//! local edits into outgoing patches over the same channel. That layer,
//! along with retry/backoff, lives outside this crate; the transport is
//! injected via the [`QueryClient`] trait.

pub use smallvec;

pub mod codec;
pub mod doc;
pub mod error;
pub mod feed;
pub mod traits;
pub mod types;

pub use codec::{apply_patch, make_patch};
pub use doc::{Document, StringDocument};
pub use error::{Result, SyncError};
pub use feed::{Changefeed, FeedEvents, FeedState};
pub use traits::QueryClient;
pub use types::{
    Edit, FeedEvent, Patch, QueryEvent, QueryRequest, RowChange, TableSnapshot,
    DEFAULT_QUERY_TIMEOUT,
};
