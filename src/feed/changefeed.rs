//! Changefeed: a single live subscription to one query.
//!
//! A [`Changefeed`] owns exactly one underlying live query against the
//! backing store. It deduplicates the initial snapshot from subsequent
//! incremental updates, emits change events to a single consumer, and
//! recovers deterministically from failure by closing — never by retrying.
//!
//! # State Machine
//!
//! | State | On success | On failure/cancel |
//! |-------|------------|-------------------|
//! | `Disconnected` | `connect()` → `Connecting` | — |
//! | `Connecting` | snapshot arrives → `Connected` | error, transport cancel, or `close()` in flight → `Closed` |
//! | `Connected` | update arrives → emits `Update`, stays `Connected` | error or transport cancel → internal close, emits `Close` |
//! | `Closed` | — | terminal; `connect()` is never valid again |
//!
//! # Failure Semantics
//!
//! This layer performs **no retries**. A transport error during
//! `Connecting` propagates once as the `connect()` error; during
//! `Connected` it propagates as the single terminal
//! [`FeedEvent::Close`]. Retry-with-backoff belongs to whoever owns the
//! subscription lifecycle and re-creates a fresh feed.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use syncfeed::{Changefeed, FeedEvent, QueryClient, QueryRequest};
//! use serde_json::json;
//!
//! # async fn demo(client: Arc<dyn QueryClient>) -> syncfeed::Result<()> {
//! let feed = Changefeed::new(client, QueryRequest::new("t", json!({"t": {"id": 1}})));
//! let mut events = feed.events().expect("first take");
//!
//! let rows = feed.connect().await?;
//! println!("initial rows: {}", rows.len());
//!
//! while let Some(event) = events.next().await {
//!     match event {
//!         FeedEvent::Update(change) => println!("{:?}", change),
//!         FeedEvent::Close => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{Result, SyncError};
use crate::feed::FeedEvents;
use crate::traits::QueryClient;
use crate::types::{FeedEvent, QueryEvent, QueryRequest};

/// Connection state of a [`Changefeed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedState {
    /// Created, not yet connected.
    Disconnected,
    /// `connect()` issued the query and is awaiting the snapshot.
    Connecting,
    /// Snapshot received; incremental updates are flowing.
    Connected,
    /// Terminal. The instance is not reusable.
    Closed,
}

impl fmt::Display for FeedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedState::Disconnected => "disconnected",
            FeedState::Connecting => "connecting",
            FeedState::Connected => "connected",
            FeedState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// State guarded by one lock so that `close()` and the snapshot arrival
/// cannot interleave between the state flip and the id store.
struct FeedCore {
    state: FeedState,
    id: Option<String>,
}

struct Shared {
    client: Arc<dyn QueryClient>,
    core: Mutex<FeedCore>,
    events_tx: async_channel::Sender<FeedEvent>,
}

impl Shared {
    /// Idempotent shutdown: flips to `Closed` exactly once, cancels the
    /// remote subscription if one exists, emits the single terminal
    /// [`FeedEvent::Close`], and closes the event channel so consumers
    /// terminate.
    async fn close(&self) {
        let id = {
            let mut core = self.core.lock();
            if core.state == FeedState::Closed {
                return;
            }
            core.state = FeedState::Closed;
            core.id.take()
        };
        if let Some(id) = &id {
            // Best effort; query_cancel is idempotent by contract.
            if let Err(e) = self.client.query_cancel(id).await {
                tracing::debug!(%id, error = %e, "query_cancel failed during close");
            }
        }
        let _ = self.events_tx.send(FeedEvent::Close).await;
        self.events_tx.close();
        tracing::debug!("changefeed closed");
    }

    /// Forward incremental updates until the transport stream ends or the
    /// feed leaves the `Connected` state.
    async fn pump(self: Arc<Self>, rx: async_channel::Receiver<Result<QueryEvent>>) {
        while let Ok(item) = rx.recv().await {
            if self.core.lock().state != FeedState::Connected {
                // Straggler delivery after close(); dropped silently.
                return;
            }
            match item {
                Ok(QueryEvent::Change(change)) => {
                    if self.events_tx.send(FeedEvent::Update(change)).await.is_err() {
                        // Consumer is gone; release the remote subscription.
                        self.close().await;
                        return;
                    }
                }
                Ok(QueryEvent::Cancel) => {
                    tracing::debug!("transport cancelled the live query");
                    self.close().await;
                    return;
                }
                Ok(QueryEvent::Snapshot { .. }) => {
                    tracing::warn!("unexpected second snapshot on a connected feed");
                    self.close().await;
                    return;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "transport error on connected feed");
                    self.close().await;
                    return;
                }
            }
        }
        // Transport stream ended without an explicit cancel.
        self.close().await;
    }
}

/// A single subscription to one live query against the backing store.
///
/// Identified by `(table, query, options)` via its [`QueryRequest`]. A
/// changefeed is created per logical subscription and destroyed on
/// [`close`](Changefeed::close); it is not reusable afterward — owners that
/// want to resubscribe create a new instance.
///
/// All methods take `&self`; the feed is safe to share behind an [`Arc`],
/// but it still enforces at most one outstanding low-level query and at
/// most one event stream.
pub struct Changefeed {
    shared: Arc<Shared>,
    request: QueryRequest,
    events_rx: Mutex<Option<async_channel::Receiver<FeedEvent>>>,
}

impl Changefeed {
    /// Create a disconnected changefeed over the given transport.
    ///
    /// The transport is injected here rather than resolved from ambient
    /// state; connection pooling is its concern, not the feed's.
    #[must_use]
    pub fn new(client: Arc<dyn QueryClient>, request: QueryRequest) -> Self {
        let (events_tx, events_rx) = async_channel::unbounded();
        Changefeed {
            shared: Arc::new(Shared {
                client,
                core: Mutex::new(FeedCore {
                    state: FeedState::Disconnected,
                    id: None,
                }),
                events_tx,
            }),
            request,
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> FeedState {
        self.shared.core.lock().state
    }

    /// The transport-assigned subscription id, if connected.
    #[must_use]
    pub fn subscription_id(&self) -> Option<String> {
        self.shared.core.lock().id.clone()
    }

    /// Take the feed's event stream.
    ///
    /// Yields `Some` exactly once: a changefeed has at most one active
    /// consumer. Later calls return `None`.
    #[must_use]
    pub fn events(&self) -> Option<FeedEvents> {
        self.events_rx.lock().take().map(FeedEvents::new)
    }

    /// Query the table, connect to the changefeed, and return the table's
    /// initial rows.
    ///
    /// Issues exactly one underlying query with `changes: true`. The first
    /// stream item resolves this call; every later item is routed to the
    /// event stream as [`FeedEvent::Update`].
    ///
    /// # Errors
    ///
    /// - [`SyncError::State`] if the feed is not `Disconnected` — a
    ///   programming-contract violation, failed before any query is issued.
    /// - [`SyncError::Closed`] if [`close`](Changefeed::close) landed while
    ///   the first response was in flight (deliberate shutdown,
    ///   distinguishable from a transport fault).
    /// - [`SyncError::Cancelled`] if the transport cancelled the query.
    /// - [`SyncError::Connect`] for a malformed first response (no
    ///   snapshot, wrong table, stream ended early).
    /// - Any transport error, passed through once.
    ///
    /// On every failure the feed transitions to `Closed` and stays there.
    pub async fn connect(&self) -> Result<Vec<Value>> {
        {
            let mut core = self.shared.core.lock();
            if core.state != FeedState::Disconnected {
                return Err(SyncError::State(format!(
                    "can only connect while disconnected, state is {}",
                    core.state
                )));
            }
            core.state = FeedState::Connecting;
        }
        tracing::debug!(table = %self.request.table, "connecting changefeed");

        let mut request = self.request.clone();
        request.changes = true;
        let rx = match self.shared.client.do_query(request).await {
            Ok(rx) => rx,
            Err(e) => {
                self.shared.close().await;
                return Err(e);
            }
        };

        let (id, snapshot) = match rx.recv().await {
            Ok(Ok(QueryEvent::Snapshot { id, snapshot })) => (id, snapshot),
            Ok(Ok(QueryEvent::Cancel)) => {
                let closed = self.was_closed_locally();
                self.shared.close().await;
                return Err(if closed {
                    SyncError::Closed
                } else {
                    SyncError::Cancelled
                });
            }
            Ok(Ok(QueryEvent::Change(_))) => {
                self.shared.close().await;
                return Err(SyncError::Connect(
                    "received a change before the initial snapshot".into(),
                ));
            }
            Ok(Err(e)) => {
                let closed = self.was_closed_locally();
                self.shared.close().await;
                return Err(if closed { SyncError::Closed } else { e });
            }
            Err(_) => {
                let closed = self.was_closed_locally();
                self.shared.close().await;
                return Err(if closed {
                    SyncError::Closed
                } else {
                    SyncError::Connect(
                        "transport stream ended before the initial snapshot".into(),
                    )
                });
            }
        };

        if snapshot.table != self.request.table {
            self.shared.close().await;
            return Err(SyncError::Connect(format!(
                "snapshot for table {:?}, expected {:?}",
                snapshot.table, self.request.table
            )));
        }

        let connected = {
            let mut core = self.shared.core.lock();
            if core.state == FeedState::Closed {
                false
            } else {
                core.state = FeedState::Connected;
                core.id = Some(id.clone());
                true
            }
        };
        if !connected {
            // close() landed while the snapshot was in flight; the remote
            // side handed us an id that close() never saw, release it.
            if let Err(e) = self.shared.client.query_cancel(&id).await {
                tracing::debug!(%id, error = %e, "query_cancel failed after late snapshot");
            }
            return Err(SyncError::Closed);
        }

        tracing::debug!(
            table = %self.request.table,
            %id,
            rows = snapshot.rows.len(),
            "changefeed connected"
        );
        let shared = Arc::clone(&self.shared);
        tokio::spawn(shared.pump(rx));
        Ok(snapshot.rows)
    }

    /// Close the feed.
    ///
    /// Idempotent in effect: repeated calls are harmless. The first call
    /// cancels the remote subscription (if one exists), emits the terminal
    /// [`FeedEvent::Close`] exactly once, and closes the event channel.
    pub async fn close(&self) {
        self.shared.close().await;
    }

    fn was_closed_locally(&self) -> bool {
        self.shared.core.lock().state == FeedState::Closed
    }
}

impl fmt::Debug for Changefeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Changefeed")
            .field("table", &self.request.table)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_state_display() {
        assert_eq!(FeedState::Disconnected.to_string(), "disconnected");
        assert_eq!(FeedState::Connecting.to_string(), "connecting");
        assert_eq!(FeedState::Connected.to_string(), "connected");
        assert_eq!(FeedState::Closed.to_string(), "closed");
    }
}
