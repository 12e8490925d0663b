//! Transport abstraction consumed by the changefeed.

use crate::error::Result;
use crate::types::{QueryEvent, QueryRequest};
use async_trait::async_trait;

/// Abstraction over the backing store's live-query transport.
///
/// A [`Changefeed`](crate::Changefeed) is constructed with a `QueryClient`
/// rather than looking one up from ambient state; connection pooling and
/// endpoint management belong to the transport layer behind this trait.
///
/// # Contract
///
/// - [`do_query`](QueryClient::do_query) is invoked exactly once per
///   changefeed. The returned stream yields the snapshot as its **first**
///   item and every subsequent incremental update after it, in the order
///   the backing store produced them. Transport failures are surfaced as
///   `Err` items or by closing the channel.
/// - [`query_cancel`](QueryClient::query_cancel) terminates a
///   previously-established subscription by id. It must be idempotent and
///   must not fail for an id that is already invalid.
#[async_trait]
pub trait QueryClient: Send + Sync + 'static {
    /// Issue one live query and return its event stream.
    async fn do_query(
        &self,
        request: QueryRequest,
    ) -> Result<async_channel::Receiver<Result<QueryEvent>>>;

    /// Cancel a live query by its subscription id.
    async fn query_cancel(&self, id: &str) -> Result<()>;
}
