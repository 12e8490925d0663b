//! Event stream handed to the changefeed's single consumer.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;

use crate::types::FeedEvent;

/// The ordered event stream of one [`Changefeed`](crate::Changefeed).
///
/// Yields [`FeedEvent::Update`] per row change in the order the backing
/// store produced them, then exactly one [`FeedEvent::Close`], then ends.
/// Obtained once per feed via
/// [`Changefeed::events`](crate::Changefeed::events).
pub struct FeedEvents {
    receiver: async_channel::Receiver<FeedEvent>,
}

impl FeedEvents {
    pub(crate) fn new(receiver: async_channel::Receiver<FeedEvent>) -> Self {
        FeedEvents { receiver }
    }

    /// Receive the next event, or `None` once the feed is closed and
    /// drained.
    pub async fn next(&mut self) -> Option<FeedEvent> {
        self.receiver.recv().await.ok()
    }
}

impl Stream for FeedEvents {
    type Item = FeedEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // SAFETY: `receiver` is never moved out of `FeedEvents`, so
        // projecting the pin to it is sound.
        unsafe { self.map_unchecked_mut(|s| &mut s.receiver) }.poll_next(cx)
    }
}
