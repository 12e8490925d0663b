//! Live changefeed subscriptions.

mod changefeed;
mod stream;

pub use changefeed::{Changefeed, FeedState};
pub use stream::FeedEvents;
