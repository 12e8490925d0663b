//! Core data types for the synchronization core.

mod event;
mod patch;
mod query;
mod table;

pub use event::{FeedEvent, QueryEvent, RowChange};
pub use patch::{Edit, Patch};
pub use query::{QueryRequest, DEFAULT_QUERY_TIMEOUT};
pub use table::TableSnapshot;
