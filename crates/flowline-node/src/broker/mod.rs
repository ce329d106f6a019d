//! In-memory topic broker (MOM).
//!
//! Topics are FIFO queues created on first use. Publish appends; subscribe
//! long-polls for the next message and hands each message to exactly one
//! subscriber.

pub mod http;
pub mod store;

pub use store::TopicStore;
