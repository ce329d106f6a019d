//! Protocol modules (priority levels + broker wire messages).
//!
//! Everything here is plain JSON over HTTP. All parsers are panic-free:
//! malformed input is reported as `FlowlineError` instead of panicking, so a
//! node keeps serving when a peer sends garbage.

pub mod message;
pub mod priority;

pub use message::{AckNote, ErrorBody, Publish, PublishReceipt, SubscribeReply};
pub use priority::Level;
