//! Dispatcher: consumes broker topics and invokes bound functions.
//!
//! One consumer task per configured topic; each long-polls the broker's
//! `/subscribe/{topic}`, invokes the bound function endpoint when a message
//! arrives, and acks the message back to the controller.

pub mod consumer;

pub use consumer::{poll_once, run, PollOutcome};
