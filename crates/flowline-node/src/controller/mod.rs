//! Controller: turns a priority level into a broker publish and tracks
//! outstanding (unacked) messages per topic.

pub mod http;
pub mod pending;

pub use pending::AckLedger;
