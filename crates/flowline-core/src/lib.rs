//! flowline core: transport-agnostic message types, priority levels, and the
//! shared error surface.
//!
//! This crate defines the wire-level contracts spoken between the trigger,
//! controller, broker, dispatcher, and function host. It intentionally
//! carries no transport or runtime dependencies so it can be reused by every
//! node role and by test harnesses.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `FlowlineError`/`Result` so pipeline
//! processes do not crash on malformed traffic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod function;
pub mod protocol;

/// Shared result type.
pub use error::{FlowlineError, Result};
