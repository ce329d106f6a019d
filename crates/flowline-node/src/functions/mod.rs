//! Hosted functions: service trait, registry, HTTP mount, and the built-in
//! greeter.

pub mod greeter;
pub mod host;
pub mod http;

pub use greeter::Greeter;
pub use host::{FunctionRegistry, FunctionService, LogSink};
