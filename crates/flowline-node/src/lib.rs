//! flowline node library entry.
//!
//! This crate wires the pipeline components (trigger, controller, broker,
//! dispatcher, function host, agent) into one role-selectable runtime. It is
//! intended to be consumed by the binary (`main.rs`) and by integration
//! tests.

pub mod agent;
pub mod app_state;
pub mod broker;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod functions;
pub mod http;
pub mod obs;
pub mod ops;
pub mod reply;
pub mod router;
pub mod trigger;
