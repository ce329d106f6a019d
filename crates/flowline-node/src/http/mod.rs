//! Outbound HTTP plumbing shared by trigger, controller, dispatcher, agent.

pub mod client;

pub use client::HttpClient;
