//! Top-level facade crate for flowline.
//!
//! Re-exports core types and the node library so users can depend on a single crate.

pub mod core {
    pub use flowline_core::*;
}

pub mod node {
    pub use flowline_node::*;
}
