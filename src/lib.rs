//! shelf application library
//!
//! The books and authors modules plus the boot sequence that wires them to
//! PostgreSQL and the HTTP server.

// The OpenAPI fragments are large `json!` literals.
#![recursion_limit = "256"]

pub mod app;
pub mod modules;

pub use modules::*;
