//! Stacks library catalog application.
//!
//! The `books` module plugs into the stacks kernel; [`app`] wires settings, storage,
//! modules and the HTTP server together for the binaries.

pub mod app;
pub mod modules;
pub mod utils;

/// Re-export commonly used types
pub use modules::*;
