//! Link configuration
//!
//! Timing parameters for the link engine, loadable from TOML when the `toml`
//! feature is enabled.

mod link;

pub use link::*;
