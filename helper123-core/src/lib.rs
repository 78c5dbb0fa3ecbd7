//! Host-side core logic for helper123 robots
//!
//! This crate contains everything between the application and the bus:
//!
//! - Device model (per-pin mode, readiness and cached value)
//! - Link engine that drains the bus, dispatches peer packets and runs the
//!   ping, pin-initialization and digital-read exchanges
//! - Link error taxonomy
//! - Link configuration (timeouts and settle intervals)
//!
//! The bus itself is abstracted by `helper123_hal::Transport`; time by
//! `helper123_hal::Clock`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

pub mod config;
pub mod link;
pub mod pins;

pub use config::LinkConfig;
pub use link::{Link, LinkError, Operation, PinInitResult};
pub use pins::{Device, Pin, PinError, PinMode, ReadyState};
