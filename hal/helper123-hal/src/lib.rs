//! helper123 Hardware Abstraction Layer
//!
//! This crate defines the traits the host link needs from the platform it
//! runs on. The link engine only ever talks to a [`Transport`] and a
//! [`Clock`]; everything below that line is supplied by the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  helper123-core (link engine)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  helper123-hal (this crate - traits)    │
//! │  Transport + Clock                      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ SpiTransport  │       │ embedded-hal  │
//! │ (SPI + GPIO)  │       │   adapters    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`transport::Transport`] - Half-duplex byte transport with a data-ready line
//! - [`spi::SpiBus`] - SPI master writes and reads
//! - [`gpio::InputPin`] - Digital input (the peer's data-ready signal)
//! - [`time::Clock`] - Monotonic time and blocking delays

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "embedded-hal")]
pub mod ehal;
pub mod gpio;
pub mod spi;
pub mod time;
pub mod transport;

// Re-export key traits at crate root for convenience
pub use gpio::InputPin;
pub use spi::SpiBus;
pub use time::Clock;
#[cfg(feature = "std")]
pub use time::StdClock;
pub use transport::{BusError, SpiTransport, Transport};
