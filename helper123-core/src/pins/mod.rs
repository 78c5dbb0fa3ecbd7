//! Local model of the microcontroller's pins
//!
//! The host keeps a mirror of each pin's configured mode and its last
//! reported value. Only the link engine mutates it.

mod device;
mod pin;

pub use device::{Device, PinError, NUM_DIGITAL_PINS, NUM_PINS};
pub use pin::{Pin, PinMode, ReadyState};
