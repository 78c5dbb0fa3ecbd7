//! Link engine
//!
//! Turns the bus byte stream into device-model updates and runs the
//! request/response exchanges the application uses.

mod engine;
mod error;
#[cfg(test)]
mod mock;

pub use engine::{Link, PinInitResult, PENDING_CAPACITY};
pub use error::{LinkError, Operation};
