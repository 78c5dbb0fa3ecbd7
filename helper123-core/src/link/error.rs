//! Link error types

use crate::pins::PinError;

/// Exchanges that can time out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    /// Ping round trip
    Ping,
    /// Pin-initialization handshake
    PinInit,
    /// Digital pin reading
    DigitalRead,
}

/// Errors returned by link operations
///
/// All of these are recoverable; the caller decides whether to retry,
/// reconnect or give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// The transport failed
    Transport(E),
    /// `connect()` has not been called
    NotConnected,
    /// Pin index outside the valid range; nothing was sent
    InvalidPin { pin: u8 },
    /// The peer refused to configure a pin
    PinRejected { pin: u8 },
    /// No answer before the configured deadline
    Timeout(Operation),
    /// The peer rebooted; the local device model was replaced
    PeerRestarted,
    /// The peer has not reported startup yet
    NoDevice,
}

impl<E> From<PinError> for LinkError<E> {
    fn from(e: PinError) -> Self {
        match e {
            PinError::InvalidPin { pin } => LinkError::InvalidPin { pin },
        }
    }
}

impl<E> LinkError<E> {
    /// Returns true for a deadline expiry
    pub fn is_timeout(&self) -> bool {
        matches!(self, LinkError::Timeout(_))
    }
}
