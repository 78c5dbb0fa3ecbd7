//! GPIO input abstraction
//!
//! The only pin the host link samples is the peer's data-ready line, so this
//! module defines just the input side.

/// Digital input pin
///
/// Implementations sample the hardware line on every call; no caching.
pub trait InputPin {
    /// Error type for sampling the line
    type Error;

    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> Result<bool, Self::Error>;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}
