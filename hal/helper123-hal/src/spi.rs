//! SPI bus abstraction
//!
//! The peer sits behind an SPI master on the host. Writes and reads are
//! issued as separate transactions; the link never needs full-duplex
//! transfers because the bus is used half-duplex.

/// SPI bus master
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Write data without reading
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data (writes zeros)
    ///
    /// Fills the whole buffer or fails.
    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}
