//! Half-duplex transport contract
//!
//! The link engine sees the bus as four operations: write an opcode byte,
//! write payload bytes, sample the peer's data-ready line, and read a byte.
//! No framing is applied at this level.

use crate::gpio::InputPin;
use crate::spi::SpiBus;

/// Byte transport to the peer
///
/// Only one side may drive the bus at a time. Callers are responsible for
/// draining inbound data (see `is_peer_data_ready`) before writing.
pub trait Transport {
    /// Error type for bus operations
    type Error;

    /// Write a single byte (usually an opcode)
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write raw payload bytes
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Sample the peer's data-ready signal line
    fn is_peer_data_ready(&mut self) -> Result<bool, Self::Error>;

    /// Read one byte from the peer
    fn read_byte(&mut self) -> Result<u8, Self::Error>;
}

/// Errors from a [`SpiTransport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError<S, P> {
    /// SPI transaction failed
    Spi(S),
    /// Sampling the data-ready line failed
    ReadyLine(P),
}

/// SPI master plus a data-ready GPIO input
///
/// This is the wiring the robot uses: the host is SPI master and the peer
/// raises a dedicated line while it has bytes queued for the host.
pub struct SpiTransport<S, P> {
    spi: S,
    ready: P,
}

impl<S: SpiBus, P: InputPin> SpiTransport<S, P> {
    /// Create a new SPI transport
    ///
    /// # Arguments
    /// - `spi`: SPI master connected to the peer
    /// - `ready`: Input wired to the peer's data-ready output (active high)
    pub fn new(spi: S, ready: P) -> Self {
        Self { spi, ready }
    }

    /// Consume the transport and return the bus and pin
    pub fn release(self) -> (S, P) {
        (self.spi, self.ready)
    }
}

impl<S: SpiBus, P: InputPin> Transport for SpiTransport<S, P> {
    type Error = BusError<S::Error, P::Error>;

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.spi.write(&[byte]).map_err(BusError::Spi)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.spi.write(bytes).map_err(BusError::Spi)
    }

    fn is_peer_data_ready(&mut self) -> Result<bool, Self::Error> {
        self.ready.is_high().map_err(BusError::ReadyLine)
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.spi.read(&mut buf).map_err(BusError::Spi)?;
        Ok(buf[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock SPI bus recording writes and replaying reads
    struct MockSpi {
        written: [u8; 8],
        written_len: usize,
        write_calls: usize,
        to_read: &'static [u8],
        read_pos: usize,
    }

    impl MockSpi {
        fn new(to_read: &'static [u8]) -> Self {
            Self {
                written: [0; 8],
                written_len: 0,
                write_calls: 0,
                to_read,
                read_pos: 0,
            }
        }
    }

    impl SpiBus for MockSpi {
        type Error = ();

        fn write(&mut self, data: &[u8]) -> Result<(), ()> {
            self.write_calls += 1;
            for &byte in data {
                self.written[self.written_len] = byte;
                self.written_len += 1;
            }
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<(), ()> {
            for slot in buf.iter_mut() {
                *slot = *self.to_read.get(self.read_pos).ok_or(())?;
                self.read_pos += 1;
            }
            Ok(())
        }
    }

    struct MockPin {
        high: bool,
    }

    impl InputPin for MockPin {
        type Error = u8;

        fn is_high(&mut self) -> Result<bool, u8> {
            Ok(self.high)
        }
    }

    struct BrokenPin;

    impl InputPin for BrokenPin {
        type Error = u8;

        fn is_high(&mut self) -> Result<bool, u8> {
            Err(7)
        }
    }

    #[test]
    fn test_opcode_then_payload() {
        let mut transport = SpiTransport::new(MockSpi::new(&[]), MockPin { high: false });
        transport.write_byte(240).unwrap();
        transport.write_bytes(&[8, 0]).unwrap();

        let (spi, _) = transport.release();
        assert_eq!(&spi.written[..spi.written_len], &[240, 8, 0]);
        // Payload goes out as one transaction
        assert_eq!(spi.write_calls, 2);
    }

    #[test]
    fn test_empty_payload_skips_transaction() {
        let mut transport = SpiTransport::new(MockSpi::new(&[]), MockPin { high: false });
        transport.write_bytes(&[]).unwrap();
        let (spi, _) = transport.release();
        assert_eq!(spi.write_calls, 0);
    }

    #[test]
    fn test_read_bytes_in_order() {
        let mut transport = SpiTransport::new(MockSpi::new(&[3, 24, 15]), MockPin { high: true });
        assert_eq!(transport.read_byte(), Ok(3));
        assert_eq!(transport.read_byte(), Ok(24));
        assert_eq!(transport.read_byte(), Ok(15));
        assert_eq!(transport.read_byte(), Err(BusError::Spi(())));
    }

    #[test]
    fn test_ready_line() {
        let mut transport = SpiTransport::new(MockSpi::new(&[]), MockPin { high: true });
        assert_eq!(transport.is_peer_data_ready(), Ok(true));

        let mut broken = SpiTransport::new(MockSpi::new(&[]), BrokenPin);
        assert_eq!(broken.is_peer_data_ready(), Err(BusError::ReadyLine(7)));
    }
}
