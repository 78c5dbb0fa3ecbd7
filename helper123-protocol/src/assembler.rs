//! Inbound packet assembly
//!
//! Peer packets carry no length prefix, so the first buffered byte (the
//! opcode) decides how many more bytes to wait for. Bytes are fed one at a
//! time; the buffer is cleared whenever a packet completes or is discarded.
//!
//! Error packets are a nested sub-protocol: their length depends on the error
//! code in the second byte.
//! - `[ERROR, INVALID_PACKET]` completes at two bytes
//! - `[ERROR, INVALID_PIN, pin]` completes at three bytes
//! - any other code is held until the third byte and then discarded

use heapless::Vec;

use crate::catalog::{ErrorCode, Opcode};
use crate::packets::{PeerError, PeerPacket, MAX_PEER_PACKET};

/// Errors that can occur during packet assembly
///
/// Every error discards the buffered bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssemblyError {
    /// First byte is not an opcode the peer sends
    UnrecognizedOpcode(u8),
    /// Error packet with a code that has no known layout
    UnrecognizedError { code: u8 },
    /// Byte arrived with the buffer already holding a full-length packet
    Overflow,
}

/// Byte-at-a-time assembler for peer packets
///
/// Every packet completes or is discarded by its third byte, so the buffer
/// never holds more than [`MAX_PEER_PACKET`] bytes.
#[derive(Debug, Clone, Default)]
pub struct PacketAssembler {
    buffer: Vec<u8, MAX_PEER_PACKET>,
}

impl PacketAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Discard any partially assembled packet
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Number of bytes of the packet currently being assembled
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no packet is in progress
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Bytes of the packet currently being assembled
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Feed a single byte to the assembler
    ///
    /// Returns `Ok(Some(packet))` when a packet completes, `Ok(None)` when more
    /// bytes are needed, or `Err` when the buffered bytes were discarded.
    pub fn feed(&mut self, byte: u8) -> Result<Option<PeerPacket>, AssemblyError> {
        if self.buffer.push(byte).is_err() {
            self.reset();
            return Err(AssemblyError::Overflow);
        }

        let op = self.buffer[0];
        let result = match Opcode::from_byte(op).filter(|opcode| opcode.is_inbound()) {
            Some(Opcode::Error) => self.feed_error(),
            Some(Opcode::DigitalData) => {
                if self.buffer.len() < Opcode::DigitalData.min_length() {
                    return Ok(None);
                }
                Ok(Some(PeerPacket::DigitalData {
                    pin: self.buffer[1],
                    value: self.buffer[2],
                }))
            }
            Some(Opcode::Ping) => Ok(Some(PeerPacket::Ping)),
            Some(Opcode::PinAck) => Ok(Some(PeerPacket::PinAck)),
            Some(Opcode::Startup) => Ok(Some(PeerPacket::Startup)),
            // Partial bytes of an unknown packet are never recoverable
            _ => Err(AssemblyError::UnrecognizedOpcode(op)),
        };

        if !matches!(result, Ok(None)) {
            self.reset();
        }
        result
    }

    /// Feed multiple bytes to the assembler
    ///
    /// Returns the first complete packet found, if any.
    /// Remaining bytes after a complete packet are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<PeerPacket>, AssemblyError> {
        for &byte in bytes {
            if let Some(packet) = self.feed(byte)? {
                return Ok(Some(packet));
            }
        }
        Ok(None)
    }

    fn feed_error(&self) -> Result<Option<PeerPacket>, AssemblyError> {
        let code = match self.buffer.get(1) {
            Some(&code) => code,
            None => return Ok(None),
        };

        match (self.buffer.len(), ErrorCode::from_byte(code)) {
            (2, Some(ErrorCode::InvalidPacket)) => {
                Ok(Some(PeerPacket::Error(PeerError::InvalidPacket)))
            }
            (2, _) => Ok(None),
            (3, Some(ErrorCode::InvalidPin)) => Ok(Some(PeerPacket::Error(PeerError::InvalidPin {
                pin: self.buffer[2],
            }))),
            _ => Err(AssemblyError::UnrecognizedError { code }),
        }
    }
}
