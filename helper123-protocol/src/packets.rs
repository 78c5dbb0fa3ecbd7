//! Packet types for the helper123 protocol
//!
//! Packets are divided into two categories:
//! - Host → Peer: resets, data requests, pin configuration, reads, LED control
//! - Peer → Host: startup notice, pin data, acknowledgements, errors

use heapless::Vec;

use crate::catalog::{ErrorCode, Opcode};

/// Largest payload the host ever sends
pub const MAX_HOST_PAYLOAD: usize = 2;

/// Largest packet the peer ever sends
pub const MAX_PEER_PACKET: usize = 3;

/// Packets from the host to the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostPacket {
    /// Reboot the peer
    Reset,
    /// Clock out queued peer bytes
    Request,
    /// Round-trip probe
    Ping,
    /// Indicator LED on
    LedHigh,
    /// Indicator LED off
    LedLow,
    /// Configure a pin
    PinInit { pin: u8, mode: u8 },
    /// Sample a digital pin
    DigitalRead { pin: u8 },
}

impl HostPacket {
    /// Opcode that leads this packet on the wire
    pub fn opcode(&self) -> Opcode {
        match self {
            HostPacket::Reset => Opcode::Reset,
            HostPacket::Request => Opcode::Request,
            HostPacket::Ping => Opcode::Ping,
            HostPacket::LedHigh => Opcode::LedHigh,
            HostPacket::LedLow => Opcode::LedLow,
            HostPacket::PinInit { .. } => Opcode::PinInit,
            HostPacket::DigitalRead { .. } => Opcode::DigitalRead,
        }
    }

    /// Bytes following the opcode
    pub fn payload(&self) -> Vec<u8, MAX_HOST_PAYLOAD> {
        let mut payload = Vec::new();
        let fits = match *self {
            HostPacket::PinInit { pin, mode } => payload.extend_from_slice(&[pin, mode]),
            HostPacket::DigitalRead { pin } => payload.extend_from_slice(&[pin]),
            HostPacket::Reset
            | HostPacket::Request
            | HostPacket::Ping
            | HostPacket::LedHigh
            | HostPacket::LedLow => Ok(()),
        };
        debug_assert!(fits.is_ok(), "host payload exceeds MAX_HOST_PAYLOAD");
        payload
    }

    /// Parse a complete host packet (for simulation or testing)
    ///
    /// Returns `None` for unknown opcodes, peer-only opcodes or a wrong length.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&op, payload) = bytes.split_first()?;
        let packet = match (Opcode::from_byte(op)?, payload) {
            (Opcode::Reset, []) => HostPacket::Reset,
            (Opcode::Request, []) => HostPacket::Request,
            (Opcode::Ping, []) => HostPacket::Ping,
            (Opcode::LedHigh, []) => HostPacket::LedHigh,
            (Opcode::LedLow, []) => HostPacket::LedLow,
            (Opcode::PinInit, &[pin, mode]) => HostPacket::PinInit { pin, mode },
            (Opcode::DigitalRead, &[pin]) => HostPacket::DigitalRead { pin },
            _ => return None,
        };
        Some(packet)
    }
}

/// Error reports from the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeerError {
    /// The peer did not recognize the last packet
    InvalidPacket,
    /// The peer refused a pin
    InvalidPin { pin: u8 },
}

impl PeerError {
    /// Error code byte for this report
    pub fn code(&self) -> ErrorCode {
        match self {
            PeerError::InvalidPacket => ErrorCode::InvalidPacket,
            PeerError::InvalidPin { .. } => ErrorCode::InvalidPin,
        }
    }
}

/// Decoded packets from the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeerPacket {
    /// Digital pin reading
    DigitalData { pin: u8, value: u8 },
    /// Ping echo
    Ping,
    /// Pin configuration accepted
    PinAck,
    /// Peer finished booting
    Startup,
    /// Error report
    Error(PeerError),
}

impl PeerPacket {
    /// Opcode that leads this packet on the wire
    pub fn opcode(&self) -> Opcode {
        match self {
            PeerPacket::DigitalData { .. } => Opcode::DigitalData,
            PeerPacket::Ping => Opcode::Ping,
            PeerPacket::PinAck => Opcode::PinAck,
            PeerPacket::Startup => Opcode::Startup,
            PeerPacket::Error(_) => Opcode::Error,
        }
    }

    /// Encode this packet (for simulation or testing)
    pub fn to_bytes(&self) -> Vec<u8, MAX_PEER_PACKET> {
        let op = self.opcode().to_byte();
        let mut bytes = Vec::new();
        let fits = match *self {
            PeerPacket::DigitalData { pin, value } => bytes.extend_from_slice(&[op, pin, value]),
            PeerPacket::Error(error @ PeerError::InvalidPin { pin }) => {
                bytes.extend_from_slice(&[op, error.code().to_byte(), pin])
            }
            PeerPacket::Error(error) => bytes.extend_from_slice(&[op, error.code().to_byte()]),
            PeerPacket::Ping | PeerPacket::PinAck | PeerPacket::Startup => {
                bytes.extend_from_slice(&[op])
            }
        };
        debug_assert!(fits.is_ok(), "peer packet exceeds MAX_PEER_PACKET");
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_packet_pin_init() {
        let packet = HostPacket::PinInit { pin: 8, mode: 0 };
        assert_eq!(packet.opcode().to_byte(), 240);
        assert_eq!(&packet.payload()[..], &[8, 0]);
        assert_eq!(packet.payload().len() + 1, packet.opcode().min_length());
    }

    #[test]
    fn test_host_packet_digital_read() {
        let packet = HostPacket::DigitalRead { pin: 8 };
        assert_eq!(packet.opcode().to_byte(), 16);
        assert_eq!(&packet.payload()[..], &[8]);
    }

    #[test]
    fn test_fixed_size_packets_have_no_payload() {
        for packet in [
            HostPacket::Reset,
            HostPacket::Request,
            HostPacket::Ping,
            HostPacket::LedHigh,
            HostPacket::LedLow,
        ] {
            assert!(packet.payload().is_empty());
            assert_eq!(packet.opcode().min_length(), 1);
        }
    }

    #[test]
    fn test_encoded_lengths_match_opcode() {
        let host = [
            HostPacket::Reset,
            HostPacket::Request,
            HostPacket::Ping,
            HostPacket::LedHigh,
            HostPacket::LedLow,
            HostPacket::PinInit { pin: 49, mode: 0 },
            HostPacket::DigitalRead { pin: 49 },
        ];
        for packet in host {
            assert_eq!(packet.payload().len() + 1, packet.opcode().min_length());
        }

        let peer = [
            PeerPacket::DigitalData { pin: 1, value: 1 },
            PeerPacket::Ping,
            PeerPacket::PinAck,
            PeerPacket::Startup,
        ];
        for packet in peer {
            assert_eq!(packet.to_bytes().len(), packet.opcode().min_length());
        }
    }

    #[test]
    fn test_host_packet_from_bytes() {
        assert_eq!(HostPacket::from_bytes(&[192]), Some(HostPacket::Reset));
        assert_eq!(
            HostPacket::from_bytes(&[240, 3, 0]),
            Some(HostPacket::PinInit { pin: 3, mode: 0 })
        );
        assert_eq!(HostPacket::from_bytes(&[240, 3]), None);
        assert_eq!(HostPacket::from_bytes(&[193]), None); // Startup is peer-only
        assert_eq!(HostPacket::from_bytes(&[]), None);
    }

    #[test]
    fn test_peer_packet_bytes() {
        let data = PeerPacket::DigitalData { pin: 5, value: 42 };
        assert_eq!(&data.to_bytes()[..], &[239, 5, 42]);

        let invalid_pin = PeerPacket::Error(PeerError::InvalidPin { pin: 60 });
        assert_eq!(&invalid_pin.to_bytes()[..], &[255, 1, 60]);

        let invalid_packet = PeerPacket::Error(PeerError::InvalidPacket);
        assert_eq!(&invalid_packet.to_bytes()[..], &[255, 2]);

        assert_eq!(&PeerPacket::Startup.to_bytes()[..], &[193]);
    }

    #[test]
    fn test_error_packet_length_matches_code() {
        for error in [PeerError::InvalidPacket, PeerError::InvalidPin { pin: 1 }] {
            let bytes = PeerPacket::Error(error).to_bytes();
            assert_eq!(bytes.len(), error.code().packet_length());
        }
    }
}
