//! Opcode and error code catalog
//!
//! Wire values are fixed by the microcontroller firmware and must not change.

/// Mode byte sent in a PinInit packet to configure a digital input
pub const MODE_DIGITAL_READ: u8 = 0;

// Opcode wire values
pub const OP_DIGITAL_DATA: u8 = 0b1110_1111;
pub const OP_DIGITAL_READ: u8 = 0b0001_0000;
pub const OP_ERROR: u8 = 0b1111_1111;
pub const OP_LED_HIGH: u8 = 0b0101_0101;
pub const OP_LED_LOW: u8 = 0b1010_1010;
pub const OP_PIN_INIT: u8 = 0b1111_0000;
pub const OP_PIN_ACK: u8 = 0b0000_1111;
pub const OP_PING: u8 = 0b0001_1000;
pub const OP_RESET: u8 = 0b1100_0000;
pub const OP_STARTUP: u8 = 0b1100_0001;
pub const OP_REQUEST: u8 = 0b0001_0111;

// Error code wire values
pub const ERR_INVALID_PIN: u8 = 0b0000_0001;
pub const ERR_INVALID_PACKET: u8 = 0b0000_0010;

/// Packet kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Opcode {
    /// Digital pin reading (peer → host)
    DigitalData,
    /// Request a digital pin reading (host → peer)
    DigitalRead,
    /// Error report (peer → host)
    Error,
    /// Indicator LED on
    LedHigh,
    /// Indicator LED off
    LedLow,
    /// Configure a pin mode (host → peer)
    PinInit,
    /// Pin configuration accepted (peer → host)
    PinAck,
    /// Round-trip probe, echoed by the peer
    Ping,
    /// Reboot the peer (host → peer)
    Reset,
    /// Peer finished booting (peer → host)
    Startup,
    /// Ask the peer to clock out its queued bytes (host → peer)
    Request,
}

/// Which side of the link sends a packet kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Host to microcontroller
    ToPeer,
    /// Microcontroller to host
    ToHost,
    /// Sent by the host and echoed back by the peer
    Both,
}

impl Opcode {
    /// All opcodes, in wire-table order
    pub const ALL: [Opcode; 11] = [
        Opcode::DigitalData,
        Opcode::DigitalRead,
        Opcode::Error,
        Opcode::LedHigh,
        Opcode::LedLow,
        Opcode::PinInit,
        Opcode::PinAck,
        Opcode::Ping,
        Opcode::Reset,
        Opcode::Startup,
        Opcode::Request,
    ];

    /// Parse an opcode from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            OP_DIGITAL_DATA => Some(Opcode::DigitalData),
            OP_DIGITAL_READ => Some(Opcode::DigitalRead),
            OP_ERROR => Some(Opcode::Error),
            OP_LED_HIGH => Some(Opcode::LedHigh),
            OP_LED_LOW => Some(Opcode::LedLow),
            OP_PIN_INIT => Some(Opcode::PinInit),
            OP_PIN_ACK => Some(Opcode::PinAck),
            OP_PING => Some(Opcode::Ping),
            OP_RESET => Some(Opcode::Reset),
            OP_STARTUP => Some(Opcode::Startup),
            OP_REQUEST => Some(Opcode::Request),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            Opcode::DigitalData => OP_DIGITAL_DATA,
            Opcode::DigitalRead => OP_DIGITAL_READ,
            Opcode::Error => OP_ERROR,
            Opcode::LedHigh => OP_LED_HIGH,
            Opcode::LedLow => OP_LED_LOW,
            Opcode::PinInit => OP_PIN_INIT,
            Opcode::PinAck => OP_PIN_ACK,
            Opcode::Ping => OP_PING,
            Opcode::Reset => OP_RESET,
            Opcode::Startup => OP_STARTUP,
            Opcode::Request => OP_REQUEST,
        }
    }

    /// Minimum total packet length (opcode included) before dispatch
    ///
    /// Error packets are code-dependent; this is the shortest form
    /// (see [`ErrorCode::packet_length`]).
    pub fn min_length(self) -> usize {
        match self {
            Opcode::Reset
            | Opcode::Request
            | Opcode::Ping
            | Opcode::PinAck
            | Opcode::Startup
            | Opcode::LedHigh
            | Opcode::LedLow => 1,
            Opcode::DigitalRead | Opcode::Error => 2,
            Opcode::DigitalData | Opcode::PinInit => 3,
        }
    }

    /// Which side sends this packet kind
    pub fn direction(self) -> Direction {
        match self {
            Opcode::DigitalData | Opcode::Error | Opcode::PinAck | Opcode::Startup => {
                Direction::ToHost
            }
            Opcode::Ping => Direction::Both,
            Opcode::DigitalRead
            | Opcode::LedHigh
            | Opcode::LedLow
            | Opcode::PinInit
            | Opcode::Reset
            | Opcode::Request => Direction::ToPeer,
        }
    }

    /// Returns true if the host ever receives this packet kind
    pub fn is_inbound(self) -> bool {
        !matches!(self.direction(), Direction::ToPeer)
    }
}

/// Error codes carried in the second byte of an Error packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// A pin index or pin request was refused; carries the pin
    InvalidPin,
    /// The peer did not recognize a packet from the host
    InvalidPacket,
}

impl ErrorCode {
    /// Parse an error code from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            ERR_INVALID_PIN => Some(ErrorCode::InvalidPin),
            ERR_INVALID_PACKET => Some(ErrorCode::InvalidPacket),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            ErrorCode::InvalidPin => ERR_INVALID_PIN,
            ErrorCode::InvalidPacket => ERR_INVALID_PACKET,
        }
    }

    /// Total length of an Error packet carrying this code
    pub fn packet_length(self) -> usize {
        match self {
            ErrorCode::InvalidPacket => 2,
            ErrorCode::InvalidPin => 3,
        }
    }
}
