//! helper123 Packet Protocol
//!
//! This crate defines the byte protocol spoken over the half-duplex bus
//! between the host (a single-board computer) and the robot's
//! microcontroller. Packets are tiny and opcode-tagged; there is no length
//! prefix, checksum or sync byte on the packets themselves.
//!
//! # Protocol Overview
//!
//! Every packet starts with a one-byte opcode. The opcode alone determines
//! how many payload bytes follow:
//! ```text
//! ┌────────┬───────────────────────┐
//! │ OPCODE │ PAYLOAD               │
//! │ 1B     │ 0–2B (opcode-defined) │
//! └────────┴───────────────────────┘
//! ```
//!
//! Peer-to-host bytes are fetched in bursts: the peer raises a data-ready
//! line, the host answers with a `Request` opcode, and the peer clocks out a
//! length byte followed by that many packet bytes. The [`PacketAssembler`]
//! turns those bytes back into [`PeerPacket`]s one byte at a time.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod assembler;
pub mod catalog;
pub mod packets;

pub use assembler::{AssemblyError, PacketAssembler};
pub use catalog::{Direction, ErrorCode, Opcode, MODE_DIGITAL_READ};
pub use packets::{HostPacket, PeerError, PeerPacket, MAX_HOST_PAYLOAD, MAX_PEER_PACKET};
