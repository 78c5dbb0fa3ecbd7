//! Simulated peer for link tests
//!
//! Behaves like the microcontroller firmware: it parses host packets as they
//! are written, queues its answers, raises the data-ready line while it has
//! bytes queued and clocks them out (length byte first) after a Request.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use helper123_hal::{Clock, Transport};
use helper123_protocol::{HostPacket, PeerError, PeerPacket};

use super::Link;
use crate::config::LinkConfig;
use crate::pins::{NUM_DIGITAL_PINS, NUM_PINS};

/// Errors from the simulated bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// Host read with no transfer staged
    NothingToRead,
}

/// Peer behaviour and bus log
pub struct PeerState {
    /// Every byte the host wrote, in order
    pub written: Vec<u8>,
    /// Number of transport calls made by the host
    pub calls: usize,
    /// Answer Reset with Startup
    pub boot_on_reset: bool,
    /// Echo Ping packets
    pub answer_pings: bool,
    /// Answer PinInit with PinAck or an error
    pub answer_pin_init: bool,
    /// Answer DigitalRead with DigitalData
    pub answer_reads: bool,
    /// Digital pins answered with an InvalidPin error
    pub rejected_pins: Vec<u8>,
    /// Indicator state
    pub led: bool,
    /// Level reported for each pin
    pub levels: [u8; NUM_PINS],
    outbox: VecDeque<u8>,
    transfer: VecDeque<u8>,
    incoming: Vec<u8>,
}

impl PeerState {
    fn new() -> Self {
        Self {
            written: Vec::new(),
            calls: 0,
            boot_on_reset: true,
            answer_pings: true,
            answer_pin_init: true,
            answer_reads: true,
            rejected_pins: Vec::new(),
            led: false,
            levels: [0; NUM_PINS],
            outbox: VecDeque::new(),
            transfer: VecDeque::new(),
            incoming: Vec::new(),
        }
    }

    /// Queue a packet for the host
    pub fn send(&mut self, packet: PeerPacket) {
        self.outbox.extend(packet.to_bytes());
    }

    /// Queue raw bytes for the host
    pub fn send_raw(&mut self, bytes: &[u8]) {
        self.outbox.extend(bytes.iter().copied());
    }

    /// Bytes written since the log was last cleared
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.written)
    }

    fn receive(&mut self, byte: u8) {
        self.written.push(byte);
        self.incoming.push(byte);
        if let Some(packet) = HostPacket::from_bytes(&self.incoming) {
            self.incoming.clear();
            self.handle(packet);
        } else if self.incoming.len() >= 3 {
            // Garbage from the host; the firmware would report it
            self.incoming.clear();
            self.send(PeerPacket::Error(PeerError::InvalidPacket));
        }
    }

    fn handle(&mut self, packet: HostPacket) {
        match packet {
            HostPacket::Reset => {
                self.outbox.clear();
                self.transfer.clear();
                self.led = false;
                if self.boot_on_reset {
                    self.send(PeerPacket::Startup);
                }
            }
            HostPacket::Request => {
                let size = self.outbox.len().min(usize::from(u8::MAX));
                self.transfer.push_back(size as u8);
                self.transfer.extend(self.outbox.drain(..size));
            }
            HostPacket::Ping => {
                if self.answer_pings {
                    self.send(PeerPacket::Ping);
                }
            }
            HostPacket::LedHigh => self.led = true,
            HostPacket::LedLow => self.led = false,
            HostPacket::PinInit { pin, .. } => {
                if !self.answer_pin_init {
                    return;
                }
                if usize::from(pin) < NUM_DIGITAL_PINS && !self.rejected_pins.contains(&pin) {
                    self.send(PeerPacket::PinAck);
                } else {
                    self.send(PeerPacket::Error(PeerError::InvalidPin { pin }));
                }
            }
            HostPacket::DigitalRead { pin } => {
                if self.answer_reads {
                    let value = self.levels[usize::from(pin)];
                    self.send(PeerPacket::DigitalData { pin, value });
                }
            }
        }
    }
}

/// Transport half of the simulated peer
pub struct SimPeer {
    state: Rc<RefCell<PeerState>>,
}

impl Transport for SimPeer {
    type Error = SimError;

    fn write_byte(&mut self, byte: u8) -> Result<(), SimError> {
        let mut state = self.state.borrow_mut();
        state.calls += 1;
        state.receive(byte);
        Ok(())
    }

    fn is_peer_data_ready(&mut self) -> Result<bool, SimError> {
        let mut state = self.state.borrow_mut();
        state.calls += 1;
        Ok(state.transfer.is_empty() && !state.outbox.is_empty())
    }

    fn read_byte(&mut self) -> Result<u8, SimError> {
        let mut state = self.state.borrow_mut();
        state.calls += 1;
        state.transfer.pop_front().ok_or(SimError::NothingToRead)
    }
}

/// Clock that advances a fixed step on every reading
pub struct SimClock {
    now_us: Rc<Cell<u64>>,
    step_us: u64,
}

impl Clock for SimClock {
    fn now_us(&mut self) -> u64 {
        let now = self.now_us.get() + self.step_us;
        self.now_us.set(now);
        now
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_us.set(self.now_us.get() + u64::from(ms) * 1_000);
    }
}

/// Handles kept by a test after the link takes ownership of the simulation
pub struct Sim {
    pub peer: Rc<RefCell<PeerState>>,
    pub now_us: Rc<Cell<u64>>,
}

impl Sim {
    /// Current simulated time
    pub fn now_us(&self) -> u64 {
        self.now_us.get()
    }
}

/// Simulated transport and clock, plus the handles a test keeps
pub fn sim_parts() -> (SimPeer, SimClock, Sim) {
    let peer = Rc::new(RefCell::new(PeerState::new()));
    let now_us = Rc::new(Cell::new(0));
    let transport = SimPeer {
        state: Rc::clone(&peer),
    };
    let clock = SimClock {
        now_us: Rc::clone(&now_us),
        step_us: 100,
    };
    (transport, clock, Sim { peer, now_us })
}

/// Link wired to a fresh simulated peer, not yet connected
pub fn sim_link() -> (Link<SimPeer, SimClock>, Sim) {
    let (transport, clock, sim) = sim_parts();
    let link = Link::new(transport, clock, LinkConfig::default()).unwrap();
    (link, sim)
}

/// Link connected to a booted simulated peer, with the startup processed
pub fn connected_link() -> (Link<SimPeer, SimClock>, Sim) {
    let (mut link, sim) = sim_link();
    link.connect().unwrap();
    link.tick().unwrap();
    sim.peer.borrow_mut().take_written();
    (link, sim)
}

/// Process-wide `log` backend that keeps every message for inspection
#[cfg(all(feature = "log", not(feature = "defmt")))]
pub mod captured_log {
    use std::string::{String, ToString};
    use std::sync::Mutex;
    use std::vec::Vec;

    static MESSAGES: Mutex<Vec<String>> = Mutex::new(Vec::new());

    struct Capture;

    impl log::Log for Capture {
        fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            if let Ok(mut messages) = MESSAGES.lock() {
                messages.push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: Capture = Capture;

    /// Install the capture backend (later calls are no-ops)
    pub fn install() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
    }

    /// Returns true if any captured message contains `needle`
    pub fn contains(needle: &str) -> bool {
        MESSAGES
            .lock()
            .map(|messages| messages.iter().any(|m| m.contains(needle)))
            .unwrap_or(false)
    }
}
