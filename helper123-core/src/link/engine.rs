//! Link engine state machine
//!
//! # Inbound path
//!
//! The peer raises its data-ready line while it has bytes queued. Each
//! [`Link::tick`] samples the line; if it is asserted the host sends
//! `Request`, waits for the line to drop, then reads a length byte and that
//! many bytes into the pending queue. The queue is then drained one byte at
//! a time through the [`PacketAssembler`] and each completed packet is
//! applied to the device model or the handshake flags.
//!
//! # Outbound path
//!
//! The bus is half-duplex, so every operation drains inbound data before it
//! writes (see [`Link::safe_send_packet`]). Only `connect()` writes without
//! draining, because it reboots the peer.
//!
//! # Waiting
//!
//! Ping, pin initialization and digital reads busy-poll `tick()` until their
//! answer arrives or their configured deadline passes. Only one exchange of
//! each kind is ever outstanding.

use core::time::Duration;

use heapless::Deque;
use helper123_hal::{Clock, Transport};
use helper123_protocol::{
    AssemblyError, HostPacket, PacketAssembler, PeerError, PeerPacket, MODE_DIGITAL_READ,
};

use super::error::{LinkError, Operation};
use crate::config::{ConfigError, LinkConfig};
use crate::pins::{Device, Pin, PinMode, NUM_DIGITAL_PINS};

/// Inbound bytes that can wait between ticks
pub const PENDING_CAPACITY: usize = 512;

/// Outcome of the most recent pin-initialization handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinInitResult {
    /// No answer yet
    #[default]
    Pending,
    /// Peer acknowledged the pin
    Accepted,
    /// Peer reported an invalid pin
    Rejected,
}

/// Host side of the link to one microcontroller
pub struct Link<T, C> {
    transport: T,
    clock: C,
    config: LinkConfig,
    connected: bool,
    assembler: PacketAssembler,
    pending: Deque<u8, PENDING_CAPACITY>,
    ping_awaiting_response: bool,
    pin_init: PinInitResult,
    device: Option<Device>,
    restarts: u32,
}

impl<T: Transport, C: Clock> Link<T, C> {
    /// Create a new link
    ///
    /// The configuration is validated first. Nothing is sent until
    /// [`connect`](Self::connect) is called.
    pub fn new(transport: T, clock: C, config: LinkConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            transport,
            clock,
            config,
            connected: false,
            assembler: PacketAssembler::new(),
            pending: Deque::new(),
            ping_awaiting_response: false,
            pin_init: PinInitResult::Pending,
            device: None,
            restarts: 0,
        })
    }

    /// Reset the peer and wait for it to boot
    ///
    /// Any local device state is dropped; the peer announces itself again
    /// with a Startup packet that the next `tick()` picks up.
    pub fn connect(&mut self) -> Result<(), LinkError<T::Error>> {
        self.connected = false;
        self.device = None;
        self.assembler.reset();
        self.pending.clear();
        self.ping_awaiting_response = false;
        self.pin_init = PinInitResult::Pending;

        self.clock.delay_ms(self.config.bus_settle_ms);
        self.send_packet(&HostPacket::Reset)?;
        self.clock.delay_ms(self.config.boot_settle_ms);

        self.connected = true;
        info!("Link connected, peer reset");
        Ok(())
    }

    /// Process all available inbound data once
    ///
    /// Returns `PeerRestarted` if the peer announced a second startup; the
    /// device model has already been replaced when that happens, and bytes
    /// after the Startup stay queued for the next call.
    pub fn tick(&mut self) -> Result<(), LinkError<T::Error>> {
        self.ensure_connected()?;

        if self.transport.is_peer_data_ready().map_err(LinkError::Transport)? {
            self.request_data()?;
        }

        self.process_pending()
    }

    /// Write a packet without draining inbound data first
    pub fn send_packet(&mut self, packet: &HostPacket) -> Result<(), LinkError<T::Error>> {
        trace!("TX: {:?}", packet);
        self.transport
            .write_byte(packet.opcode().to_byte())
            .map_err(LinkError::Transport)?;

        let payload = packet.payload();
        if !payload.is_empty() {
            self.transport
                .write_bytes(&payload)
                .map_err(LinkError::Transport)?;
        }
        Ok(())
    }

    /// Drain inbound data, then write a packet
    pub fn safe_send_packet(&mut self, packet: &HostPacket) -> Result<(), LinkError<T::Error>> {
        self.tick()?;
        self.send_packet(packet)
    }

    /// Measure the round-trip time to the peer
    pub fn ping(&mut self) -> Result<Duration, LinkError<T::Error>> {
        self.ensure_connected()?;

        let start = self.clock.now_us();
        // Drain before arming so an old echo cannot complete this ping
        self.tick()?;
        self.ping_awaiting_response = true;
        self.send_packet(&HostPacket::Ping)?;

        self.wait_until(start, self.config.ping_timeout_ms, Operation::Ping, |link| {
            !link.ping_awaiting_response
        })?;

        let elapsed = self.clock.now_us().saturating_sub(start);
        debug!("Ping: {}us", elapsed);
        Ok(Duration::from_micros(elapsed))
    }

    /// Turn the indicator LED on
    pub fn led_on(&mut self) -> Result<(), LinkError<T::Error>> {
        self.safe_send_packet(&HostPacket::LedHigh)
    }

    /// Turn the indicator LED off
    pub fn led_off(&mut self) -> Result<(), LinkError<T::Error>> {
        self.safe_send_packet(&HostPacket::LedLow)
    }

    /// Configure a pin as a digital input on the peer
    ///
    /// Fails with `InvalidPin` before touching the bus if `pin` is not a
    /// digital pin, and with `PinRejected` if the peer refuses it.
    pub fn init_digital_read_pin(&mut self, pin: u8) -> Result<(), LinkError<T::Error>> {
        Self::check_digital_pin(pin)?;

        let start = self.clock.now_us();
        // Drain before arming so a late answer to an earlier init is not taken
        // as the answer to this one
        self.tick()?;
        self.pin_init = PinInitResult::Pending;
        self.send_packet(&HostPacket::PinInit {
            pin,
            mode: MODE_DIGITAL_READ,
        })?;

        self.wait_until(
            start,
            self.config.pin_init_timeout_ms,
            Operation::PinInit,
            |link| link.pin_init != PinInitResult::Pending,
        )?;

        if self.pin_init == PinInitResult::Rejected {
            return Err(LinkError::PinRejected { pin });
        }

        let device = self.device.as_mut().ok_or(LinkError::NoDevice)?;
        device.initialize_pin(pin, PinMode::DigitalRead)?;
        debug!("Pin {} configured for digital read", pin);
        Ok(())
    }

    /// Read a digital pin from the peer
    ///
    /// Fails with `InvalidPin` before touching the bus if `pin` is not a
    /// digital pin.
    pub fn digital_read(&mut self, pin: u8) -> Result<u8, LinkError<T::Error>> {
        Self::check_digital_pin(pin)?;

        let start = self.clock.now_us();
        // Drain first so a stale reading cannot satisfy this request
        self.tick()?;
        self.device
            .as_mut()
            .ok_or(LinkError::NoDevice)?
            .mark_not_ready(pin)?;
        self.send_packet(&HostPacket::DigitalRead { pin })?;

        self.wait_until(
            start,
            self.config.read_timeout_ms,
            Operation::DigitalRead,
            |link| link.cached_pin(pin).is_some_and(Pin::is_ready),
        )?;

        self.cached_pin(pin)
            .and_then(Pin::value)
            .ok_or(LinkError::NoDevice)
    }

    /// Local device model, once the peer has started
    pub fn device(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    /// Outcome of the last pin-initialization handshake
    pub fn pin_init_result(&self) -> PinInitResult {
        self.pin_init
    }

    /// Returns true while a ping echo is outstanding
    pub fn is_ping_pending(&self) -> bool {
        self.ping_awaiting_response
    }

    /// Returns true once `connect()` has completed
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Bytes of the inbound packet currently being assembled
    pub fn buffered_len(&self) -> usize {
        self.assembler.len()
    }

    /// Inbound bytes read from the bus but not yet assembled
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of peer restarts seen since the link was created
    pub fn restart_count(&self) -> u32 {
        self.restarts
    }

    /// Get the configuration
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Consume the link and return the transport and clock
    pub fn release(self) -> (T, C) {
        (self.transport, self.clock)
    }

    fn ensure_connected(&self) -> Result<(), LinkError<T::Error>> {
        if !self.connected {
            warn!("Link not connected");
            return Err(LinkError::NotConnected);
        }
        Ok(())
    }

    fn check_digital_pin(pin: u8) -> Result<(), LinkError<T::Error>> {
        if usize::from(pin) >= NUM_DIGITAL_PINS {
            warn!("Invalid digital pin {}", pin);
            return Err(LinkError::InvalidPin { pin });
        }
        Ok(())
    }

    fn cached_pin(&self, pin: u8) -> Option<&Pin> {
        self.device.as_ref().and_then(|device| device.pin(pin))
    }

    /// Busy-poll `tick()` until `done` holds or `timeout_ms` has passed since `start_us`
    fn wait_until(
        &mut self,
        start_us: u64,
        timeout_ms: u32,
        operation: Operation,
        done: impl Fn(&Self) -> bool,
    ) -> Result<(), LinkError<T::Error>> {
        let limit_us = u64::from(timeout_ms) * 1_000;
        loop {
            if done(&*self) {
                return Ok(());
            }
            if self.clock.now_us().saturating_sub(start_us) >= limit_us {
                warn!("{:?} timed out after {}ms", operation, timeout_ms);
                return Err(LinkError::Timeout(operation));
            }
            self.tick()?;
        }
    }

    /// Fetch the peer's queued bytes into the pending queue
    fn request_data(&mut self) -> Result<(), LinkError<T::Error>> {
        self.send_packet(&HostPacket::Request)?;

        // The peer drops the line once the transfer is staged
        while self.transport.is_peer_data_ready().map_err(LinkError::Transport)? {
            core::hint::spin_loop();
        }

        let size = self.transport.read_byte().map_err(LinkError::Transport)?;
        debug!("RX: {} bytes", size);

        for _ in 0..size {
            let byte = self.transport.read_byte().map_err(LinkError::Transport)?;
            if self.pending.push_back(byte).is_err() {
                warn!("Inbound queue full, dropping byte {}", byte);
            }
        }
        Ok(())
    }

    fn process_pending(&mut self) -> Result<(), LinkError<T::Error>> {
        while let Some(byte) = self.pending.pop_front() {
            match self.assembler.feed(byte) {
                Ok(Some(packet)) => self.dispatch(packet)?,
                Ok(None) => {
                    // Need more bytes
                }
                Err(e) => report_assembly_error(e),
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, packet: PeerPacket) -> Result<(), LinkError<T::Error>> {
        trace!("RX: {:?}", packet);
        match packet {
            PeerPacket::DigitalData { pin, value } => match self.device.as_mut() {
                Some(device) => {
                    if device.set_data(pin, value).is_err() {
                        warn!("Digital data for invalid pin {}", pin);
                    }
                }
                None => warn!("Digital data for pin {} before peer startup", pin),
            },
            PeerPacket::Ping => self.ping_awaiting_response = false,
            PeerPacket::PinAck => self.pin_init = PinInitResult::Accepted,
            PeerPacket::Startup => return self.handle_startup(),
            PeerPacket::Error(PeerError::InvalidPacket) => {
                warn!("Peer did not recognize packet");
            }
            PeerPacket::Error(PeerError::InvalidPin { pin }) => {
                warn!("Peer reported invalid pin {}", pin);
                self.pin_init = PinInitResult::Rejected;
            }
        }
        Ok(())
    }

    fn handle_startup(&mut self) -> Result<(), LinkError<T::Error>> {
        if self.device.replace(Device::new()).is_some() {
            self.restarts = self.restarts.saturating_add(1);
            warn!("Peer restarted ({}), device state reset", self.restarts);
            return Err(LinkError::PeerRestarted);
        }
        info!("Peer started");
        Ok(())
    }
}

fn report_assembly_error(e: AssemblyError) {
    match e {
        AssemblyError::UnrecognizedOpcode(op) => {
            warn!("Unrecognized op code {}, packet discarded", op);
        }
        AssemblyError::UnrecognizedError { code } => {
            warn!("Unrecognized error message (code {})", code);
        }
        AssemblyError::Overflow => {
            warn!("Inbound packet too long, discarded");
        }
    }
}
