//! A single pin entry

/// Configured pin mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Not yet configured on the peer
    #[default]
    Uninitialized,
    /// Configured as a digital input
    DigitalRead,
}

/// Whether a pin's cached value reflects the latest request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadyState {
    /// A read is outstanding, or nothing has been read yet
    #[default]
    NotReady,
    /// The cached value came from the peer after the last request
    Ready,
}

/// Host-side mirror of one microcontroller pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin {
    mode: PinMode,
    ready: ReadyState,
    value: Option<u8>,
}

impl Pin {
    /// Create an unconfigured pin with no value
    pub const fn new() -> Self {
        Self {
            mode: PinMode::Uninitialized,
            ready: ReadyState::NotReady,
            value: None,
        }
    }

    /// Get the configured mode
    pub fn mode(&self) -> PinMode {
        self.mode
    }

    /// Get the ready state
    pub fn ready_state(&self) -> ReadyState {
        self.ready
    }

    /// Returns true if the cached value is current
    pub fn is_ready(&self) -> bool {
        self.ready == ReadyState::Ready
    }

    /// Cached value, only while ready
    pub fn value(&self) -> Option<u8> {
        if self.is_ready() {
            self.value
        } else {
            None
        }
    }

    /// Cached value of a ready digital input
    ///
    /// Returns `None` unless the pin is configured for digital reads and a
    /// reading has arrived since the last request.
    pub fn read_result(&self) -> Option<u8> {
        if self.mode != PinMode::DigitalRead {
            return None;
        }
        self.value()
    }

    pub(crate) fn set_mode(&mut self, mode: PinMode) {
        self.mode = mode;
    }

    /// Start of a new reading
    pub(crate) fn mark_not_ready(&mut self) {
        self.ready = ReadyState::NotReady;
    }

    /// Store a reading and mark it current
    pub(crate) fn set_data(&mut self, value: u8) {
        self.value = Some(value);
        self.ready = ReadyState::Ready;
    }
}
