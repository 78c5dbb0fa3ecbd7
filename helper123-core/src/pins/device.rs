//! The microcontroller as seen from the host

use super::pin::{Pin, PinMode, ReadyState};

/// Number of pin slots tracked per device
pub const NUM_PINS: usize = 70;

/// Pins usable for digital reads (indices `0..NUM_DIGITAL_PINS`)
pub const NUM_DIGITAL_PINS: usize = 50;

/// Pin model errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Index outside the device's pin slots
    InvalidPin { pin: u8 },
}

/// Host-side mirror of the microcontroller
///
/// Created when the peer reports that it has started. Each slot is its own
/// `Pin` value; updating one index never touches another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pins: [Pin; NUM_PINS],
}

impl Default for Device {
    fn default() -> Self {
        Self::new()
    }
}

impl Device {
    /// Create a device with every pin unconfigured
    pub const fn new() -> Self {
        Self {
            pins: [Pin::new(); NUM_PINS],
        }
    }

    /// Record a pin's configured mode
    pub fn initialize_pin(&mut self, index: u8, mode: PinMode) -> Result<(), PinError> {
        self.pin_mut(index)?.set_mode(mode);
        Ok(())
    }

    /// Mark a pin as awaiting a fresh reading
    pub fn mark_not_ready(&mut self, index: u8) -> Result<(), PinError> {
        self.pin_mut(index)?.mark_not_ready();
        Ok(())
    }

    /// Store a reading for a pin and mark it ready
    pub fn set_data(&mut self, index: u8, value: u8) -> Result<(), PinError> {
        self.pin_mut(index)?.set_data(value);
        Ok(())
    }

    /// Get a pin's ready state
    pub fn ready_state(&self, index: u8) -> Result<ReadyState, PinError> {
        self.get(index).map(Pin::ready_state)
    }

    /// Get a pin's cached value (only while ready)
    pub fn data(&self, index: u8) -> Result<Option<u8>, PinError> {
        self.get(index).map(Pin::value)
    }

    /// Get a pin by index
    pub fn pin(&self, index: u8) -> Option<&Pin> {
        self.pins.get(usize::from(index))
    }

    /// All pin slots, by index
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    fn get(&self, index: u8) -> Result<&Pin, PinError> {
        self.pin(index).ok_or(PinError::InvalidPin { pin: index })
    }

    fn pin_mut(&mut self, index: u8) -> Result<&mut Pin, PinError> {
        self.pins
            .get_mut(usize::from(index))
            .ok_or(PinError::InvalidPin { pin: index })
    }
}
