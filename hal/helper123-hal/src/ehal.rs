//! embedded-hal 1.0 adapters
//!
//! Wrap any `embedded_hal::spi::SpiDevice` and `embedded_hal::digital::InputPin`
//! so they can back a [`SpiTransport`](crate::SpiTransport). Linux hosts get
//! these from their spidev/GPIO character-device HAL.

use embedded_hal::digital::{ErrorType as PinErrorType, InputPin as EhInputPin};
use embedded_hal::spi::{ErrorType as SpiErrorType, SpiDevice};

use crate::gpio::InputPin;
use crate::spi::SpiBus;

/// Adapter from an embedded-hal SPI device
pub struct EhalSpi<T>(pub T);

impl<T: SpiDevice> SpiBus for EhalSpi<T> {
    type Error = <T as SpiErrorType>::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        SpiDevice::write(&mut self.0, data)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        SpiDevice::read(&mut self.0, buf)
    }
}

/// Adapter from an embedded-hal input pin
pub struct EhalInput<T>(pub T);

impl<T: EhInputPin> InputPin for EhalInput<T> {
    type Error = <T as PinErrorType>::Error;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        EhInputPin::is_high(&mut self.0)
    }
}
