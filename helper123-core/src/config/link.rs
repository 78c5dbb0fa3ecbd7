//! Link timing configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default wait before resetting the peer, after the bus is opened
pub const DEFAULT_BUS_SETTLE_MS: u32 = 300;

/// Default wait for the peer to boot after a reset
pub const DEFAULT_BOOT_SETTLE_MS: u32 = 1500;

/// Default ping timeout
pub const DEFAULT_PING_TIMEOUT_MS: u32 = 1000;

/// Default wait for a pin-initialization acknowledgement
pub const DEFAULT_PIN_INIT_TIMEOUT_MS: u32 = 1000;

/// Default wait for a digital reading
pub const DEFAULT_READ_TIMEOUT_MS: u32 = 1000;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// TOML parsing failed
    TomlParse,
    /// A field has a value the link cannot run with
    InvalidValue { field: &'static str },
}

/// Link engine timing
///
/// Every blocking exchange has a deadline; none of them wait forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    /// Delay between opening the bus and sending Reset (ms)
    pub bus_settle_ms: u32,
    /// Delay after Reset for the peer to boot (ms)
    pub boot_settle_ms: u32,
    /// Ping round-trip timeout (ms)
    pub ping_timeout_ms: u32,
    /// Pin-initialization handshake timeout (ms)
    pub pin_init_timeout_ms: u32,
    /// Digital read timeout (ms)
    pub read_timeout_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            bus_settle_ms: DEFAULT_BUS_SETTLE_MS,
            boot_settle_ms: DEFAULT_BOOT_SETTLE_MS,
            ping_timeout_ms: DEFAULT_PING_TIMEOUT_MS,
            pin_init_timeout_ms: DEFAULT_PIN_INIT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

impl LinkConfig {
    /// Check that every timeout is non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timeouts = [
            ("ping_timeout_ms", self.ping_timeout_ms),
            ("pin_init_timeout_ms", self.pin_init_timeout_ms),
            ("read_timeout_ms", self.read_timeout_ms),
        ];
        for (field, value) in timeouts {
            if value == 0 {
                return Err(ConfigError::InvalidValue { field });
            }
        }
        Ok(())
    }

    /// Parse and validate a configuration from TOML
    ///
    /// Missing keys take their default values.
    ///
    /// ```toml
    /// ping_timeout_ms = 500
    /// read_timeout_ms = 250
    /// ```
    #[cfg(feature = "toml")]
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: LinkConfig = toml::from_str(input).map_err(|_| {
            warn!("Failed to parse link config TOML");
            ConfigError::TomlParse
        })?;
        config.validate()?;

        debug!(
            "Link config: ping {}ms, pin init {}ms, read {}ms",
            config.ping_timeout_ms,
            config.pin_init_timeout_ms,
            config.read_timeout_ms
        );
        Ok(config)
    }
}
