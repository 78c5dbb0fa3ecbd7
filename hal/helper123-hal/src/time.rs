//! Time source abstraction
//!
//! The link needs a monotonic timestamp for its wait deadlines and ping
//! round-trip measurement, and a blocking delay for the settle intervals
//! around a peer reset.

/// Monotonic clock with blocking delays
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin
    ///
    /// Must never go backwards.
    fn now_us(&mut self) -> u64;

    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// Host clock backed by `std::time::Instant`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Create a clock whose origin is now
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_us(&mut self) -> u64 {
        // u64 microseconds covers ~584k years of uptime
        self.origin.elapsed().as_micros() as u64
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_std_clock_delay_advances_time() {
        let mut clock = StdClock::new();
        let start = clock.now_us();
        clock.delay_ms(5);
        assert!(clock.now_us() - start >= 5_000);
    }
}
