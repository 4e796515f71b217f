//! Time source abstraction
//!
//! Step timing and UI rate limiting both need a monotonic clock. Busy-wait
//! delays are not part of this trait; use `embedded_hal::delay::DelayNs`.

/// Monotonic time source
///
/// Implementations must never go backwards. The microsecond counter is
/// 64 bits wide so callers can subtract timestamps without wrap handling.
pub trait Clock {
    /// Microseconds since an arbitrary fixed epoch (usually boot)
    fn now_us(&self) -> u64;

    /// Milliseconds since the same epoch
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}
