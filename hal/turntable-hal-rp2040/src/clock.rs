//! Time source on the embassy time driver

use embassy_time::{Delay, Instant};
use embedded_hal::delay::DelayNs;
use turntable_hal::Clock;

/// Microsecond clock plus busy-wait delay
///
/// Delays spin on the timer; they never yield to the executor, so step
/// pulses keep their width even when other tasks are ready.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }

    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

impl DelayNs for SystemClock {
    fn delay_ns(&mut self, ns: u32) {
        Delay.delay_ns(ns)
    }

    fn delay_us(&mut self, us: u32) {
        Delay.delay_us(us)
    }

    fn delay_ms(&mut self, ms: u32) {
        Delay.delay_ms(ms)
    }
}
