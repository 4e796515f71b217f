//! Quadrature dial accumulator
//!
//! The edge handler runs in interrupt context and does nothing but update
//! one signed counter. The main loop drains the counter with
//! [`QuadratureDelta::read`] while the dial interrupt is masked.
//!
//! Decode, one detent with channel A leading, starting from (A, B) = (0, 0):
//!
//! ```text
//!  edge   A  B   rule                 count
//!  A rise 1  0   A edge, A != B: -1     -1
//!  B rise 1  1   B edge, A == B: -1     -2
//!  A fall 0  1   A edge, A != B: -1     -3
//!  B fall 0  0   B edge, A == B: -1     -4
//! ```
//!
//! With channel B leading every edge counts +1.
//!
//! The accumulator is built by a `const fn` so it can live in a `static`
//! reached from the interrupt task; no mutable global pointer is needed.

use portable_atomic::{AtomicBool, AtomicI32, Ordering};
use turntable_hal::{InterruptGate, IrqGuard};

/// Dial channel that produced an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    A,
    B,
}

/// Count contribution of one edge given both levels after the edge
#[inline]
pub fn decode(phase: Phase, a: bool, b: bool) -> i32 {
    let forward = match phase {
        Phase::A => a == b,
        Phase::B => a != b,
    };
    if forward {
        1
    } else {
        -1
    }
}

/// Signed edge counter shared between the dial interrupt and the main loop
pub struct QuadratureDelta<G> {
    count: AtomicI32,
    armed: AtomicBool,
    gate: G,
}

impl<G: InterruptGate> QuadratureDelta<G> {
    pub const fn new(gate: G) -> Self {
        Self {
            count: AtomicI32::new(0),
            armed: AtomicBool::new(false),
            gate,
        }
    }

    /// Clear the counter and enable the edge interrupt
    pub fn begin(&self) {
        self.gate.mask();
        self.count.store(0, Ordering::Relaxed);
        self.armed.store(true, Ordering::Release);
        self.gate.unmask();
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Edge handler; call only from the dial interrupt
    ///
    /// Saturates at the `i32` bounds.
    pub fn on_edge(&self, phase: Phase, a: bool, b: bool) {
        let step = decode(phase, a, b);
        // Sole writer while the main loop has the interrupt masked
        let count = self.count.load(Ordering::Relaxed);
        self.count.store(count.saturating_add(step), Ordering::Relaxed);
    }

    /// Take the accumulated delta, resetting the counter
    pub fn read(&self) -> i32 {
        self.masked(|count| {
            let delta = count.load(Ordering::Relaxed);
            count.store(0, Ordering::Relaxed);
            delta
        })
    }

    /// Peek at the accumulated delta without resetting it
    pub fn get_delta(&self) -> i32 {
        self.masked(|count| count.load(Ordering::Relaxed))
    }

    fn masked<R>(&self, f: impl FnOnce(&AtomicI32) -> R) -> R {
        // Before begin() the interrupt is not running and must stay off
        let _guard = self.is_armed().then(|| IrqGuard::acquire(&self.gate));
        f(&self.count)
    }
}
