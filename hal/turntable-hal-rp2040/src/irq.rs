//! NVIC gate for the dial interrupt

use embassy_rp::interrupt::{Interrupt, InterruptExt};
use turntable_hal::InterruptGate;

/// Masks one interrupt line in the NVIC
///
/// The dial edge task runs on an interrupt executor; gating that
/// executor's software interrupt keeps the edge handler out while the
/// main loop touches the shared counter. Edges arriving meanwhile stay
/// pending and are handled on unmask.
#[derive(Debug, Clone, Copy)]
pub struct Rp2040IrqGate {
    irq: Interrupt,
}

impl Rp2040IrqGate {
    pub const fn new(irq: Interrupt) -> Self {
        Self { irq }
    }
}

impl InterruptGate for Rp2040IrqGate {
    fn mask(&self) {
        self.irq.disable();
        // Make sure the disable has taken effect before touching shared state
        cortex_m::asm::dsb();
        cortex_m::asm::isb();
    }

    fn unmask(&self) {
        // SAFETY: the only work behind this line is the dial edge task, whose
        // shared state is the atomic dial counter.
        unsafe { self.irq.enable() }
    }
}
