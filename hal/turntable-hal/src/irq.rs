//! Interrupt source gating
//!
//! State shared between an interrupt handler and the main loop is only
//! touched from the main loop while the handler's interrupt source is
//! masked. [`IrqGuard`] scopes that window: masking happens on
//! construction and unmasking on drop, so an early return cannot leave the
//! source disabled.

/// Mask/unmask a single interrupt source
///
/// Both operations take `&self` so a gate can live inside a `static`.
/// Masking must be immediate: once `mask` returns, the handler cannot start
/// until `unmask` is called. A pending request raised while masked must be
/// delivered after `unmask`.
pub trait InterruptGate {
    /// Prevent the interrupt from being serviced
    fn mask(&self);

    /// Allow the interrupt to be serviced again
    fn unmask(&self);
}

impl<G: InterruptGate + ?Sized> InterruptGate for &G {
    fn mask(&self) {
        (**self).mask()
    }

    fn unmask(&self) {
        (**self).unmask()
    }
}

/// Scoped interrupt mask
///
/// Keep the guard alive for as few instructions as possible.
#[must_use = "the interrupt is unmasked as soon as the guard is dropped"]
pub struct IrqGuard<'a, G: InterruptGate + ?Sized> {
    gate: &'a G,
}

impl<'a, G: InterruptGate + ?Sized> IrqGuard<'a, G> {
    /// Mask the gate's interrupt until the returned guard is dropped
    pub fn acquire(gate: &'a G) -> Self {
        gate.mask();
        Self { gate }
    }
}

impl<G: InterruptGate + ?Sized> Drop for IrqGuard<'_, G> {
    fn drop(&mut self) {
        self.gate.unmask();
    }
}
