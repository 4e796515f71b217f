//! Inter-task communication
//!
//! Button tasks push debounced events; the control task drains them once
//! per loop iteration. The dial does not go through a channel: its edge
//! counter is the static [`DIAL`] shared with the high-priority executor.

use embassy_rp::interrupt::Interrupt;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use turntable_core::menu::ButtonEvent;
use turntable_drivers::dial::QuadratureDelta;
use turntable_hal_rp2040::Rp2040IrqGate;

/// Channel capacity for button events
pub const BUTTON_CHANNEL_SIZE: usize = 8;

/// Debounced button events, oldest first
pub static BUTTON_EVENTS: Channel<CriticalSectionRawMutex, ButtonEvent, BUTTON_CHANNEL_SIZE> =
    Channel::new();

/// Dial edge counter
///
/// Written by the dial task, which runs on the SWI_IRQ_1 interrupt
/// executor; the gate masks that interrupt while the control task drains it.
pub static DIAL: QuadratureDelta<Rp2040IrqGate> =
    QuadratureDelta::new(Rp2040IrqGate::new(Interrupt::SWI_IRQ_1));
