//! Quadrature dial edge task
//!
//! Runs on the interrupt executor so edges are counted even while the
//! control task is busy pulsing the motor.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Input;

use turntable_drivers::dial::Phase;

use crate::channels::DIAL;

#[embassy_executor::task]
pub async fn dial_task(mut a: Input<'static>, mut b: Input<'static>) {
    info!("Dial task started");

    loop {
        let phase = match select(a.wait_for_any_edge(), b.wait_for_any_edge()).await {
            Either::First(()) => Phase::A,
            Either::Second(()) => Phase::B,
        };
        DIAL.on_edge(phase, a.is_high(), b.is_high());
    }
}
