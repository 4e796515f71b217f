//! Turntable control task
//!
//! Owns the assembled [`Turntable`] and runs its cooperative loop: drain
//! button events and the dial, poll, then yield so the button tasks get a
//! turn. Step timing comes from the polled clock, so the loop never sleeps.

use defmt::*;
use embassy_futures::yield_now;
use embassy_rp::gpio::Output;
use heapless::Vec;

use turntable_core::menu::{ButtonEvent, Screen};
use turntable_drivers::{Status, Turntable};
use turntable_hal_rp2040::{AdcInput, SettingsFlash, SystemClock};

use crate::channels::{BUTTON_CHANNEL_SIZE, BUTTON_EVENTS, DIAL};

/// The turntable as wired on the board
pub type FirmwareTurntable = Turntable<
    Output<'static>,
    Output<'static>,
    Output<'static>,
    SystemClock,
    AdcInput<'static>,
    SettingsFlash<'static>,
>;

#[embassy_executor::task]
pub async fn control_task(mut turntable: FirmwareTurntable, mut run_led: Output<'static>) {
    info!("Control task started");

    match turntable.begin() {
        Ok(loaded) => {
            if let Some(fault) = loaded.fault {
                warn!("Stored settings rejected ({}), using defaults", fault);
            }
            info!(
                "Restored position={} direction={} zero_offset={}",
                loaded.record.position, loaded.record.direction, loaded.record.zero_offset
            );
        }
        Err(e) => error!("Turntable bring-up failed: {}", e),
    }
    DIAL.begin();

    let mut last = turntable.status();
    run_led.set_level(last.running.into());

    loop {
        let mut events: Vec<ButtonEvent, BUTTON_CHANNEL_SIZE> = Vec::new();
        while let Ok(event) = BUTTON_EVENTS.try_receive() {
            // Capacity matches the channel, so this cannot overflow
            let _ = events.push(event);
        }
        let delta = DIAL.read();

        let saving = last.screen == Screen::Save && events.contains(&ButtonEvent::EncoderClick);

        match turntable.poll(delta, events.iter().copied()) {
            Ok(()) if saving => info!("Settings saved"),
            Ok(()) => {}
            Err(e) => warn!("Control loop error: {}", e),
        }

        let status = turntable.status();
        report(&last, &status);
        if status.running != last.running {
            run_led.set_level(status.running.into());
        }
        last = status;

        yield_now().await;
    }
}

/// Log the changes worth seeing on the probe
fn report(last: &Status, now: &Status) {
    if now.screen != last.screen || now.current_item != last.current_item {
        debug!("Screen: {} item={}", now.screen, now.current_item);
    }
    if now.target_angle != last.target_angle || now.target_position != last.target_position {
        debug!(
            "Target: {}° -> {} steps (override={})",
            now.target_angle, now.target_position, now.manual_override
        );
    }
    if now.digit_mode != last.digit_mode {
        debug!("Digit mode: {}", now.digit_mode);
    }
    if now.direction != last.direction {
        info!("Direction: {}", now.direction);
    }
    if now.zero_offset != last.zero_offset {
        info!("Zero offset: {}", now.zero_offset);
    }
    if now.running != last.running {
        info!("Tracking {}", if now.running { "started" } else { "stopped" });
    }
    if now.position_reached && !last.position_reached {
        debug!("Position reached at {}", now.position);
    }
}
