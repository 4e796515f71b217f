//! Push button tasks
//!
//! All buttons are active low with internal pull-ups.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{with_timeout, Duration, Timer};

use turntable_core::menu::ButtonEvent;

use crate::channels::BUTTON_EVENTS;
use crate::config::CONFIG;

/// Encoder push button: click on release, long press after the hold time
#[embassy_executor::task]
pub async fn encoder_button_task(mut btn: Input<'static>) {
    info!("Encoder button task started");

    let debounce = Duration::from_millis(CONFIG.ui.debounce_ms as u64);
    let long_press = Duration::from_millis(CONFIG.ui.long_press_ms as u64);

    loop {
        btn.wait_for_falling_edge().await;
        Timer::after(debounce).await;

        if btn.is_low() {
            match with_timeout(long_press, btn.wait_for_rising_edge()).await {
                Ok(()) => {
                    debug!("Button: Click");
                    BUTTON_EVENTS.send(ButtonEvent::EncoderClick).await;
                }
                Err(_) => {
                    debug!("Button: LongPress");
                    BUTTON_EVENTS.send(ButtonEvent::EncoderLongPress).await;
                    // Wait for actual release
                    btn.wait_for_rising_edge().await;
                }
            }

            // Debounce after release
            Timer::after(debounce).await;
        }
    }
}

/// Single-action button: one event per debounced press
#[embassy_executor::task(pool_size = 3)]
pub async fn button_task(mut btn: Input<'static>, event: ButtonEvent) {
    info!("Button task started: {}", event);

    let debounce = Duration::from_millis(CONFIG.ui.debounce_ms as u64);

    loop {
        btn.wait_for_falling_edge().await;
        Timer::after(debounce).await;

        if btn.is_low() {
            debug!("Button: {}", event);
            BUTTON_EVENTS.send(event).await;
            btn.wait_for_high().await;
            Timer::after(debounce).await;
        }
    }
}

/// Fine-step button: one step per press, auto-repeating while held
#[embassy_executor::task]
pub async fn fine_step_task(mut btn: Input<'static>) {
    info!("Fine step task started");

    let debounce = Duration::from_millis(CONFIG.ui.debounce_ms as u64);
    let repeat_delay = Duration::from_millis(CONFIG.ui.fine_step_repeat_delay_ms as u64);
    let repeat_interval = Duration::from_millis(CONFIG.ui.fine_step_repeat_interval_ms as u64);

    loop {
        btn.wait_for_falling_edge().await;
        Timer::after(debounce).await;

        if !btn.is_low() {
            continue;
        }

        BUTTON_EVENTS.send(ButtonEvent::FineStep).await;

        let mut hold = repeat_delay;
        while with_timeout(hold, btn.wait_for_high()).await.is_err() {
            trace!("Button: FineStep repeat");
            BUTTON_EVENTS.send(ButtonEvent::FineStep).await;
            hold = repeat_interval;
        }

        Timer::after(debounce).await;
    }
}
