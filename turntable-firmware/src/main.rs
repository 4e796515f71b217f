//! Turntable - Rotary Positioning Firmware
//!
//! Main firmware binary for RP2040-based turntables. A step/dir driven
//! stepper follows a target angle taken from a potentiometer, the
//! quadrature dial, or a value entered through the menu.
//!
//! Pin assignment:
//!
//! | Function        | GPIO |
//! |-----------------|------|
//! | Stepper STEP    | 11   |
//! | Stepper DIR     | 10   |
//! | Stepper ENABLE  | 12   |
//! | Dial A / B      | 2, 3 |
//! | Encoder button  | 4    |
//! | Digit mode      | 5    |
//! | Start/stop      | 6    |
//! | Set zero        | 7    |
//! | Fine step       | 8    |
//! | Running LED     | 25   |
//! | Angle pot (ADC0)| 26   |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::adc::{Adc, Channel};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use {defmt_rtt as _, panic_probe as _};

use turntable_core::menu::ButtonEvent;
use turntable_drivers::sensor::AbsoluteAngleSensor;
use turntable_drivers::stepper::MotionProfile;
use turntable_drivers::storage::PersistentStore;
use turntable_drivers::Turntable;
use turntable_hal_rp2040::{settings_store, AdcInput, SystemClock};

use crate::config::CONFIG;

mod channels;
mod config;
mod tasks;

/// High-priority executor for the dial edges
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Turntable firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let steps_360 = CONFIG.steps_360();
    info!(
        "Mechanics: {} steps/turn ({}x{})",
        steps_360, CONFIG.mechanics.steps_per_rev, CONFIG.mechanics.microsteps
    );

    // Stepper driver (SKR Pico layout: STEP=GPIO11, DIR=GPIO10, ENABLE=GPIO12)
    let disabled = if CONFIG.motion.enable_active_low {
        Level::High
    } else {
        Level::Low
    };
    let motion = MotionProfile::new(
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_12, disabled),
        SystemClock,
        CONFIG.motion,
        steps_360,
    );

    // Angle potentiometer
    let adc = Adc::new_blocking(p.ADC, embassy_rp::adc::Config::default());
    let pot = Channel::new_pin(p.PIN_26, Pull::None);
    let sensor = AbsoluteAngleSensor::new(AdcInput::new(adc, pot), CONFIG.sensor);

    // Settings live in the last flash sector
    let store = PersistentStore::new(settings_store(p.FLASH), CONFIG.storage);

    let turntable = Turntable::new(motion, sensor, store, &CONFIG);
    info!("Turntable assembled");

    // Dial edges run above the control loop so none are lost while it steps
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high_spawner
        .spawn(tasks::dial_task(
            Input::new(p.PIN_2, Pull::Up),
            Input::new(p.PIN_3, Pull::Up),
        ))
        .unwrap();

    spawner
        .spawn(tasks::encoder_button_task(Input::new(p.PIN_4, Pull::Up)))
        .unwrap();
    spawner
        .spawn(tasks::button_task(
            Input::new(p.PIN_5, Pull::Up),
            ButtonEvent::DigitMode,
        ))
        .unwrap();
    spawner
        .spawn(tasks::button_task(
            Input::new(p.PIN_6, Pull::Up),
            ButtonEvent::StartStop,
        ))
        .unwrap();
    spawner
        .spawn(tasks::button_task(
            Input::new(p.PIN_7, Pull::Up),
            ButtonEvent::SetZero,
        ))
        .unwrap();
    spawner
        .spawn(tasks::fine_step_task(Input::new(p.PIN_8, Pull::Up)))
        .unwrap();

    let run_led = Output::new(p.PIN_25, Level::Low);
    spawner
        .spawn(tasks::control_task(turntable, run_led))
        .unwrap();

    info!("All tasks spawned");
}
