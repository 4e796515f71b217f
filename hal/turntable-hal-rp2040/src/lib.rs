//! RP2040-specific HAL for the turntable firmware
//!
//! Implements the shared `turntable-hal` traits on top of `embassy-rp`:
//!
//! - Monotonic clock and busy-wait delay on the embassy time driver
//! - Blocking ADC channel for the angle potentiometer
//! - NVIC gate for the dial interrupt
//! - Settings partition in the last flash sector

#![no_std]

pub mod adc;
pub mod clock;
pub mod flash;
pub mod irq;

pub use adc::AdcInput;
pub use clock::SystemClock;
pub use flash::{settings_store, SettingsFlash};
pub use irq::Rp2040IrqGate;
