//! Turntable Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the turntable logic
//! is written against. Chip-specific HALs (RP2040, ...) implement them, and
//! host tests substitute mocks. Digital pins and busy-wait delays come from
//! `embedded-hal` directly; this crate only covers what `embedded-hal`
//! does not.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (turntable-firmware)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  turntable-drivers / turntable-core     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  turntable-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ turntable-hal-│
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`clock::Clock`] - Monotonic microsecond time source
//! - [`adc::AnalogInput`] - Single ADC channel
//! - [`eeprom::ByteStore`] - Byte-addressable non-volatile storage
//! - [`irq::InterruptGate`] - Mask/unmask one interrupt source

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod clock;
pub mod eeprom;
pub mod irq;

// Re-export key traits at crate root for convenience
pub use adc::AnalogInput;
pub use clock::Clock;
pub use eeprom::{ByteStore, RamStore, StoreError};
pub use irq::{InterruptGate, IrqGuard};
