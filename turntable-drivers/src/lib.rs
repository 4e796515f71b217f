//! Hardware-bound turntable components
//!
//! Each component owns its collaborators through `embedded-hal` and
//! `turntable-hal` traits, so the same code runs on the RP2040 and against
//! host-side mocks:
//!
//! - [`stepper::MotionProfile`] - step/dir/enable driver with a trapezoidal profile
//! - [`dial::QuadratureDelta`] - interrupt-fed quadrature dial accumulator
//! - [`sensor::AbsoluteAngleSensor`] - filtered potentiometer angle
//! - [`storage::PersistentStore`] - settings record on a byte store
//! - [`control::Turntable`] - the cooperative polling loop tying them together

#![no_std]
#![deny(unsafe_code)]

pub mod control;
pub mod dial;
pub mod sensor;
pub mod stepper;
pub mod storage;

pub use control::{Status, Turntable, TurntableError};
