//! Stepper drivers
//!
//! Step/dir/enable drivers (A4988, DRV8825, TMC in standalone mode) pulsed
//! from the main loop.

pub mod profile;

pub use profile::{MotionError, MotionProfile};
