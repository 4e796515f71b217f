//! Position sensors

pub mod angle;

pub use angle::{AbsoluteAngleSensor, DEFAULT_FILTER_SAMPLES};
