//! Rotary dial input

pub mod quadrature;

pub use quadrature::{decode, Phase, QuadratureDelta};
