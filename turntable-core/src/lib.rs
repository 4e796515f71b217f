//! Board-agnostic core logic for the turntable firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Configuration type definitions and validation
//! - Angle/step arithmetic and the sensor filter math
//! - Step planner (trapezoidal delay profile)
//! - Menu state machine and target resolution
//! - Persisted settings record layout

#![no_std]
#![deny(unsafe_code)]

pub mod angle;
pub mod config;
pub mod menu;
pub mod motion;
pub mod settings;
