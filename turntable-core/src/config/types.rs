//! Top-level configuration
//!
//! `TurntableConfig` bundles every tunable of the device. Defaults match
//! a 200-step motor at 16 microsteps with a 0-360° potentiometer.

use super::hardware::{MechanicsConfig, MotionConfig, SensorConfig, StorageConfig};
use crate::menu::OverridePolicy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Menu and button timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UiConfig {
    /// Minimum interval between two menu navigation changes
    pub menu_change_delay_ms: u32,
    /// Hold time that turns a click into a long press
    pub long_press_ms: u32,
    /// Button debounce time
    pub debounce_ms: u32,
    /// Hold time before the fine-step button starts repeating
    pub fine_step_repeat_delay_ms: u32,
    /// Fine-step repeat period
    pub fine_step_repeat_interval_ms: u32,
    /// Positions closer than this to the target count as reached
    pub reach_tolerance_steps: u32,
    /// How a manual target angle is released back to the sensor
    pub override_policy: OverridePolicy,
}

impl UiConfig {
    pub const fn new() -> Self {
        Self {
            menu_change_delay_ms: 150,
            long_press_ms: 2000,
            debounce_ms: 50,
            fine_step_repeat_delay_ms: 500,
            fine_step_repeat_interval_ms: 100,
            reach_tolerance_steps: 2,
            override_policy: OverridePolicy::ExplicitReset,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TurntableConfig {
    pub mechanics: MechanicsConfig,
    pub motion: MotionConfig,
    pub sensor: SensorConfig,
    pub ui: UiConfig,
    pub storage: StorageConfig,
}

/// Configuration validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Steps per revolution or microsteps is zero
    NoStepsPerTurn,
    /// Too few steps per turn to resolve whole degrees
    StepResolution { steps_360: i32 },
    /// Steps per turn do not fit in an `i32`
    StepOverflow,
    /// Delays are not ordered min <= accel <= max, or min is zero
    DelayOrder,
    /// Deceleration window is zero
    DecelWindow,
    /// Step pulse width is zero
    PulseWidth,
    /// Reference voltage or full-scale angle is not positive
    SensorScale,
    /// Zero calibration takes no samples
    ZeroSamples,
    /// Persisted position bounds are inverted or outside one turn
    PositionBounds { min: i32, max: i32 },
}

impl TurntableConfig {
    pub const fn new() -> Self {
        Self {
            mechanics: MechanicsConfig::new(),
            motion: MotionConfig::new(),
            sensor: SensorConfig::new(),
            ui: UiConfig::new(),
            storage: StorageConfig::new(),
        }
    }

    /// Logical steps in one full turn
    pub const fn steps_360(&self) -> i32 {
        self.mechanics.steps_360()
    }

    /// Check the configuration for values the firmware cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let steps_360 = self
            .mechanics
            .checked_steps_360()
            .ok_or(ConfigError::StepOverflow)?;
        if steps_360 <= 0 {
            return Err(ConfigError::NoStepsPerTurn);
        }
        // Degree -> steps -> degree must be lossless
        if steps_360 <= 720 {
            return Err(ConfigError::StepResolution { steps_360 });
        }

        let m = &self.motion;
        if m.min_delay_us == 0
            || m.min_delay_us > m.accel_delay_us
            || m.accel_delay_us > m.max_delay_us
        {
            return Err(ConfigError::DelayOrder);
        }
        if m.decel_start_steps == 0 {
            return Err(ConfigError::DecelWindow);
        }
        if m.step_pulse_us == 0 {
            return Err(ConfigError::PulseWidth);
        }

        let s = &self.sensor;
        if !(s.ref_voltage > 0.0) || !(s.max_angle > 0.0) {
            return Err(ConfigError::SensorScale);
        }
        if s.zero_samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }

        let st = &self.storage;
        if st.min_pos > st.max_pos || st.min_pos < 0 || st.max_pos > steps_360 {
            return Err(ConfigError::PositionBounds {
                min: st.min_pos,
                max: st.max_pos,
            });
        }

        Ok(())
    }
}
