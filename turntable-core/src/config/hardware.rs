//! Hardware-facing configuration
//!
//! Mechanics of the drive train, step timing and the analog sensor.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Drive train geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MechanicsConfig {
    /// Full steps per motor revolution
    pub steps_per_rev: u16,
    /// Driver microstep setting
    pub microsteps: u16,
}

impl MechanicsConfig {
    pub const fn new() -> Self {
        Self {
            steps_per_rev: 200,
            microsteps: 16,
        }
    }

    /// Logical steps in one full turn of the table, saturating
    pub const fn steps_360(&self) -> i32 {
        (self.steps_per_rev as i32).saturating_mul(self.microsteps as i32)
    }

    /// Logical steps in one full turn, or `None` if they overflow `i32`
    pub const fn checked_steps_360(&self) -> Option<i32> {
        (self.steps_per_rev as i32).checked_mul(self.microsteps as i32)
    }
}

impl Default for MechanicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Step timing
///
/// All delays are in microseconds between consecutive step pulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Delay of the first step after a new move
    pub accel_delay_us: u32,
    /// Cruise delay (fastest)
    pub min_delay_us: u32,
    /// Delay of the last step before target (slowest)
    pub max_delay_us: u32,
    /// Ramp-up decrement applied after every step
    pub ramp_decrement_us: u32,
    /// Remaining distance at which deceleration begins
    pub decel_start_steps: u32,
    /// Step output high time
    pub step_pulse_us: u32,
    /// Hold after a direction change before the next pulse
    pub dir_settle_us: u32,
    /// Enable output is active low (typical for A4988/DRV8825/TMC drivers)
    pub enable_active_low: bool,
}

impl MotionConfig {
    pub const fn new() -> Self {
        Self {
            accel_delay_us: 1000,
            min_delay_us: 300,
            max_delay_us: 1200,
            ramp_decrement_us: 10,
            decel_start_steps: 200,
            step_pulse_us: 4,
            dir_settle_us: 2,
            enable_active_low: true,
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Absolute angle sensor (potentiometer on an ADC channel)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SensorConfig {
    /// ADC reference voltage
    pub ref_voltage: f32,
    /// Angle at full scale, degrees
    pub max_angle: f32,
    /// Minimum interval between change checks
    pub poll_interval_ms: u32,
    /// Samples averaged during zero calibration
    pub zero_samples: u16,
    /// ADC settle time before zero calibration
    pub zero_settle_ms: u32,
    /// Spacing between calibration samples
    pub zero_sample_interval_us: u32,
    /// Readings this close to zero are reported as exactly zero
    pub zero_snap_deg: f32,
}

impl SensorConfig {
    pub const fn new() -> Self {
        Self {
            ref_voltage: 3.3,
            max_angle: 360.0,
            poll_interval_ms: 10,
            zero_samples: 128,
            zero_settle_ms: 50,
            zero_sample_interval_us: 1000,
            zero_snap_deg: 1.0,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Location and bounds of the persisted settings record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StorageConfig {
    /// Byte offset of the record in the store
    pub base_address: u32,
    /// Lowest accepted persisted position
    pub min_pos: i32,
    /// Highest accepted persisted position
    pub max_pos: i32,
}

impl StorageConfig {
    pub const fn new() -> Self {
        Self {
            base_address: 0,
            min_pos: 0,
            max_pos: 3200,
        }
    }

    /// Whether a persisted position may be restored as-is
    pub fn accepts(&self, position: i32) -> bool {
        (self.min_pos..=self.max_pos).contains(&position)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new()
    }
}
