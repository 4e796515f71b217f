//! Step/dir stepper driver with a trapezoidal motion profile
//!
//! [`MotionProfile::update`] is called every loop iteration. It takes at
//! most one step per call, and only once the planned delay since the
//! previous step has elapsed, so the loop never blocks for longer than the
//! direction-settle and step-pulse waits (a few microseconds each).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, ErrorKind, OutputPin, PinState};
use turntable_core::config::MotionConfig;
use turntable_core::motion::{MotionState, Step, StepPlanner};
use turntable_hal::Clock;

/// Stepper output errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// A step, direction or enable pin write failed
    Pin(ErrorKind),
}

fn pin_error<E: embedded_hal::digital::Error>(e: E) -> MotionError {
    MotionError::Pin(e.kind())
}

/// Stepper motor driven through step, direction and enable outputs
///
/// `T` supplies both the microsecond clock used for step scheduling and
/// the busy-wait used for pulse timing.
pub struct MotionProfile<STEP, DIR, EN, T> {
    step_pin: STEP,
    dir_pin: DIR,
    enable_pin: EN,
    timer: T,
    planner: StepPlanner,
    step_pulse_us: u32,
    dir_settle_us: u32,
    enable_active_low: bool,
    /// Level last written to the direction output, `None` before the first step
    physical_forward: Option<bool>,
    /// Time the previous step was taken (or the move was started)
    last_step_us: u64,
    enabled: bool,
}

impl<STEP, DIR, EN, T> MotionProfile<STEP, DIR, EN, T>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    T: Clock + DelayNs,
{
    pub fn new(
        step_pin: STEP,
        dir_pin: DIR,
        enable_pin: EN,
        timer: T,
        config: MotionConfig,
        steps_360: i32,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            enable_pin,
            timer,
            planner: StepPlanner::new(config, steps_360),
            step_pulse_us: config.step_pulse_us,
            dir_settle_us: config.dir_settle_us,
            enable_active_low: config.enable_active_low,
            physical_forward: None,
            last_step_us: 0,
            enabled: false,
        }
    }

    /// Drive all outputs to a known state and energize the motor
    pub fn begin(&mut self) -> Result<(), MotionError> {
        self.step_pin.set_low().map_err(pin_error)?;
        self.dir_pin.set_low().map_err(pin_error)?;
        self.physical_forward = Some(false);
        self.set_enabled(true)
    }

    /// Enqueue a signed relative move
    ///
    /// Moves are additive. When the motor was idle the first step is taken
    /// one initial delay from now.
    pub fn move_by(&mut self, steps: i32) {
        let was_idle = self.planner.is_idle();
        self.planner.enqueue(steps);
        if was_idle && !self.planner.is_idle() {
            self.last_step_us = self.timer.now_us();
        }
    }

    /// Take at most one step if its delay has elapsed
    ///
    /// Returns `true` if a step was pulsed.
    pub fn update(&mut self) -> Result<bool, MotionError> {
        let Some(step) = self.planner.next_step() else {
            return Ok(false);
        };

        let now = self.timer.now_us();
        if now.saturating_sub(self.last_step_us) < self.planner.step_delay_us() as u64 {
            return Ok(false);
        }

        self.pulse(step)?;
        self.planner.complete_step();
        self.last_step_us = now;
        Ok(true)
    }

    fn pulse(&mut self, step: Step) -> Result<(), MotionError> {
        if self.physical_forward != Some(step.forward) {
            self.dir_pin
                .set_state(PinState::from(step.forward))
                .map_err(pin_error)?;
            self.physical_forward = Some(step.forward);
            self.timer.delay_us(self.dir_settle_us);
        }

        self.step_pin.set_high().map_err(pin_error)?;
        self.timer.delay_us(self.step_pulse_us);
        self.step_pin.set_low().map_err(pin_error)
    }

    /// Force the position (wrapped), discarding pending steps
    pub fn set_position(&mut self, position: i32) {
        self.planner.set_position(position);
    }

    /// Discard pending steps, keeping the current position
    pub fn stop(&mut self) {
        let position = self.planner.position();
        self.planner.set_position(position);
    }

    pub fn set_direction_invert(&mut self, invert: bool) {
        self.planner.set_direction_invert(invert);
    }

    pub fn set_distance_to_target(&mut self, steps: i32) {
        self.planner.set_distance_to_target(steps);
    }

    /// Energize (hold) or release the motor
    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), MotionError> {
        let level = enabled != self.enable_active_low;
        self.enable_pin
            .set_state(PinState::from(level))
            .map_err(pin_error)?;
        self.enabled = enabled;
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn position(&self) -> i32 {
        self.planner.position()
    }

    pub fn remaining(&self) -> i32 {
        self.planner.remaining()
    }

    /// Position once pending steps are taken
    pub fn committed_position(&self) -> i32 {
        self.planner.committed_position()
    }

    pub fn step_delay_us(&self) -> u32 {
        self.planner.step_delay_us()
    }

    pub fn state(&self) -> MotionState {
        self.planner.state()
    }

    pub fn steps_360(&self) -> i32 {
        self.planner.steps_360()
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}
