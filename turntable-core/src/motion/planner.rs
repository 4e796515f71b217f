//! Step planner for trapezoidal move profiles
//!
//! Tracks the logical position and the signed number of steps still to
//! take, and decides the delay before each step. The planner never touches
//! hardware: the driver asks [`StepPlanner::next_step`] what to pulse,
//! waits [`StepPlanner::step_delay_us`], pulses, then reports back with
//! [`StepPlanner::complete_step`].
//!
//! Delay profile:
//!
//! ```text
//!  delay
//!  MAX  |                                        ..
//!       |                                     ..
//!  ACCEL|\                                 ..
//!       | \                             ..
//!  MIN  |  \_____________________________
//!       +---------------------------------+----> steps
//!                             |<- DECEL ->|
//! ```
//!
//! The ramp-up decrements the delay by a fixed amount per step while the
//! remaining distance exceeds the deceleration window. Inside the window,
//! and only when a distance hint is set, the delay is interpolated between
//! MIN (at the window edge) and MAX (at the target).

use crate::angle::{offset_steps, wrap_steps};
use crate::config::MotionConfig;

/// Current motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// No steps pending
    Stopped,
    /// Delay still above cruise
    Accelerating,
    /// Cruising at the minimum delay
    AtSpeed,
    /// Inside the deceleration window
    Decelerating,
}

/// One step the driver should take next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    /// Logical sign of the step (+1 or -1)
    pub logical: i8,
    /// Level of the direction output (logical sign XOR invert)
    pub forward: bool,
}

/// Position and delay bookkeeping for a single stepper axis
#[derive(Debug, Clone)]
pub struct StepPlanner {
    config: MotionConfig,
    steps_360: i32,
    position: i32,
    remaining: i32,
    step_delay_us: u32,
    distance_to_target: u32,
    direction_invert: bool,
}

impl StepPlanner {
    pub fn new(config: MotionConfig, steps_360: i32) -> Self {
        Self {
            config,
            steps_360,
            position: 0,
            remaining: 0,
            step_delay_us: Self::initial_delay(&config),
            distance_to_target: 0,
            direction_invert: false,
        }
    }

    fn initial_delay(config: &MotionConfig) -> u32 {
        config
            .accel_delay_us
            .clamp(config.min_delay_us, config.max_delay_us)
    }

    /// Add a signed delta to the pending steps and restart the ramp
    pub fn enqueue(&mut self, steps: i32) {
        if steps == 0 {
            return;
        }
        self.remaining = self.remaining.saturating_add(steps);
        self.step_delay_us = self.plan(Self::initial_delay(&self.config));
    }

    /// Force the position, discarding any pending steps
    pub fn set_position(&mut self, position: i32) {
        self.position = wrap_steps(position, self.steps_360);
        self.remaining = 0;
        self.step_delay_us = Self::initial_delay(&self.config);
    }

    /// Invert the direction output relative to the logical direction
    pub fn set_direction_invert(&mut self, invert: bool) {
        self.direction_invert = invert;
    }

    /// Distance hint for deceleration planning; zero disables deceleration
    pub fn set_distance_to_target(&mut self, steps: i32) {
        self.distance_to_target = steps.unsigned_abs();
    }

    /// Step to take next, if any are pending
    pub fn next_step(&self) -> Option<Step> {
        if self.remaining == 0 {
            return None;
        }
        let positive = self.remaining > 0;
        Some(Step {
            logical: if positive { 1 } else { -1 },
            forward: positive != self.direction_invert,
        })
    }

    /// Account for a step that has been pulsed and plan the next delay
    ///
    /// Returns the step taken, or `None` if nothing was pending.
    pub fn complete_step(&mut self) -> Option<Step> {
        let step = self.next_step()?;
        let sign = step.logical as i32;
        self.remaining -= sign;
        self.position = offset_steps(self.position, sign, self.steps_360);

        self.step_delay_us = if self.remaining == 0 {
            Self::initial_delay(&self.config)
        } else {
            let ramp = self
                .step_delay_us
                .saturating_sub(self.config.ramp_decrement_us);
            self.plan(ramp)
        };
        Some(step)
    }

    /// Delay for the next step given the ramp value
    fn plan(&self, ramp_us: u32) -> u32 {
        let rem = self.remaining.unsigned_abs();
        if self.in_decel_window(rem) {
            self.decel_delay(rem)
        } else {
            ramp_us.clamp(self.config.min_delay_us, self.config.max_delay_us)
        }
    }

    fn in_decel_window(&self, rem: u32) -> bool {
        self.distance_to_target > 0 && rem <= self.config.decel_start_steps
    }

    /// Linear interpolation: MIN at the window edge, approaching MAX at 0
    fn decel_delay(&self, rem: u32) -> u32 {
        let min = self.config.min_delay_us as u64;
        let max = self.config.max_delay_us as u64;
        let window = self.config.decel_start_steps.max(1) as u64;
        let fraction = (rem as u64 * 1000 / window).min(1000);
        let delay = min + (max.saturating_sub(min)) * (1000 - fraction) / 1000;
        delay as u32
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    /// Position once all pending steps are taken
    pub fn committed_position(&self) -> i32 {
        offset_steps(self.position, self.remaining, self.steps_360)
    }

    pub fn step_delay_us(&self) -> u32 {
        self.step_delay_us
    }

    pub fn distance_to_target(&self) -> u32 {
        self.distance_to_target
    }

    pub fn direction_invert(&self) -> bool {
        self.direction_invert
    }

    pub fn steps_360(&self) -> i32 {
        self.steps_360
    }

    pub fn is_idle(&self) -> bool {
        self.remaining == 0
    }

    pub fn state(&self) -> MotionState {
        if self.remaining == 0 {
            MotionState::Stopped
        } else if self.in_decel_window(self.remaining.unsigned_abs()) {
            MotionState::Decelerating
        } else if self.step_delay_us > self.config.min_delay_us {
            MotionState::Accelerating
        } else {
            MotionState::AtSpeed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> StepPlanner {
        StepPlanner::new(MotionConfig::default(), 3200)
    }

    fn run_to_end(p: &mut StepPlanner) -> usize {
        let mut steps = 0;
        while p.complete_step().is_some() {
            steps += 1;
        }
        steps
    }

    #[test]
    fn test_initial_state() {
        let p = planner();
        assert_eq!(p.position(), 0);
        assert_eq!(p.remaining(), 0);
        assert_eq!(p.step_delay_us(), 1000);
        assert_eq!(p.state(), MotionState::Stopped);
        assert_eq!(p.next_step(), None);
    }

    #[test]
    fn test_enqueue_is_additive() {
        let mut p = planner();
        p.enqueue(100);
        p.enqueue(-30);
        assert_eq!(p.remaining(), 70);
        p.enqueue(0);
        assert_eq!(p.remaining(), 70);
    }

    #[test]
    fn test_move_completes() {
        let mut p = planner();
        p.set_position(3100);
        p.enqueue(250);
        assert_eq!(run_to_end(&mut p), 250);
        assert_eq!(p.remaining(), 0);
        assert_eq!(p.position(), 150);
        assert_eq!(p.step_delay_us(), 1000);
    }

    #[test]
    fn test_negative_move_wraps() {
        let mut p = planner();
        p.enqueue(-5);
        run_to_end(&mut p);
        assert_eq!(p.position(), 3195);
    }

    #[test]
    fn test_set_position_discards_pending() {
        let mut p = planner();
        p.enqueue(500);
        p.complete_step();
        p.set_position(-1);
        assert_eq!(p.position(), 3199);
        assert_eq!(p.remaining(), 0);
        assert_eq!(p.step_delay_us(), 1000);
    }

    #[test]
    fn test_direction_inversion() {
        let mut p = planner();
        p.enqueue(1);
        assert_eq!(p.next_step(), Some(Step { logical: 1, forward: true }));
        p.set_direction_invert(true);
        assert_eq!(p.next_step(), Some(Step { logical: 1, forward: false }));

        let mut p = planner();
        p.enqueue(-1);
        assert_eq!(p.next_step(), Some(Step { logical: -1, forward: false }));
        p.set_direction_invert(true);
        assert_eq!(p.next_step(), Some(Step { logical: -1, forward: true }));
        // Inversion never changes logical position tracking
        p.complete_step();
        assert_eq!(p.position(), 3199);
    }

    #[test]
    fn test_ramp_up_reaches_cruise() {
        let mut p = planner();
        p.enqueue(1000);
        assert_eq!(p.state(), MotionState::Accelerating);
        p.complete_step();
        assert_eq!(p.step_delay_us(), 990);
        for _ in 0..100 {
            p.complete_step();
        }
        assert_eq!(p.step_delay_us(), 300);
        assert_eq!(p.state(), MotionState::AtSpeed);
    }

    #[test]
    fn test_no_decel_without_hint() {
        let mut p = planner();
        p.enqueue(300);
        for _ in 0..299 {
            p.complete_step();
        }
        assert_eq!(p.remaining(), 1);
        assert_eq!(p.step_delay_us(), 300);
    }

    #[test]
    fn test_decel_interpolation() {
        let mut p = planner();
        p.set_distance_to_target(400);
        p.enqueue(400);
        // Advance to the window edge
        for _ in 0..200 {
            p.complete_step();
        }
        assert_eq!(p.remaining(), 200);
        assert_eq!(p.step_delay_us(), 300);
        assert_eq!(p.state(), MotionState::Decelerating);

        for _ in 0..100 {
            p.complete_step();
        }
        // Halfway through the window: 300 + 900 * 0.5
        assert_eq!(p.step_delay_us(), 750);

        for _ in 0..99 {
            p.complete_step();
        }
        assert_eq!(p.remaining(), 1);
        assert_eq!(p.step_delay_us(), 1195);
    }

    #[test]
    fn test_short_move_starts_inside_window() {
        let mut p = planner();
        p.set_distance_to_target(10);
        p.enqueue(10);
        // 300 + 900 * (1 - 10/200)
        assert_eq!(p.step_delay_us(), 1155);
    }

    #[test]
    fn test_committed_position() {
        let mut p = planner();
        p.set_position(3190);
        p.enqueue(20);
        assert_eq!(p.committed_position(), 10);
    }

    #[test]
    fn test_remaining_saturates() {
        let mut p = planner();
        p.enqueue(i32::MAX);
        p.enqueue(10);
        assert_eq!(p.remaining(), i32::MAX);
    }
}
