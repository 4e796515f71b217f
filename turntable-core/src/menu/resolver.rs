//! Target resolution
//!
//! Turns dial deltas, button events and absolute sensor readings into the
//! target angle and target step position the motor follows. The resolver
//! only reads motion state; it never drives the motor itself.

use super::events::{ButtonEvent, MenuEvent};
use super::machine::{DigitMode, MainItem, Screen, ITEM_COUNT};
use crate::angle::{angle_distance, angle_to_steps, offset_steps, wrap_steps, FULL_TURN_DEG};
use crate::config::UiConfig;
use crate::motion::Direction;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a manually entered target angle gives way to the sensor again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OverridePolicy {
    /// Only [`TargetResolver::reset_manual_override`] clears the override
    #[default]
    ExplicitReset,
    /// The override clears itself once the sensor has moved more than
    /// `threshold_deg` from the angle it last reported while tracking
    AutoClearOnDrift { threshold_deg: u16 },
}

impl OverridePolicy {
    /// Drift threshold of the auto-clear policy
    pub const DEFAULT_DRIFT_DEG: u16 = 5;

    pub const fn auto_clear() -> Self {
        OverridePolicy::AutoClearOnDrift {
            threshold_deg: Self::DEFAULT_DRIFT_DEG,
        }
    }
}

/// Menu navigation plus target angle/position bookkeeping
#[derive(Debug, Clone)]
pub struct TargetResolver {
    screen: Screen,
    current_item: u8,
    target_angle: u16,
    target_position: i32,
    manual_override: bool,
    digit_mode: DigitMode,
    selected_direction: Direction,
    zero_offset: i32,
    should_save: bool,
    /// Time of the last navigation change, `None` until the first one
    last_change_ms: Option<u64>,
    /// Sensor angle the override drift is measured from
    drift_reference: Option<u16>,
    steps_360: i32,
    change_delay_ms: u32,
    reach_tolerance: u32,
    policy: OverridePolicy,
}

impl TargetResolver {
    pub fn new(steps_360: i32, ui: &UiConfig) -> Self {
        Self {
            screen: Screen::Splash,
            current_item: 0,
            target_angle: 0,
            target_position: 0,
            manual_override: false,
            digit_mode: DigitMode::Units,
            selected_direction: Direction::Clockwise,
            zero_offset: 0,
            should_save: false,
            last_change_ms: None,
            drift_reference: None,
            steps_360,
            change_delay_ms: ui.menu_change_delay_ms,
            reach_tolerance: ui.reach_tolerance_steps,
            policy: ui.override_policy,
        }
    }

    /// Handle a menu button event
    ///
    /// Events that are not menu events (see [`ButtonEvent::is_menu_event`])
    /// are ignored and reported as not consumed.
    pub fn handle_button(&mut self, event: ButtonEvent, now_ms: u64) -> bool {
        match event {
            ButtonEvent::EncoderClick => self.click(now_ms),
            ButtonEvent::EncoderLongPress => self.long_press(now_ms),
            ButtonEvent::DigitMode => {
                if self.screen == Screen::SetAngle {
                    self.digit_mode = self.digit_mode.next();
                }
            }
            _ => return false,
        }
        true
    }

    fn click(&mut self, now_ms: u64) {
        let event = match self.screen {
            Screen::Splash => MenuEvent::Open,
            Screen::Main => MenuEvent::Select(self.current_item()),
            Screen::SetAngle | Screen::Settings | Screen::Save => MenuEvent::Confirm,
        };

        match self.screen {
            Screen::Splash => {}
            Screen::SetAngle => self.engage_override(),
            Screen::Save => self.should_save = true,
            Screen::Main | Screen::Settings => {}
        }

        self.goto(self.screen.transition(event));
        self.last_change_ms = Some(now_ms);
    }

    fn long_press(&mut self, now_ms: u64) {
        if self.screen == Screen::Splash {
            return;
        }
        self.goto(self.screen.transition(MenuEvent::Back));
        self.last_change_ms = Some(now_ms);
    }

    fn goto(&mut self, screen: Screen) {
        if matches!(screen, Screen::Splash | Screen::Main) && screen != self.screen {
            self.current_item = 0;
        }
        self.screen = screen;
    }

    /// Apply a signed dial delta to the current screen
    ///
    /// Only the sign matters; changes are rate-limited to one per
    /// `menu_change_delay_ms`.
    pub fn handle_dial(&mut self, delta: i32, now_ms: u64) {
        if delta == 0 || !self.navigation_ready(now_ms) {
            return;
        }
        let sign: i32 = if delta > 0 { 1 } else { -1 };

        match self.screen {
            Screen::Splash | Screen::Save => return,
            Screen::Main => {
                let count = ITEM_COUNT as i32;
                self.current_item = (self.current_item as i32 + sign).rem_euclid(count) as u8;
            }
            Screen::SetAngle => {
                let step = sign * self.digit_mode.step();
                let angle = (self.target_angle as i32 + step).rem_euclid(FULL_TURN_DEG as i32);
                self.target_angle = angle as u16;
                self.recompute_target();
                self.engage_override();
            }
            Screen::Settings => {
                self.selected_direction = self.selected_direction.opposite();
            }
        }
        self.last_change_ms = Some(now_ms);
    }

    fn navigation_ready(&self, now_ms: u64) -> bool {
        self.last_change_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= self.change_delay_ms as u64)
    }

    /// Feed a new integer sensor angle
    ///
    /// No-op while the SetAngle screen is open. Without a manual override
    /// the target follows the sensor; with one, the manual angle is kept
    /// and only the target position is recomputed.
    pub fn update_target_angle(&mut self, sensor_angle: u16) {
        if self.screen == Screen::SetAngle {
            return;
        }

        if self.manual_override {
            if let OverridePolicy::AutoClearOnDrift { threshold_deg } = self.policy {
                match self.drift_reference {
                    Some(reference) if angle_distance(reference, sensor_angle) > threshold_deg => {
                        self.manual_override = false;
                    }
                    Some(_) => {}
                    None => self.drift_reference = Some(sensor_angle),
                }
            }
            if self.manual_override {
                self.recompute_target();
                return;
            }
        }

        self.target_angle = sensor_angle;
        self.drift_reference = Some(sensor_angle);
        self.recompute_target();
    }

    /// Set the target angle directly (clamped to 360°) and engage the override
    pub fn set_target_angle(&mut self, angle: u16) {
        self.target_angle = angle.min(FULL_TURN_DEG);
        self.recompute_target();
        self.engage_override();
    }

    /// Resume sensor-driven tracking
    pub fn reset_manual_override(&mut self) {
        self.manual_override = false;
    }

    /// Step position corresponding to angle 0
    pub fn set_zero_offset(&mut self, steps: i32) {
        self.zero_offset = wrap_steps(steps, self.steps_360);
        self.recompute_target();
    }

    /// Shift the zero offset by a signed number of steps
    pub fn nudge_zero_offset(&mut self, steps: i32) {
        let offset = offset_steps(self.zero_offset, steps, self.steps_360);
        self.set_zero_offset(offset);
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.selected_direction = direction;
    }

    /// Whether the committed motor position is within tolerance of the target
    pub fn is_position_reached(&self, current_pos: i32, remaining: i32) -> bool {
        let effective = current_pos as i64 + remaining as i64;
        effective.abs_diff(self.target_position as i64) < self.reach_tolerance as u64
    }

    /// Consume a pending save request
    pub fn take_save_request(&mut self) -> bool {
        core::mem::take(&mut self.should_save)
    }

    fn engage_override(&mut self) {
        self.manual_override = true;
    }

    fn recompute_target(&mut self) {
        let steps = angle_to_steps(self.target_angle, self.steps_360);
        self.target_position = offset_steps(self.zero_offset, steps, self.steps_360);
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn current_item(&self) -> MainItem {
        MainItem::from_index(self.current_item)
    }

    pub fn current_item_index(&self) -> u8 {
        self.current_item
    }

    pub fn target_angle(&self) -> u16 {
        self.target_angle
    }

    pub fn target_position(&self) -> i32 {
        self.target_position
    }

    pub fn manual_override(&self) -> bool {
        self.manual_override
    }

    pub fn digit_mode(&self) -> DigitMode {
        self.digit_mode
    }

    pub fn selected_direction(&self) -> Direction {
        self.selected_direction
    }

    pub fn zero_offset(&self) -> i32 {
        self.zero_offset
    }

    pub fn should_save(&self) -> bool {
        self.should_save
    }
}
