//! Turntable control loop
//!
//! One [`Turntable::poll`] is one iteration of the cooperative main loop:
//!
//! ```text
//!  buttons + dial delta ──> TargetResolver ──> target position
//!                                                   │
//!  sensor (time gated) ──> update_target_angle ─────┤
//!                                                   ▼
//!                            delta = target - (position + remaining)
//!                                                   │
//!                                        MotionProfile::move_by(delta)
//!                                                   │
//!                                        MotionProfile::update()  (every poll)
//! ```
//!
//! The dial accumulator is not owned here; the caller drains it and passes
//! the delta in, which keeps the interrupt-shared state out of this type.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use turntable_core::angle::steps_to_angle;
use turntable_core::config::TurntableConfig;
use turntable_core::menu::{ButtonEvent, DigitMode, Screen, TargetResolver};
use turntable_core::motion::{Direction, MotionState};
use turntable_hal::{AnalogInput, ByteStore, Clock, StoreError};

use crate::sensor::{AbsoluteAngleSensor, DEFAULT_FILTER_SAMPLES};
use crate::stepper::{MotionError, MotionProfile};
use crate::storage::{Loaded, PersistentStore};

/// Failures that reach the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TurntableError {
    Motion(MotionError),
    Store(StoreError),
}

impl From<MotionError> for TurntableError {
    fn from(e: MotionError) -> Self {
        TurntableError::Motion(e)
    }
}

impl From<StoreError> for TurntableError {
    fn from(e: StoreError) -> Self {
        TurntableError::Store(e)
    }
}

/// Snapshot of the device state for display and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub screen: Screen,
    pub current_item: u8,
    pub digit_mode: DigitMode,
    pub direction: Direction,
    pub target_angle: u16,
    pub target_position: i32,
    pub position: i32,
    pub remaining: i32,
    pub motion: MotionState,
    pub position_reached: bool,
    pub manual_override: bool,
    pub running: bool,
    pub enabled: bool,
    pub zero_offset: i32,
    pub sensor_angle: Option<u16>,
}

/// The assembled turntable
pub struct Turntable<STEP, DIR, EN, T, A, S, const N: usize = DEFAULT_FILTER_SAMPLES> {
    motion: MotionProfile<STEP, DIR, EN, T>,
    sensor: AbsoluteAngleSensor<A, N>,
    resolver: TargetResolver,
    store: PersistentStore<S>,
    running: bool,
}

impl<STEP, DIR, EN, T, A, S, const N: usize> Turntable<STEP, DIR, EN, T, A, S, N>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    T: Clock + DelayNs,
    A: AnalogInput,
    S: ByteStore,
{
    pub fn new(
        motion: MotionProfile<STEP, DIR, EN, T>,
        sensor: AbsoluteAngleSensor<A, N>,
        store: PersistentStore<S>,
        config: &TurntableConfig,
    ) -> Self {
        Self {
            resolver: TargetResolver::new(config.steps_360(), &config.ui),
            motion,
            sensor,
            store,
            running: true,
        }
    }

    /// Restore persisted settings and bring up the hardware
    ///
    /// Returns what was loaded, including why defaults were substituted.
    pub fn begin(&mut self) -> Result<Loaded, TurntableError> {
        let loaded = self.store.load();
        let record = loaded.record;

        self.motion.begin()?;
        self.motion.set_position(record.position);
        self.resolver.set_direction(record.direction);
        self.resolver.set_zero_offset(record.zero_offset);
        self.apply_direction();

        self.sensor.begin();
        if loaded.fault.is_none() {
            // A sensor zero is not persisted; make the current pose read as
            // the angle the restored position stands for
            let steps_360 = self.motion.steps_360();
            let home = (self.motion.position() as i64 - record.zero_offset as i64)
                .rem_euclid(steps_360 as i64) as i32;
            self.sensor.align_to(steps_to_angle(home, steps_360));
        }
        if let Some(angle) = self.sensor.last_angle() {
            self.resolver.update_target_angle(angle);
        }
        self.running = true;
        Ok(loaded)
    }

    /// One main loop iteration
    pub fn poll<I>(&mut self, dial_delta: i32, events: I) -> Result<(), TurntableError>
    where
        I: IntoIterator<Item = ButtonEvent>,
    {
        let now_ms = self.motion.timer().now_ms();

        for event in events {
            self.handle_event(event, now_ms)?;
        }
        if dial_delta != 0 {
            self.resolver.handle_dial(dial_delta, now_ms);
        }
        self.apply_direction();

        if self.sensor.has_changed(now_ms) {
            if let Some(angle) = self.sensor.last_angle() {
                self.resolver.update_target_angle(angle);
            }
        }

        let saved = if self.resolver.take_save_request() {
            self.save()
        } else {
            Ok(())
        };

        if self.running {
            let delta = self.target_delta();
            if delta != 0 {
                self.motion.set_distance_to_target(delta);
                self.motion.move_by(delta);
            }
        }

        // Motion keeps going even if the save failed
        self.motion.update()?;
        saved
    }

    fn handle_event(&mut self, event: ButtonEvent, now_ms: u64) -> Result<(), TurntableError> {
        match event {
            e if e.is_menu_event() => {
                self.resolver.handle_button(e, now_ms);
            }
            ButtonEvent::StartStop => self.set_running(!self.running)?,
            ButtonEvent::SetZero => self.set_zero(),
            ButtonEvent::FineStep => self.resolver.nudge_zero_offset(1),
            _ => {}
        }
        Ok(())
    }

    /// Signed move from the committed position to the target
    fn target_delta(&self) -> i32 {
        self.resolver.target_position() - self.motion.committed_position()
    }

    fn apply_direction(&mut self) {
        let invert = self.resolver.selected_direction().is_inverted();
        self.motion.set_direction_invert(invert);
    }

    /// Start or stop tracking
    ///
    /// Stopping discards pending steps and releases the motor.
    pub fn set_running(&mut self, running: bool) -> Result<(), TurntableError> {
        if running == self.running {
            return Ok(());
        }
        if !running {
            self.motion.stop();
        }
        self.motion.set_enabled(running)?;
        self.running = running;
        Ok(())
    }

    /// Make the current pose angle zero without moving
    pub fn set_zero(&mut self) {
        self.sensor.set_zero(self.motion.timer_mut());
        self.resolver.set_zero_offset(self.motion.committed_position());
        self.resolver.reset_manual_override();
        if let Some(angle) = self.sensor.last_angle() {
            self.resolver.update_target_angle(angle);
        }
    }

    /// Persist position, direction and zero offset
    pub fn save(&mut self) -> Result<(), TurntableError> {
        self.store.save_settings(
            self.motion.position(),
            self.resolver.selected_direction(),
            self.resolver.zero_offset(),
        )?;
        Ok(())
    }

    pub fn status(&self) -> Status {
        let position = self.motion.position();
        let remaining = self.motion.remaining();
        Status {
            screen: self.resolver.screen(),
            current_item: self.resolver.current_item_index(),
            digit_mode: self.resolver.digit_mode(),
            direction: self.resolver.selected_direction(),
            target_angle: self.resolver.target_angle(),
            target_position: self.resolver.target_position(),
            position,
            remaining,
            motion: self.motion.state(),
            position_reached: self.resolver.is_position_reached(position, remaining),
            manual_override: self.resolver.manual_override(),
            running: self.running,
            enabled: self.motion.is_enabled(),
            zero_offset: self.resolver.zero_offset(),
            sensor_angle: self.sensor.last_angle(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn resolver(&self) -> &TargetResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut TargetResolver {
        &mut self.resolver
    }

    pub fn motion(&self) -> &MotionProfile<STEP, DIR, EN, T> {
        &self.motion
    }

    pub fn sensor_mut(&mut self) -> &mut AbsoluteAngleSensor<A, N> {
        &mut self.sensor
    }

    pub fn store_mut(&mut self) -> &mut PersistentStore<S> {
        &mut self.store
    }
}
