//! Host-side stand-ins for the turntable hardware

#![allow(dead_code)]

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use turntable_core::config::TurntableConfig;
use turntable_drivers::sensor::AbsoluteAngleSensor;
use turntable_drivers::stepper::MotionProfile;
use turntable_drivers::storage::PersistentStore;
use turntable_drivers::Turntable;
use turntable_hal::{AnalogInput, ByteStore, Clock, InterruptGate, RamStore, StoreError};

/// Output pin that remembers its level and counts rising edges
#[derive(Clone, Default)]
pub struct MockPin {
    pub high: Rc<Cell<bool>>,
    pub rises: Rc<Cell<u32>>,
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        if !self.high.get() {
            self.rises.set(self.rises.get() + 1);
        }
        self.high.set(true);
        Ok(())
    }
}

/// Simulated microsecond clock; busy-waits advance simulated time
#[derive(Clone, Default)]
pub struct SimClock {
    pub now_us: Rc<Cell<u64>>,
}

impl SimClock {
    pub fn advance_us(&self, us: u64) {
        self.now_us.set(self.now_us.get() + us);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1000);
    }
}

impl Clock for SimClock {
    fn now_us(&self) -> u64 {
        self.now_us.get()
    }
}

impl DelayNs for SimClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance_us((ns as u64).div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.advance_us(us as u64);
    }
}

/// 12-bit ADC whose reading the test can change
#[derive(Clone)]
pub struct MockAdc {
    pub raw: Rc<Cell<u16>>,
}

impl MockAdc {
    pub fn new(raw: u16) -> Self {
        Self {
            raw: Rc::new(Cell::new(raw)),
        }
    }

    /// Set the reading that corresponds to `degrees`
    pub fn set_degrees(&self, degrees: f32) {
        self.raw.set(raw_for(degrees));
    }
}

impl AnalogInput for MockAdc {
    fn read_raw(&mut self) -> u16 {
        self.raw.get()
    }

    fn max_raw(&self) -> u16 {
        4095
    }
}

/// Raw 12-bit sample for an angle, centred in its whole degree
pub fn raw_for(degrees: f32) -> u16 {
    ((degrees + 0.5) / 360.0 * 4095.0).round() as u16
}

/// Interrupt gate that records whether it is masked
#[derive(Default)]
pub struct MockGate {
    pub masked: Cell<bool>,
}

impl InterruptGate for MockGate {
    fn mask(&self) {
        self.masked.set(true);
    }

    fn unmask(&self) {
        self.masked.set(false);
    }
}

/// Store that reads normally but rejects every write
#[derive(Clone, Default)]
pub struct ReadOnlyStore {
    pub inner: RamStore<64>,
    pub rejected: Rc<Cell<u32>>,
}

impl ByteStore for ReadOnlyStore {
    fn get(&mut self, address: u32, buf: &mut [u8]) -> Result<(), StoreError> {
        self.inner.get(address, buf)
    }

    fn put(&mut self, _address: u32, _data: &[u8]) -> Result<(), StoreError> {
        self.rejected.set(self.rejected.get() + 1);
        Err(StoreError::Write)
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }
}

pub type TestProfile = MotionProfile<MockPin, MockPin, MockPin, SimClock>;
pub type Device<S> = Turntable<MockPin, MockPin, MockPin, SimClock, MockAdc, S>;
pub type TestTurntable = Device<RamStore<64>>;

/// Handles the test keeps after the hardware is moved into the device
pub struct Rig {
    pub clock: SimClock,
    pub step: MockPin,
    pub dir: MockPin,
    pub enable: MockPin,
    pub adc: MockAdc,
}

pub fn profile(clock: &SimClock) -> TestProfile {
    let config = TurntableConfig::default();
    MotionProfile::new(
        MockPin::default(),
        MockPin::default(),
        MockPin::default(),
        clock.clone(),
        config.motion,
        config.steps_360(),
    )
}

/// Build a turntable with the sensor at `degrees` and the given store contents
pub fn turntable(degrees: f32, store: RamStore<64>) -> (TestTurntable, Rig) {
    turntable_on(degrees, store)
}

/// Like [`turntable`], over any byte store
pub fn turntable_on<S: ByteStore>(degrees: f32, store: S) -> (Device<S>, Rig) {
    let config = TurntableConfig::default();
    let rig = Rig {
        clock: SimClock::default(),
        step: MockPin::default(),
        dir: MockPin::default(),
        enable: MockPin::default(),
        adc: MockAdc::new(raw_for(degrees)),
    };

    let motion = MotionProfile::new(
        rig.step.clone(),
        rig.dir.clone(),
        rig.enable.clone(),
        rig.clock.clone(),
        config.motion,
        config.steps_360(),
    );
    let sensor = AbsoluteAngleSensor::new(rig.adc.clone(), config.sensor);
    let store = PersistentStore::new(store, config.storage);

    (Turntable::new(motion, sensor, store, &config), rig)
}

/// Poll with no input, advancing `tick_us` per iteration, until the motor is
/// idle and on target or `max_iterations` is exhausted
pub fn settle(device: &mut TestTurntable, clock: &SimClock, tick_us: u64, max_iterations: u32) {
    for _ in 0..max_iterations {
        device.poll(0, []).unwrap();
        let status = device.status();
        if status.remaining == 0 && status.position_reached {
            return;
        }
        clock.advance_us(tick_us);
    }
}
