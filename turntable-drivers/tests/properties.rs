mod common;

use common::{profile, raw_for, turntable, MockAdc, MockGate, SimClock};
use proptest::prelude::*;
use turntable_core::angle::{angle_to_steps, wrap_steps};
use turntable_core::config::{SensorConfig, StorageConfig, TurntableConfig, UiConfig};
use turntable_core::menu::{ButtonEvent, TargetResolver};
use turntable_core::motion::Direction;
use turntable_core::settings::{SettingsRecord, RECORD_LEN};
use turntable_drivers::dial::{Phase, QuadratureDelta};
use turntable_drivers::sensor::AbsoluteAngleSensor;
use turntable_drivers::storage::PersistentStore;
use turntable_hal::RamStore;

const TURN: i32 = 3200;

proptest! {
    #[test]
    fn move_reaches_wrapped_target(start in 0i32..TURN, n in -2000i32..2000) {
        let clock = SimClock::default();
        let mut p = profile(&clock);
        p.begin().unwrap();
        p.set_position(start);
        p.move_by(n);

        let mut guard = 0u32;
        while p.remaining() != 0 && guard < 1_000_000 {
            p.update().unwrap();
            clock.advance_us(50);
            guard += 1;
        }
        prop_assert_eq!(p.remaining(), 0);
        prop_assert_eq!(p.position(), wrap_steps(start + n, TURN));
    }

    #[test]
    fn set_position_wraps_any_value(pos in any::<i32>()) {
        let clock = SimClock::default();
        let mut p = profile(&clock);
        p.set_position(pos);
        prop_assert_eq!(p.position(), wrap_steps(pos, TURN));
        prop_assert_eq!(p.remaining(), 0);
    }

    #[test]
    fn step_delays_follow_trapezoid(n in 1i32..1500) {
        let config = TurntableConfig::default().motion;
        let clock = SimClock::default();
        let mut p = profile(&clock);
        p.begin().unwrap();
        p.set_distance_to_target(n);
        p.move_by(n);

        let mut prev = p.step_delay_us();
        while p.remaining() != 0 {
            let rem = p.remaining().unsigned_abs();
            let delay = p.step_delay_us();
            prop_assert!(delay >= config.min_delay_us && delay <= config.max_delay_us);
            if rem > config.decel_start_steps {
                prop_assert!(delay <= prev);
            } else if rem < config.decel_start_steps {
                prop_assert!(delay >= prev);
            }
            prev = delay;
            clock.advance_us(delay as u64);
            prop_assert!(p.update().unwrap());
        }
    }

    #[test]
    fn dial_cycles_accumulate(turns in 0usize..50, reverse in any::<bool>()) {
        let dial = QuadratureDelta::new(MockGate::default());
        dial.begin();
        let a_leading = [
            (Phase::A, true, false),
            (Phase::B, true, true),
            (Phase::A, false, true),
            (Phase::B, false, false),
        ];
        let b_leading = [
            (Phase::B, false, true),
            (Phase::A, true, true),
            (Phase::B, true, false),
            (Phase::A, false, false),
        ];
        let cycle = if reverse { a_leading } else { b_leading };
        for _ in 0..turns {
            for (phase, a, b) in cycle {
                dial.on_edge(phase, a, b);
            }
        }
        let expected = 4 * turns as i32 * if reverse { -1 } else { 1 };
        prop_assert_eq!(dial.read(), expected);
        prop_assert_eq!(dial.read(), 0);
        prop_assert!(!dial.gate().masked.get());
    }

    #[test]
    fn zeroed_sensor_reads_zero(degrees in 0.0f32..359.0) {
        let adc = MockAdc::new(raw_for(degrees));
        let mut sensor: AbsoluteAngleSensor<_> =
            AbsoluteAngleSensor::new(adc, SensorConfig::default());
        let mut clock = SimClock::default();
        sensor.set_zero(&mut clock);
        let angle = sensor.read_angle();
        prop_assert!(angle < 1.0 || angle > 359.0);
    }

    #[test]
    fn settings_survive_save_and_load(
        position in 0i32..=TURN,
        ccw in any::<bool>(),
        zero in any::<i32>(),
    ) {
        let direction = if ccw { Direction::CounterClockwise } else { Direction::Clockwise };
        let mut store = PersistentStore::new(RamStore::<64>::new(), StorageConfig::default());
        store.save_settings(position, direction, zero).unwrap();
        prop_assert_eq!(
            store.load_settings(),
            SettingsRecord::new(position, direction, zero)
        );
    }

    #[test]
    fn restored_pose_holds_through_reboot(
        zero in 0i32..TURN,
        angle in 0u16..359,
        sensor_deg in 0u16..360,
    ) {
        let position = wrap_steps(zero + angle_to_steps(angle, TURN), TURN);
        let mut store = PersistentStore::new(RamStore::<64>::new(), StorageConfig::default());
        store.save_settings(position, Direction::Clockwise, zero).unwrap();

        let (mut device, rig) = turntable(sensor_deg as f32, store.into_inner());
        device.begin().unwrap();
        for _ in 0..50 {
            device.poll(0, []).unwrap();
            rig.clock.advance_ms(10);
        }
        let status = device.status();
        prop_assert_eq!(status.target_angle, angle);
        prop_assert_eq!(status.position, position);
        prop_assert_eq!(rig.step.rises.get(), 0);
    }

    #[test]
    fn flipped_byte_restores_defaults(
        position in 0i32..=TURN,
        zero in any::<i32>(),
        index in 0usize..RECORD_LEN,
        bit in 0u8..8,
    ) {
        let mut store = PersistentStore::new(RamStore::<64>::new(), StorageConfig::default());
        store.save_settings(position, Direction::CounterClockwise, zero).unwrap();
        store.store_mut().bytes_mut()[index] ^= 1 << bit;
        prop_assert_eq!(store.load_settings(), SettingsRecord::default());
    }
}

#[test]
fn dial_single_cycle_reads_minus_four_then_zero() {
    let dial = QuadratureDelta::new(MockGate::default());
    dial.begin();
    dial.on_edge(Phase::A, true, false);
    dial.on_edge(Phase::B, true, true);
    dial.on_edge(Phase::A, false, true);
    dial.on_edge(Phase::B, false, false);
    assert_eq!(dial.read(), -4);
    assert_eq!(dial.read(), 0);
}

#[test]
fn save_load_reference_record() {
    let mut store = PersistentStore::new(RamStore::<64>::new(), StorageConfig::default());
    store
        .save_settings(500, Direction::CounterClockwise, 200)
        .unwrap();
    assert_eq!(
        store.load_settings(),
        SettingsRecord::new(500, Direction::CounterClockwise, 200)
    );

    store.store_mut().bytes_mut()[2] ^= 0x40;
    assert_eq!(
        store.load_settings(),
        SettingsRecord::new(0, Direction::Clockwise, 0)
    );
}

#[test]
fn ninety_degrees_is_eight_hundred_steps() {
    assert_eq!(angle_to_steps(90, TURN), 800);
}

#[test]
fn main_menu_five_ticks_lands_on_item_one() {
    let mut resolver = TargetResolver::new(TURN, &UiConfig::default());
    resolver.handle_button(ButtonEvent::EncoderClick, 0);
    let mut now = 0;
    for _ in 0..5 {
        now += 150;
        resolver.handle_dial(1, now);
    }
    assert_eq!(resolver.current_item_index(), 1);
}

#[test]
fn position_reached_tolerance() {
    let mut resolver = TargetResolver::new(TURN, &UiConfig::default());
    resolver.update_target_angle(90);
    assert_eq!(resolver.target_position(), 800);
    assert!(resolver.is_position_reached(798, 1));
    assert!(!resolver.is_position_reached(790, 0));
}
