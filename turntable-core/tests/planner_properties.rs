use proptest::prelude::*;
use turntable_core::angle::{angle_to_steps, steps_to_angle, wrap_steps};
use turntable_core::config::MotionConfig;
use turntable_core::motion::{Direction, StepPlanner};
use turntable_core::settings::{RecordError, SettingsRecord, RECORD_LEN};

const TURN: i32 = 3200;

proptest! {
    #[test]
    fn set_position_always_wraps(p in any::<i32>()) {
        let mut planner = StepPlanner::new(MotionConfig::default(), TURN);
        planner.set_position(p);
        prop_assert_eq!(planner.position(), wrap_steps(p, TURN));
        prop_assert!((0..TURN).contains(&planner.position()));
    }

    #[test]
    fn move_lands_on_wrapped_target(start in any::<i32>(), n in -5000i32..5000) {
        let mut planner = StepPlanner::new(MotionConfig::default(), TURN);
        planner.set_position(start);
        let initial = planner.position();
        planner.enqueue(n);
        while planner.complete_step().is_some() {}
        prop_assert_eq!(planner.remaining(), 0);
        prop_assert_eq!(planner.position(), wrap_steps(initial + n, TURN));
    }

    #[test]
    fn delay_profile_is_trapezoidal(n in 1i32..2000, negative in any::<bool>()) {
        let config = MotionConfig::default();
        let n = if negative { -n } else { n };
        let mut planner = StepPlanner::new(config, TURN);
        planner.set_distance_to_target(n);
        planner.enqueue(n);

        let mut prev = planner.step_delay_us();
        while planner.remaining() != 0 {
            let rem = planner.remaining().unsigned_abs();
            let delay = planner.step_delay_us();
            prop_assert!(delay >= config.min_delay_us && delay <= config.max_delay_us);
            if rem > config.decel_start_steps {
                prop_assert!(delay <= prev);
            } else if rem < config.decel_start_steps {
                prop_assert!(delay >= prev);
            }
            prev = delay;
            planner.complete_step();
        }
    }

    #[test]
    fn whole_degrees_round_trip(a in 0u16..360) {
        prop_assert_eq!(steps_to_angle(angle_to_steps(a, TURN), TURN), a);
    }

    #[test]
    fn any_single_byte_flip_rejected(
        position in any::<i32>(),
        ccw in any::<bool>(),
        zero in any::<i32>(),
        index in 0usize..RECORD_LEN,
        mask in 1u8..=255,
    ) {
        let direction = if ccw { Direction::CounterClockwise } else { Direction::Clockwise };
        let mut bytes = SettingsRecord::new(position, direction, zero).to_bytes();
        bytes[index] ^= mask;
        let is_checksum_mismatch = matches!(
            SettingsRecord::from_bytes(&bytes),
            Err(RecordError::ChecksumMismatch { .. })
        );
        prop_assert!(is_checksum_mismatch);
    }
}
