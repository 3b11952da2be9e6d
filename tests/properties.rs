//! Property tests for motion planning and execution.

mod common;

use common::{Rig, SimAxis};
use proptest::prelude::*;
use stepper_supervisor::config::{AxisConfig, Microsteps, TimingConfig};
use stepper_supervisor::motion::profile::{decel_start, StepTiming};
use stepper_supervisor::MotionState;

fn microsteps() -> impl Strategy<Value = Microsteps> {
    prop_oneof![
        Just(Microsteps::FULL),
        Just(Microsteps::HALF),
        Just(Microsteps::QUARTER),
        Just(Microsteps::EIGHTH),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every accepted move ends exactly on its target, relaxed.
    #[test]
    fn move_lands_on_target(
        micro in microsteps(),
        start in -2_000i32..2_000,
        target in -2_000i32..2_000,
        max_speed in 500u32..3_000,
        acceleration in 1_000u32..10_000,
    ) {
        let config = AxisConfig::new(micro, max_speed, 100, acceleration, 5_000);
        let mut rig = Rig::single(config, SimAxis::new());
        rig.ctrl.set_position(0, start).unwrap();

        rig.ctrl.move_to(0, target).unwrap();
        prop_assert!(rig.run_until_idle(60_000));
        prop_assert_eq!(rig.position(0), target);
        prop_assert_eq!(rig.state(0), MotionState::Relax);
        prop_assert_eq!(
            rig.hw(0).pulses,
            (target - start).unsigned_abs() as u64 * micro.value() as u64
        );
    }
}

proptest! {
    /// Braking starts between the start and the target, at most one ramp before the target.
    #[test]
    fn decel_start_within_move(
        from in -100_000i32..100_000,
        to in -100_000i32..100_000,
        accdec in 0i32..10_000,
    ) {
        let start = decel_start(from, to, accdec);
        prop_assert!(start >= from.min(to) && start <= from.max(to));
        prop_assert!((to as i64 - start as i64).abs() <= accdec.max((to - from).abs()) as i64);
    }

    /// The achieved speed never exceeds the timer's fastest rate and the period stays in range.
    #[test]
    fn period_stays_in_range(speed in 0u32..1_000_000, shift in 0u8..=8) {
        let config = TimingConfig::default();
        let timing = StepTiming::from_config(&config);
        let (period, achieved) = timing.period_for(speed, shift);
        prop_assert!(period >= config.min_period && period <= config.max_period);
        prop_assert_eq!(achieved, timing.speed_of(period, shift));
    }
}
