#[cfg(test)]
mod proptest_engine {
    use crate::command::DriverCommand;
    use crate::engine::Engine;
    use proptest::prelude::*;

    fn command() -> impl Strategy<Value = DriverCommand> {
        prop_oneof![
            Just(DriverCommand::StartEngine),
            Just(DriverCommand::StopEngine),
            (-0.5f64..1.5).prop_map(DriverCommand::Throttle),
            (-0.5f64..1.5).prop_map(DriverCommand::Brake),
            Just(DriverCommand::ShiftUp),
            Just(DriverCommand::ShiftDown),
            Just(DriverCommand::ToggleClutch),
            (-3i32..10).prop_map(DriverCommand::SetGear),
            (0.0f64..15000.0).prop_map(DriverCommand::RevLimiter),
            (-5.0f64..40.0).prop_map(DriverCommand::BoostPressure),
            Just(DriverCommand::ResetSession),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        // Property: published state stays inside its physical bounds after every tick
        #[test]
        fn bounds_hold_for_any_input_sequence(
            steps in prop::collection::vec(
                (prop::option::of(command()), 0.0f64..=0.1, 1usize..20),
                1..60,
            ),
        ) {
            let mut engine = Engine::new();
            for (command, dt, repeats) in steps {
                if let Some(command) = command {
                    engine.apply(command);
                }
                for _ in 0..repeats {
                    engine.update(dt);
                    let s = engine.state();
                    prop_assert!(s.rpm >= 0.0 && s.rpm <= s.redline_rpm, "rpm {} redline {}", s.rpm, s.redline_rpm);
                    prop_assert!(s.boost >= 0.0 && s.boost <= s.max_boost, "boost {} max {}", s.boost, s.max_boost);
                    prop_assert!((0.0..=100.0).contains(&s.fuel_level), "fuel {}", s.fuel_level);
                    prop_assert!(s.speed >= 0.0, "speed {}", s.speed);
                    prop_assert!((0.0..=25.0).contains(&s.max_boost));
                    prop_assert!((3000.0..=12000.0).contains(&s.redline_rpm));
                    prop_assert!((-1..=6).contains(&s.gear));
                    prop_assert!(s.shift_timer >= 0.0);
                    prop_assert!(s.torque >= 0.0 && s.power >= 0.0);
                }
            }
        }

        // Property: distance, runtime and wear never decrease without a reset
        #[test]
        fn accumulators_are_monotonic(
            throttles in prop::collection::vec(0.0f64..=1.0, 1..40),
            dt in 0.001f64..=0.1,
        ) {
            let mut engine = Engine::new();
            engine.start_engine();
            engine.set_gear(1);
            let mut previous = engine.snapshot();
            for throttle in throttles {
                engine.set_throttle(throttle);
                for _ in 0..10 {
                    engine.update(dt);
                    let s = engine.snapshot();
                    prop_assert!(s.total_distance >= previous.total_distance);
                    prop_assert!(s.runtime >= previous.runtime);
                    prop_assert!(s.engine_wear >= previous.engine_wear);
                    prop_assert!(s.fuel_level <= previous.fuel_level);
                    previous = s;
                }
            }
        }

        // Property: a second shift request inside the lockout window never lands
        #[test]
        fn lockout_rejects_rapid_second_shift(
            gap in 0.0f64..0.19,
        ) {
            let mut engine = Engine::new();
            engine.start_engine();
            prop_assert!(engine.shift_up());
            engine.update(gap);
            prop_assert!(!engine.shift_up());
            prop_assert_eq!(engine.current_gear(), 1);
        }
    }
}
