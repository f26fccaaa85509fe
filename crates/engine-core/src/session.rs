//! Road speed, distance, wear and launch timing for the current session.

use crate::gearbox::{gear_ratio, FINAL_DRIVE};
use crate::revs::IDLE_THROTTLE;
use crate::state::{EngineState, FULL_TANK_PCT};
use log::debug;
use std::f64::consts::PI;

pub const WHEEL_DIAMETER_M: f64 = 0.65;
/// km/h shed per second at full brake.
pub const BRAKE_DECEL_KMH_S: f64 = 50.0;
/// A launch can only start below this speed.
pub const LAUNCH_ARM_KMH: f64 = 10.0;
pub const LAUNCH_TARGET_KMH: f64 = 100.0;
pub const QUARTER_MILE_KM: f64 = 0.402;
pub const MAX_WEAR_PCT: f64 = 100.0;

/// Road speed in km/h implied by engine rpm in a forward gear.
pub fn road_speed(rpm: f64, gear: i8) -> Option<f64> {
    gear_ratio(gear)
        .map(|ratio| rpm * WHEEL_DIAMETER_M * PI * 60.0 / (1000.0 * ratio * FINAL_DRIVE))
}

pub fn update_speed(state: &mut EngineState, dt: f64) {
    if state.gear > 0 && state.clutch_engaged && state.is_running {
        if let Some(speed) = road_speed(state.rpm, state.gear) {
            state.speed = speed;
        }
    }
    state.speed = (state.speed - state.brake * BRAKE_DECEL_KMH_S * dt).max(0.0);
    if state.speed > 0.0 {
        state.total_distance += state.speed * dt / 3600.0;
    }
}

pub fn update_wear(state: &mut EngineState, dt: f64) {
    if !state.is_running {
        return;
    }
    let mut wear = 0.001 * dt;
    if state.rpm > state.redline_rpm * 0.9 {
        wear *= 3.0;
    }
    if state.oil_temp > 110.0 {
        wear *= 2.0;
    }
    if state.coolant_temp > 100.0 {
        wear *= 2.5;
    }
    if state.max_boost > 0.0 && state.boost > state.max_boost * 0.9 {
        wear *= 1.5;
    }
    state.engine_wear = (state.engine_wear + wear).min(MAX_WEAR_PCT);
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Launch {
    elapsed: f64,
    distance: f64,
    reached_100: bool,
    reached_quarter_mile: bool,
}

/// Times 0-100 km/h and the quarter mile from a standing start.
///
/// A launch arms when the throttle is open in a forward gear with the clutch
/// engaged and the car (nearly) stopped. It aborts if the throttle is lifted,
/// the drive is decoupled or the engine stops before both marks are reached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchTimer {
    active: Option<Launch>,
}

impl LaunchTimer {
    pub fn is_timing(&self) -> bool {
        self.active.is_some()
    }

    pub fn reset(&mut self) {
        self.active = None;
    }

    pub fn track(&mut self, state: &mut EngineState, speed_before: f64, dt: f64) {
        let throttle_open = state.throttle >= IDLE_THROTTLE;
        let driving = state.is_running && state.gear > 0 && state.clutch_engaged;
        if self.active.is_none() {
            if !(driving && throttle_open && speed_before < LAUNCH_ARM_KMH) {
                return;
            }
            debug!("launch timer armed at {:.1} km/h", speed_before);
            self.active = Some(Launch::default());
        }
        if !driving || !throttle_open {
            debug!("launch aborted");
            self.active = None;
            return;
        }
        let Some(launch) = self.active.as_mut() else {
            return;
        };

        launch.elapsed += dt;
        launch.distance += state.speed * dt / 3600.0;

        if !launch.reached_100 && state.speed >= LAUNCH_TARGET_KMH {
            launch.reached_100 = true;
            record_best(&mut state.best_0_to_100, launch.elapsed);
            debug!("0-100 km/h in {:.2}s", launch.elapsed);
        }
        if !launch.reached_quarter_mile && launch.distance >= QUARTER_MILE_KM {
            launch.reached_quarter_mile = true;
            record_best(&mut state.best_quarter_mile, launch.elapsed);
            debug!("quarter mile in {:.2}s", launch.elapsed);
        }
        if launch.reached_100 && launch.reached_quarter_mile {
            self.active = None;
        }
    }
}

fn record_best(best: &mut f64, time: f64) {
    if *best == 0.0 || time < *best {
        *best = time;
    }
}

/// Clears session statistics and refuels. Engine, gearbox and thermal state
/// are left alone.
pub fn reset(state: &mut EngineState, launch: &mut LaunchTimer) {
    state.total_distance = 0.0;
    state.runtime = 0.0;
    state.best_0_to_100 = 0.0;
    state.best_quarter_mile = 0.0;
    state.engine_wear = 0.0;
    state.fuel_level = FULL_TANK_PCT;
    launch.reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cruising(gear: i8, rpm: f64) -> EngineState {
        EngineState {
            is_running: true,
            gear,
            rpm,
            ..EngineState::default()
        }
    }

    #[test]
    fn speed_follows_rpm_in_gear() {
        let mut state = cruising(4, 3000.0);
        update_speed(&mut state, 0.016);
        let expected = 3000.0 * 0.65 * PI * 60.0 / (1000.0 * 1.0 * 3.73);
        assert_relative_eq!(state.speed, expected, epsilon = 1e-9);
        assert!(state.total_distance > 0.0);
    }

    #[test]
    fn neutral_holds_speed() {
        let mut state = cruising(0, 3000.0);
        state.speed = 40.0;
        update_speed(&mut state, 0.5);
        assert_eq!(state.speed, 40.0);
    }

    #[test]
    fn disengaged_clutch_decouples_speed() {
        let mut state = cruising(3, 5000.0);
        state.clutch_engaged = false;
        state.speed = 20.0;
        update_speed(&mut state, 0.1);
        assert_eq!(state.speed, 20.0);
    }

    #[test]
    fn brake_sheds_speed_and_floors_at_zero() {
        let mut state = cruising(0, 800.0);
        state.speed = 30.0;
        state.brake = 1.0;
        update_speed(&mut state, 0.2);
        assert_relative_eq!(state.speed, 20.0, epsilon = 1e-9);
        update_speed(&mut state, 1.0);
        assert_eq!(state.speed, 0.0);
    }

    #[test]
    fn wear_accelerates_near_redline() {
        let mut gentle = cruising(3, 3000.0);
        let mut hard = cruising(3, 7000.0);
        update_wear(&mut gentle, 1.0);
        update_wear(&mut hard, 1.0);
        assert_relative_eq!(gentle.engine_wear, 0.001, epsilon = 1e-12);
        assert_relative_eq!(hard.engine_wear, 0.003, epsilon = 1e-12);
    }

    #[test]
    fn wear_is_capped() {
        let mut state = cruising(3, 3000.0);
        state.engine_wear = 99.9999;
        update_wear(&mut state, 10.0);
        assert_eq!(state.engine_wear, MAX_WEAR_PCT);
    }

    #[test]
    fn launch_records_best_time() {
        let mut timer = LaunchTimer::default();
        let mut state = cruising(2, 3000.0);
        state.throttle = 1.0;
        timer.track(&mut state, 0.0, 0.5);
        assert!(timer.is_timing());
        state.speed = 105.0;
        timer.track(&mut state, 90.0, 0.5);
        assert_eq!(state.best_0_to_100, 1.0);
    }

    #[test]
    fn lifting_aborts_launch() {
        let mut timer = LaunchTimer::default();
        let mut state = cruising(1, 3000.0);
        state.throttle = 1.0;
        timer.track(&mut state, 0.0, 0.1);
        state.throttle = 0.0;
        state.speed = 120.0;
        timer.track(&mut state, 50.0, 0.1);
        assert!(!timer.is_timing());
        assert_eq!(state.best_0_to_100, 0.0);
    }

    #[test]
    fn revving_without_drive_does_not_arm() {
        let mut timer = LaunchTimer::default();
        let mut neutral = cruising(0, 6000.0);
        neutral.throttle = 1.0;
        timer.track(&mut neutral, 0.0, 1.0);
        assert!(!timer.is_timing());

        let mut declutched = cruising(1, 6000.0);
        declutched.throttle = 1.0;
        declutched.clutch_engaged = false;
        timer.track(&mut declutched, 0.0, 1.0);
        assert!(!timer.is_timing());
    }

    #[test]
    fn declutching_aborts_launch() {
        let mut timer = LaunchTimer::default();
        let mut state = cruising(1, 3000.0);
        state.throttle = 1.0;
        timer.track(&mut state, 0.0, 0.1);
        assert!(timer.is_timing());
        state.clutch_engaged = false;
        timer.track(&mut state, 5.0, 0.1);
        assert!(!timer.is_timing());
    }

    #[test]
    fn rolling_start_does_not_arm() {
        let mut timer = LaunchTimer::default();
        let mut state = cruising(3, 4000.0);
        state.throttle = 1.0;
        timer.track(&mut state, 60.0, 0.1);
        assert!(!timer.is_timing());
    }

    #[test]
    fn reset_clears_statistics_only() {
        let mut timer = LaunchTimer::default();
        let mut state = cruising(3, 4000.0);
        state.total_distance = 12.0;
        state.runtime = 300.0;
        state.engine_wear = 0.4;
        state.best_0_to_100 = 6.1;
        state.fuel_level = 40.0;
        state.oil_temp = 90.0;
        reset(&mut state, &mut timer);
        assert_eq!(state.total_distance, 0.0);
        assert_eq!(state.runtime, 0.0);
        assert_eq!(state.engine_wear, 0.0);
        assert_eq!(state.best_0_to_100, 0.0);
        assert_eq!(state.fuel_level, FULL_TANK_PCT);
        assert_eq!(state.rpm, 4000.0);
        assert_eq!(state.gear, 3);
        assert_eq!(state.oil_temp, 90.0);
    }
}
