use crate::gearbox::NEUTRAL;
use crate::state::{approach, EngineState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Below this throttle the engine holds idle.
pub const IDLE_THROTTLE: f64 = 0.05;
/// Distance from idle inside which idle stabilization takes over.
pub const IDLE_CAPTURE_RPM: f64 = 50.0;
/// Closer than this, rpm settles on its target exactly.
pub const SETTLE_RPM: f64 = 0.5;
pub const NEUTRAL_RATE: f64 = 6.0;
pub const IN_GEAR_RATE: f64 = 2.5;
pub const LIMITER_PULLBACK: f64 = 0.95;

pub fn derive_target(throttle: f64, idle_rpm: f64, redline_rpm: f64) -> f64 {
    if throttle < IDLE_THROTTLE {
        idle_rpm
    } else {
        idle_rpm + throttle * (redline_rpm - idle_rpm)
    }
}

/// Relaxation rate toward target rpm. Heavier vehicles respond more slowly
/// once the drivetrain is coupled.
pub fn relaxation_rate(gear: i8, vehicle_mass: f64) -> f64 {
    if gear == NEUTRAL {
        NEUTRAL_RATE
    } else {
        IN_GEAR_RATE / (vehicle_mass / 1000.0)
    }
}

/// Seeded source of idle fluctuation. Same seed, same sequence.
#[derive(Debug, Clone)]
pub struct IdleJitter {
    amplitude: f64,
    rng: StdRng,
}

impl IdleJitter {
    pub fn new(amplitude: f64, seed: u64) -> Self {
        Self {
            amplitude: amplitude.max(0.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn sample(&mut self) -> f64 {
        if self.amplitude == 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-self.amplitude..=self.amplitude)
    }
}

pub fn step(state: &mut EngineState, jitter: &mut IdleJitter, dt: f64) {
    if !state.is_running {
        if state.rpm > 0.0 {
            let spindown_rate = 300.0 + state.rpm * 0.2;
            state.rpm = (state.rpm - spindown_rate * dt).max(0.0);
        }
        return;
    }

    let rate = relaxation_rate(state.gear, state.vehicle_mass);
    state.rpm = approach(state.rpm, state.target_rpm, rate, dt);
    if (state.target_rpm - state.rpm).abs() < SETTLE_RPM {
        state.rpm = state.target_rpm;
    }

    if state.throttle < IDLE_THROTTLE && (state.rpm - state.idle_rpm).abs() < IDLE_CAPTURE_RPM {
        state.rpm = state.idle_rpm + jitter.sample();
    }

    if state.rpm > state.redline_rpm {
        state.rpm = state.redline_rpm;
        state.target_rpm = state.redline_rpm * LIMITER_PULLBACK;
    }
    state.rpm = state.rpm.max(0.0);

    state.runtime += dt;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(gear: i8, rpm: f64, target_rpm: f64) -> EngineState {
        EngineState {
            is_running: true,
            gear,
            rpm,
            target_rpm,
            throttle: 0.5,
            ..EngineState::default()
        }
    }

    #[test]
    fn target_holds_idle_below_threshold() {
        assert_eq!(derive_target(0.04, 800.0, 7200.0), 800.0);
        assert_eq!(derive_target(1.0, 800.0, 7200.0), 7200.0);
        assert_eq!(derive_target(0.5, 800.0, 7200.0), 4000.0);
    }

    #[test]
    fn neutral_responds_faster_than_in_gear() {
        let mut jitter = IdleJitter::new(0.0, 1);
        let mut neutral = running(0, 1000.0, 5000.0);
        let mut geared = running(1, 1000.0, 5000.0);
        step(&mut neutral, &mut jitter, 0.016);
        step(&mut geared, &mut jitter, 0.016);
        assert!(neutral.rpm > geared.rpm);
        assert!(geared.rpm > 1000.0);
    }

    #[test]
    fn heavier_vehicle_relaxes_slower() {
        assert!(relaxation_rate(1, 2000.0) < relaxation_rate(1, 1000.0));
        assert_eq!(relaxation_rate(0, 2000.0), NEUTRAL_RATE);
    }

    #[test]
    fn limiter_clamps_and_pulls_target_back() {
        let mut jitter = IdleJitter::new(0.0, 1);
        let mut state = running(0, 7500.0, 7600.0);
        step(&mut state, &mut jitter, 0.016);
        assert_eq!(state.rpm, 7200.0);
        assert_eq!(state.target_rpm, 7200.0 * LIMITER_PULLBACK);
    }

    #[test]
    fn idle_jitter_stays_in_band() {
        let mut jitter = IdleJitter::new(10.0, 42);
        let mut state = running(0, 800.0, 800.0);
        state.throttle = 0.0;
        for _ in 0..500 {
            step(&mut state, &mut jitter, 0.016);
            assert!((state.rpm - 800.0).abs() <= 10.0);
        }
    }

    #[test]
    fn same_seed_same_jitter() {
        let mut a = IdleJitter::new(10.0, 7);
        let mut b = IdleJitter::new(10.0, 7);
        for _ in 0..32 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn spins_down_when_off() {
        let mut jitter = IdleJitter::new(0.0, 1);
        let mut state = EngineState {
            rpm: 5000.0,
            ..EngineState::default()
        };
        step(&mut state, &mut jitter, 1.0);
        assert_eq!(state.rpm, 5000.0 - (300.0 + 1000.0));
        step(&mut state, &mut jitter, 100.0);
        assert_eq!(state.rpm, 0.0);
        assert_eq!(state.runtime, 0.0);
    }

    #[test]
    fn runtime_accumulates_while_running() {
        let mut jitter = IdleJitter::new(0.0, 1);
        let mut state = running(0, 800.0, 800.0);
        step(&mut state, &mut jitter, 0.25);
        step(&mut state, &mut jitter, 0.25);
        assert_eq!(state.runtime, 0.5);
    }
}
