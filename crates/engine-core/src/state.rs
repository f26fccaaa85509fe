use crate::config::EngineConfig;
use serde::{Deserialize, Serialize};

pub const AMBIENT_TEMP_C: f64 = 20.0;
pub const FULL_TANK_PCT: f64 = 100.0;

/// Everything the simulation publishes after a tick.
///
/// The struct is `Copy`: a snapshot for another thread is just a copy of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub rpm: f64,
    pub target_rpm: f64,
    /// km/h
    pub speed: f64,
    pub throttle: f64,
    pub brake: f64,

    /// -1 reverse, 0 neutral, 1..=6 forward.
    pub gear: i8,
    pub clutch_engaged: bool,
    pub is_shifting: bool,
    pub shift_timer: f64,

    /// psi
    pub boost: f64,
    pub target_boost: f64,
    pub max_boost: f64,

    /// Nm
    pub torque: f64,
    /// hp
    pub power: f64,

    pub oil_temp: f64,
    pub coolant_temp: f64,
    pub intake_temp: f64,

    /// Percent of tank.
    pub fuel_level: f64,
    /// L/h
    pub fuel_consumption_rate: f64,

    pub engine_wear: f64,
    /// km
    pub total_distance: f64,
    /// Seconds the engine has been running this session.
    pub runtime: f64,
    /// Seconds; zero until a run has been recorded.
    pub best_0_to_100: f64,
    pub best_quarter_mile: f64,

    pub redline_rpm: f64,
    pub idle_rpm: f64,
    pub is_running: bool,

    pub peak_torque: f64,
    pub peak_power: f64,
    pub vehicle_mass: f64,
}

impl EngineState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            rpm: 0.0,
            target_rpm: config.idle_rpm,
            speed: 0.0,
            throttle: 0.0,
            brake: 0.0,
            gear: 0,
            clutch_engaged: true,
            is_shifting: false,
            shift_timer: 0.0,
            boost: 0.0,
            target_boost: 0.0,
            max_boost: config.max_boost,
            torque: 0.0,
            power: 0.0,
            oil_temp: AMBIENT_TEMP_C,
            coolant_temp: AMBIENT_TEMP_C,
            intake_temp: AMBIENT_TEMP_C,
            fuel_level: FULL_TANK_PCT,
            fuel_consumption_rate: 0.0,
            engine_wear: 0.0,
            total_distance: 0.0,
            runtime: 0.0,
            best_0_to_100: 0.0,
            best_quarter_mile: 0.0,
            redline_rpm: config.redline_rpm,
            idle_rpm: config.idle_rpm,
            is_running: false,
            peak_torque: config.peak_torque,
            peak_power: config.peak_power,
            vehicle_mass: config.vehicle_mass,
        }
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

/// Moves `current` toward `target` by `rate * dt` of the gap.
///
/// The blend fraction is capped at one so a long step lands on the target
/// instead of overshooting it.
pub(crate) fn approach(current: f64, target: f64, rate: f64, dt: f64) -> f64 {
    current + (target - current) * (rate * dt).min(1.0)
}
