use crate::state::EngineState;

pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Instantaneous consumption in L/h. Zero while the engine is off.
pub fn consumption_rate(state: &EngineState, base_lph: f64) -> f64 {
    if !state.is_running {
        return 0.0;
    }
    let rpm_factor = state.rpm / state.redline_rpm;
    let throttle_factor = 0.2 + state.throttle * state.throttle * 0.8;
    let boost_factor = if state.max_boost > 0.0 {
        1.0 + (state.boost / state.max_boost) * 0.6
    } else {
        1.0
    };
    (base_lph * rpm_factor * throttle_factor * boost_factor).max(0.0)
}

/// Burns fuel for one tick. Returns true if the tank ran dry during it.
pub fn step(state: &mut EngineState, base_lph: f64, tank_capacity_l: f64, dt: f64) -> bool {
    state.fuel_consumption_rate = consumption_rate(state, base_lph);
    if state.fuel_consumption_rate <= 0.0 || state.fuel_level <= 0.0 {
        return false;
    }
    let litres = state.fuel_consumption_rate * dt / SECONDS_PER_HOUR;
    state.fuel_level = (state.fuel_level - litres / tank_capacity_l * 100.0).max(0.0);
    state.fuel_level == 0.0
}
