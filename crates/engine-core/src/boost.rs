use crate::config::InductionKind;
use crate::state::{approach, EngineState};

/// Throttle below which no boost is demanded.
pub const BOOST_THROTTLE: f64 = 0.1;
/// Turbo produces no boost below this rpm.
pub const TURBO_ONSET_RPM: f64 = 2000.0;
pub const SPOOL_RATE: f64 = 3.0;
pub const WASTEGATE_RATE: f64 = 6.0;
pub const SUPERCHARGER_RATE: f64 = 5.0;

pub fn target_boost(state: &EngineState, induction: InductionKind) -> f64 {
    if !state.is_running || state.throttle <= BOOST_THROTTLE {
        return 0.0;
    }
    let rpm_factor = match induction {
        InductionKind::NaturallyAspirated => return 0.0,
        InductionKind::Turbo => {
            ((state.rpm - TURBO_ONSET_RPM) / (state.redline_rpm - TURBO_ONSET_RPM)).clamp(0.0, 1.0)
        }
        InductionKind::Supercharger => (state.rpm / state.redline_rpm).clamp(0.0, 1.0),
    };
    state.max_boost * rpm_factor * state.throttle
}

pub fn step(state: &mut EngineState, induction: InductionKind, dt: f64) {
    state.target_boost = target_boost(state, induction);
    let rate = match induction {
        InductionKind::Supercharger => SUPERCHARGER_RATE,
        _ if state.target_boost > state.boost => SPOOL_RATE,
        _ => WASTEGATE_RATE,
    };
    state.boost = approach(state.boost, state.target_boost, rate, dt).clamp(0.0, state.max_boost);
}
