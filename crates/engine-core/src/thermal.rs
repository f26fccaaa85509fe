use crate::state::{approach, EngineState, AMBIENT_TEMP_C};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Targets {
    pub oil: f64,
    pub coolant: f64,
    pub intake: f64,
}

/// Equilibrium temperatures for the current operating point.
pub fn targets(state: &EngineState) -> Targets {
    if !state.is_running {
        return Targets {
            oil: AMBIENT_TEMP_C,
            coolant: AMBIENT_TEMP_C,
            intake: AMBIENT_TEMP_C,
        };
    }
    let rpm_fraction = state.rpm / state.redline_rpm;
    let load = rpm_fraction * state.throttle;
    Targets {
        oil: AMBIENT_TEMP_C + load * 80.0 + rpm_fraction * 20.0,
        coolant: AMBIENT_TEMP_C + load * 60.0 + rpm_fraction * 15.0,
        intake: AMBIENT_TEMP_C + load * 25.0 + state.boost * 3.5,
    }
}

pub fn step(state: &mut EngineState, dt: f64) {
    let target = targets(state);
    // Per-channel rates differ between running and off.
    let (k_oil, k_coolant, k_intake) = if state.is_running {
        (0.15, 0.12, 0.25)
    } else {
        (0.1, 0.15, 0.3)
    };
    state.oil_temp = approach(state.oil_temp, target.oil, k_oil, dt);
    state.coolant_temp = approach(state.coolant_temp, target.coolant, k_coolant, dt);
    state.intake_temp = approach(state.intake_temp, target.intake, k_intake, dt);
}
