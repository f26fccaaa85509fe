use serde::{Deserialize, Serialize};

/// Boost at which the torque multiplier reaches +60%.
pub const REFERENCE_BOOST_PSI: f64 = 14.7;
const NM_RPM_PER_KW: f64 = 9549.0;
const HP_PER_KW: f64 = 1.341;
/// Finest dyno resolution; finer steps yield an empty sweep.
pub const MIN_SWEEP_STEP_RPM: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Output {
    /// Nm
    pub torque: f64,
    /// hp
    pub power: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub rpm: f64,
    pub value: f64,
}

/// Crankshaft output for the given operating point.
///
/// Torque rises linearly to its peak at `peak_torque_rpm` and is flat beyond
/// it; boost scales it up. A stopped engine produces nothing.
pub fn output(rpm: f64, throttle: f64, boost: f64, peak_torque: f64, peak_torque_rpm: f64) -> Output {
    if rpm <= 0.0 {
        return Output::default();
    }
    let rpm_ratio = rpm / peak_torque_rpm;
    let torque_mult = 0.3 + 0.7 * rpm_ratio.min(1.0);
    let boost_mult = 1.0 + (boost / REFERENCE_BOOST_PSI) * 0.6;
    let torque = peak_torque * torque_mult * throttle * boost_mult;
    let power = torque * rpm / NM_RPM_PER_KW * HP_PER_KW;
    Output { torque, power }
}

/// Full-throttle sweep from `start` to `end` (inclusive), never past redline.
/// Holds at most one point per rpm of the swept range.
pub fn dyno_sweep(
    start: f64,
    end: f64,
    step: f64,
    redline_rpm: f64,
    boost: f64,
    peak_torque: f64,
    peak_torque_rpm: f64,
) -> Vec<(f64, Output)> {
    if step.is_nan() || step < MIN_SWEEP_STEP_RPM || !start.is_finite() || !end.is_finite() {
        return Vec::new();
    }
    let start = start.max(0.0);
    let end = end.min(redline_rpm);
    if end < start {
        return Vec::new();
    }
    let count = ((end - start) / step).floor() as usize + 1;
    (0..count)
        .map(|i| start + i as f64 * step)
        .map(|rpm| (rpm, output(rpm, 1.0, boost, peak_torque, peak_torque_rpm)))
        .collect()
}

pub fn torque_curve(sweep: &[(f64, Output)]) -> Vec<CurvePoint> {
    sweep
        .iter()
        .map(|(rpm, out)| CurvePoint {
            rpm: *rpm,
            value: out.torque,
        })
        .collect()
}

pub fn power_curve(sweep: &[(f64, Output)]) -> Vec<CurvePoint> {
    sweep
        .iter()
        .map(|(rpm, out)| CurvePoint {
            rpm: *rpm,
            value: out.power,
        })
        .collect()
}
