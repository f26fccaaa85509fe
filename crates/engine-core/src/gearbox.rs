//! Gear selection, shift lockout and clutch gating.

use crate::state::EngineState;

pub const GEAR_RATIOS: [f64; 6] = [3.36, 2.07, 1.43, 1.00, 0.84, 0.56];
pub const FINAL_DRIVE: f64 = 3.73;
pub const REVERSE_GEAR: i8 = -1;
pub const NEUTRAL: i8 = 0;
pub const TOP_GEAR: i8 = 6;
/// Seconds during which a new shift request is refused.
pub const SHIFT_LOCKOUT_S: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftRejection {
    ClutchDisengaged,
    ShiftInProgress,
    AtLimit,
}

/// Ratio for a forward gear, `None` for neutral and reverse.
pub fn gear_ratio(gear: i8) -> Option<f64> {
    if (1..=TOP_GEAR).contains(&gear) {
        Some(GEAR_RATIOS[(gear - 1) as usize])
    } else {
        None
    }
}

pub fn shift(state: &mut EngineState, direction: ShiftDirection) -> Result<i8, ShiftRejection> {
    if !state.clutch_engaged {
        return Err(ShiftRejection::ClutchDisengaged);
    }
    if state.is_shifting {
        return Err(ShiftRejection::ShiftInProgress);
    }
    let old_gear = state.gear;
    let new_gear = match direction {
        ShiftDirection::Up if old_gear < TOP_GEAR => old_gear + 1,
        ShiftDirection::Down if old_gear > REVERSE_GEAR => old_gear - 1,
        _ => return Err(ShiftRejection::AtLimit),
    };

    state.gear = new_gear;
    state.is_shifting = true;
    state.shift_timer = SHIFT_LOCKOUT_S;

    // Keep road speed continuous across a change between forward gears.
    if let (Some(old_ratio), Some(new_ratio)) = (gear_ratio(old_gear), gear_ratio(new_gear)) {
        let factor = new_ratio / old_ratio;
        state.rpm = (state.rpm * factor).min(state.redline_rpm);
        state.target_rpm = (state.target_rpm * factor).min(state.redline_rpm);
    }
    Ok(new_gear)
}

/// Counts the lockout down. Returns true on the tick the shift completes.
pub fn advance_lockout(state: &mut EngineState, dt: f64) -> bool {
    if !state.is_shifting {
        return false;
    }
    state.shift_timer -= dt;
    if state.shift_timer <= 0.0 {
        state.is_shifting = false;
        state.shift_timer = 0.0;
        return true;
    }
    false
}

/// Direct gear selection. Ignores the lockout and does not rescale rpm.
pub fn select(state: &mut EngineState, gear: i8) -> bool {
    if (REVERSE_GEAR..=TOP_GEAR).contains(&gear) {
        state.gear = gear;
        true
    } else {
        false
    }
}

pub fn toggle_clutch(state: &mut EngineState) {
    state.clutch_engaged = !state.clutch_engaged;
}
