use serde::{Deserialize, Serialize};

/// A single driver or configuration input, as sent across threads or read
/// from a drive script.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DriverCommand {
    StartEngine,
    StopEngine,
    Throttle(f64),
    Brake(f64),
    ShiftUp,
    ShiftDown,
    ToggleClutch,
    SetGear(i32),
    RevLimiter(f64),
    BoostPressure(f64),
    ResetSession,
}
