use crate::runtime::config::MAX_RUN_SECONDS;
use crate::runtime::error::SimError;
use engine_core::{DriverCommand, InputSource};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SCENARIOS: [&str; 3] = ["idle", "redline", "launch"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Simulated seconds since the run started.
    pub at: f64,
    pub command: DriverCommand,
}

/// A timed list of driver commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriveScript {
    steps: Vec<ScriptStep>,
}

impl DriveScript {
    pub fn new(mut steps: Vec<ScriptStep>) -> Result<Self, SimError> {
        if let Some(bad) = steps.iter().find(|s| !(0.0..=MAX_RUN_SECONDS).contains(&s.at)) {
            return Err(SimError::InvalidScript(format!(
                "step time {} must be between 0 and {MAX_RUN_SECONDS} seconds",
                bad.at
            )));
        }
        steps.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(Self { steps })
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let steps: Vec<ScriptStep> = serde_json::from_str(json)?;
        Self::new(steps)
    }

    pub fn load(path: &Path) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn scenario(name: &str) -> Result<Self, SimError> {
        use DriverCommand::*;
        let steps: &[(f64, DriverCommand)] = match name {
            "idle" => &[(0.0, StartEngine), (5.0, StopEngine)],
            "redline" => &[
                (0.0, StartEngine),
                (1.0, Throttle(1.0)),
                (4.0, Throttle(0.0)),
                (6.0, StopEngine),
            ],
            "launch" => &[
                (0.0, StartEngine),
                (0.5, SetGear(1)),
                (1.0, Throttle(1.0)),
                (3.5, ShiftUp),
                (6.0, ShiftUp),
                (9.0, ShiftUp),
                (12.0, Throttle(0.0)),
                (12.0, Brake(1.0)),
                (15.0, Brake(0.0)),
                (15.0, SetGear(0)),
                (16.0, StopEngine),
            ],
            other => {
                return Err(SimError::UnknownScenario(format!(
                    "'{other}', expected one of: {}",
                    SCENARIOS.join(", ")
                )))
            }
        };
        Self::new(
            steps
                .iter()
                .map(|&(at, command)| ScriptStep { at, command })
                .collect(),
        )
    }

    /// Time of the last step.
    pub fn duration(&self) -> f64 {
        self.steps.last().map_or(0.0, |s| s.at)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

/// Replays a [`DriveScript`] against simulated time.
pub struct ScriptedDriver {
    steps: Vec<ScriptStep>,
    next: usize,
}

impl ScriptedDriver {
    pub fn new(script: DriveScript) -> Self {
        Self {
            steps: script.steps,
            next: 0,
        }
    }
}

impl InputSource for ScriptedDriver {
    fn poll(&mut self, sim_time_s: f64) -> Vec<DriverCommand> {
        let due = self.steps[self.next..]
            .iter()
            .take_while(|s| s.at <= sim_time_s)
            .map(|s| s.command)
            .collect::<Vec<_>>();
        self.next += due.len();
        due
    }

    fn is_exhausted(&self) -> bool {
        self.next >= self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_scenarios_load() {
        for name in SCENARIOS {
            let script = DriveScript::scenario(name).unwrap();
            assert!(script.len() > 0, "{name} is empty");
        }
        assert!(matches!(
            DriveScript::scenario("drift"),
            Err(SimError::UnknownScenario(_))
        ));
    }

    #[test]
    fn parses_and_sorts_json_steps() {
        let script = DriveScript::from_json(
            r#"[
                { "at": 2.0, "command": { "type": "throttle", "value": 0.5 } },
                { "at": 0.0, "command": { "type": "start_engine" } }
            ]"#,
        )
        .unwrap();
        assert_eq!(script.duration(), 2.0);

        let mut driver = ScriptedDriver::new(script);
        assert_eq!(driver.poll(0.0), vec![DriverCommand::StartEngine]);
        assert!(driver.poll(1.0).is_empty());
        assert_eq!(driver.poll(2.5), vec![DriverCommand::Throttle(0.5)]);
        assert!(driver.is_exhausted());
    }

    #[test]
    fn rejects_negative_times() {
        let result = DriveScript::from_json(r#"[{ "at": -1.0, "command": { "type": "shift_up" } }]"#);
        assert!(matches!(result, Err(SimError::InvalidScript(_))));
    }

    #[test]
    fn rejects_steps_beyond_a_day() {
        let result = DriveScript::from_json(r#"[{ "at": 1e300, "command": { "type": "shift_up" } }]"#);
        assert!(matches!(result, Err(SimError::InvalidScript(_))));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(DriveScript::from_json("[{"), Err(SimError::Json(_))));
    }

    #[test]
    fn steps_due_together_arrive_in_order() {
        let script = DriveScript::scenario("launch").unwrap();
        let mut driver = ScriptedDriver::new(script);
        driver.poll(11.9);
        assert_eq!(
            driver.poll(12.0),
            vec![DriverCommand::Throttle(0.0), DriverCommand::Brake(1.0)]
        );
    }
}
