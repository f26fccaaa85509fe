use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const MIN_REDLINE_RPM: f64 = 3000.0;
pub const MAX_REDLINE_RPM: f64 = 12000.0;
pub const MAX_BOOST_PSI: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InductionKind {
    NaturallyAspirated,
    #[default]
    Turbo,
    Supercharger,
}

/// Fixed characteristics of the simulated engine and vehicle.
///
/// Every field has a default, so a JSON document only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub name: String,
    pub idle_rpm: f64,
    pub redline_rpm: f64,
    /// Nm
    pub peak_torque: f64,
    pub peak_torque_rpm: f64,
    /// hp
    pub peak_power: f64,
    /// kg
    pub vehicle_mass: f64,
    /// Consumption at redline and full throttle without boost, L/h.
    pub fuel_base_lph: f64,
    pub tank_capacity_l: f64,
    pub induction: InductionKind,
    /// psi
    pub max_boost: f64,
    /// Half-width of the idle fluctuation band. Zero disables it.
    pub idle_jitter_rpm: f64,
    pub jitter_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::inline4_turbo()
    }
}

impl EngineConfig {
    pub const PRESETS: [&'static str; 4] = ["inline4-turbo", "v6-na", "v8-na", "diesel-i4"];

    pub fn inline4_turbo() -> Self {
        Self {
            name: "Inline-4 2.0L Turbo".to_string(),
            idle_rpm: 800.0,
            redline_rpm: 7200.0,
            peak_torque: 280.0,
            peak_torque_rpm: 3500.0,
            peak_power: 250.0,
            vehicle_mass: 1400.0,
            fuel_base_lph: 8.0,
            tank_capacity_l: 50.0,
            induction: InductionKind::Turbo,
            max_boost: 15.0,
            idle_jitter_rpm: 10.0,
            jitter_seed: 0x5EED,
        }
    }

    pub fn v6_na() -> Self {
        Self {
            name: "V6 3.5L NA".to_string(),
            idle_rpm: 700.0,
            redline_rpm: 7000.0,
            peak_torque: 380.0,
            peak_torque_rpm: 4500.0,
            peak_power: 300.0,
            vehicle_mass: 1550.0,
            fuel_base_lph: 21.0,
            induction: InductionKind::NaturallyAspirated,
            max_boost: 0.0,
            ..Self::inline4_turbo()
        }
    }

    pub fn v8_na() -> Self {
        Self {
            name: "V8 5.0L NA".to_string(),
            idle_rpm: 650.0,
            redline_rpm: 7500.0,
            peak_torque: 530.0,
            peak_torque_rpm: 4200.0,
            peak_power: 450.0,
            vehicle_mass: 1700.0,
            fuel_base_lph: 45.0,
            tank_capacity_l: 70.0,
            induction: InductionKind::NaturallyAspirated,
            max_boost: 0.0,
            ..Self::inline4_turbo()
        }
    }

    pub fn diesel_i4() -> Self {
        Self {
            name: "Diesel I4 2.0L".to_string(),
            idle_rpm: 750.0,
            redline_rpm: 5000.0,
            peak_torque: 420.0,
            peak_torque_rpm: 1800.0,
            peak_power: 180.0,
            vehicle_mass: 1500.0,
            fuel_base_lph: 6.0,
            tank_capacity_l: 60.0,
            max_boost: 20.0,
            ..Self::inline4_turbo()
        }
    }

    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "inline4-turbo" => Ok(Self::inline4_turbo()),
            "v6-na" => Ok(Self::v6_na()),
            "v8-na" => Ok(Self::v8_na()),
            "diesel-i4" => Ok(Self::diesel_i4()),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }

    /// Parse a JSON document layered over the default engine and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        within("redline_rpm", self.redline_rpm, MIN_REDLINE_RPM, MAX_REDLINE_RPM)?;
        finite("idle_rpm", self.idle_rpm)?;
        if self.idle_rpm <= 0.0 || self.idle_rpm >= self.redline_rpm {
            return Err(ConfigError::IdleAboveRedline {
                idle: self.idle_rpm,
                redline: self.redline_rpm,
            });
        }
        positive("peak_torque", self.peak_torque)?;
        positive("peak_torque_rpm", self.peak_torque_rpm)?;
        positive("peak_power", self.peak_power)?;
        positive("vehicle_mass", self.vehicle_mass)?;
        positive("tank_capacity_l", self.tank_capacity_l)?;
        within("fuel_base_lph", self.fuel_base_lph, 0.0, f64::MAX)?;
        within("max_boost", self.max_boost, 0.0, MAX_BOOST_PSI)?;
        within("idle_jitter_rpm", self.idle_jitter_rpm, 0.0, 50.0)?;
        Ok(self)
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    within(field, value, f64::MIN_POSITIVE, f64::MAX)
}
