use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("idle rpm {idle} must be below redline {redline}")]
    IdleAboveRedline { idle: f64, redline: f64 },

    #[error("unknown engine preset '{0}'")]
    UnknownPreset(String),

    #[error("invalid engine config json: {0}")]
    Json(String),
}
