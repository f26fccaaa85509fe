use engine_core::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid drive script: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid drive script: {0}")]
    InvalidScript(String),

    #[error("unknown scenario {0}")]
    UnknownScenario(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to initialise logging: {0}")]
    Logging(String),

    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
}
