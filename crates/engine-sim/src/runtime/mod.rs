mod app;
mod config;
mod error;
mod logging;
mod script;
mod telemetry;

pub use app::run_from_args;
