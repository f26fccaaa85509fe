use crate::runtime::error::SimError;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with optional JSON output and an
/// optional JSON log file. The returned guard must outlive the run or
/// buffered file lines are lost.
pub fn init_tracing(json_output: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>, SimError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,engine_sim=debug,engine_core=debug"));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| SimError::Logging(format!("{} is not a file path", path.display())))?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name.to_string_lossy().into_owned())
                .build(directory)
                .map_err(|e| SimError::Logging(e.to_string()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let base = tracing_subscriber::registry().with(file_layer).with(filter);
    let installed = if json_output {
        base.with(fmt::layer().json()).try_init()
    } else {
        base.with(fmt::layer().pretty()).try_init()
    };
    installed.map_err(|e| SimError::Logging(e.to_string()))?;
    Ok(guard)
}
