use crate::runtime::config::RuntimeConfig;
use crate::runtime::error::SimError;
use crate::runtime::logging::init_tracing;
use crate::runtime::script::{DriveScript, ScriptedDriver};
use crate::runtime::telemetry;
use engine_core::{
    snapshot_exchange, Engine, EngineConfig, ExecutionStats, InputSource, LoopConfig,
    SnapshotPublisher, SnapshotReader, TickLoop,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Extra simulated time after the last script step so the engine can settle.
const SETTLE_TAIL_S: f64 = 2.0;

pub fn run_from_args() -> Result<(), SimError> {
    let config = RuntimeConfig::from_env();
    if config.show_help {
        RuntimeConfig::print_help();
        return Ok(());
    }
    run(config)
}

pub fn run(config: RuntimeConfig) -> Result<(), SimError> {
    let _log_guard = init_tracing(config.json_logs, config.log_file.as_deref())?;

    let engine = Engine::with_config(load_engine_config(&config)?)?;
    let script = load_script(&config)?;
    let duration_s = config
        .run_seconds
        .unwrap_or(script.duration() + SETTLE_TAIL_S);

    let engine_config = engine.config();
    info!(
        engine = %engine_config.name,
        induction = ?engine_config.induction,
        redline_rpm = engine_config.redline_rpm,
        max_boost_psi = engine_config.max_boost,
        steps = script.len(),
        duration_s,
        fast = config.fast,
        "Engine simulator starting"
    );

    let loop_config = LoopConfig {
        cycle_time: Duration::from_secs_f64(1.0 / config.rate_hz),
        max_dt: config.max_dt,
    };
    let (publisher, reader) = snapshot_exchange();
    let driver = ScriptedDriver::new(script);

    let (engine, stats) = if config.fast {
        run_unpaced(engine, driver, loop_config, publisher, reader, &config)
    } else {
        run_paced(engine, driver, loop_config, publisher, reader, duration_s, &config)?
    };

    if stats.ticks_late > 0 {
        warn!(
            ticks_late = stats.ticks_late,
            max_overrun_us = stats.max_overrun_us,
            "Tick loop missed deadlines"
        );
    }
    telemetry::log_summary(engine.state(), &stats);
    Ok(())
}

fn load_engine_config(config: &RuntimeConfig) -> Result<EngineConfig, SimError> {
    let mut engine_config = match &config.engine_config {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|source| SimError::Io {
                path: path.clone(),
                source,
            })?;
            EngineConfig::from_json(&json)?
        }
        None => EngineConfig::preset(&config.preset)?,
    };
    if let Some(seed) = config.seed {
        engine_config.jitter_seed = seed;
    }
    Ok(engine_config)
}

fn load_script(config: &RuntimeConfig) -> Result<DriveScript, SimError> {
    match &config.script_path {
        Some(path) => DriveScript::load(path),
        None => DriveScript::scenario(&config.scenario),
    }
}

/// Real-time run: the tick thread paces itself against the wall clock while
/// a reporter thread samples the published snapshots.
fn run_paced(
    engine: Engine,
    driver: ScriptedDriver,
    loop_config: LoopConfig,
    publisher: SnapshotPublisher,
    reader: SnapshotReader,
    duration_s: f64,
    config: &RuntimeConfig,
) -> Result<(Engine, ExecutionStats), SimError> {
    let stop = Arc::new(AtomicBool::new(false));

    let stop_tick = Arc::clone(&stop);
    let tick_handle = thread::spawn(move || {
        let mut tick_loop = TickLoop::new(engine, driver, loop_config, publisher);
        tick_loop.run(&stop_tick);
        let stats = tick_loop.stats().clone();
        (tick_loop.into_engine(), stats)
    });

    let reporter_handle = telemetry::start_reporter(
        reader,
        Arc::clone(&stop),
        Duration::from_millis(config.report_ms.max(1)),
    );

    thread::sleep(Duration::from_secs_f64(duration_s));
    stop.store(true, Ordering::Relaxed);

    let result = tick_handle
        .join()
        .map_err(|_| SimError::ThreadPanicked("tick"))?;
    reporter_handle
        .join()
        .map_err(|_| SimError::ThreadPanicked("reporter"))?;
    Ok(result)
}

/// Unpaced run: fixed `1 / rate_hz` steps back to back on the calling
/// thread, reporting every `report_ms` of simulated time. Without
/// `run_seconds` it ends `SETTLE_TAIL_S` after the driver runs out of steps.
fn run_unpaced(
    engine: Engine,
    driver: ScriptedDriver,
    loop_config: LoopConfig,
    publisher: SnapshotPublisher,
    mut reader: SnapshotReader,
    config: &RuntimeConfig,
) -> (Engine, ExecutionStats) {
    let dt = (1.0 / config.rate_hz).min(loop_config.max_dt);
    let ticks_per_report = ((config.report_ms as f64 / 1000.0) / dt).round().max(1.0) as u64;

    let mut tick_loop = TickLoop::new(engine, driver, loop_config, publisher);
    let mut end_s = config.run_seconds;
    loop {
        let sim_time = tick_loop.stats().sim_time_s;
        if end_s.is_none() && tick_loop.input().is_exhausted() {
            debug!(sim_time_s = sim_time, "Drive script exhausted");
            end_s = Some(sim_time + SETTLE_TAIL_S);
        }
        let chunk = match end_s {
            Some(end) => {
                let remaining = ((end - sim_time) / dt - 1e-9).ceil();
                if remaining < 1.0 {
                    break;
                }
                (remaining as u64).min(ticks_per_report)
            }
            None => ticks_per_report,
        };
        tick_loop.run_for(chunk, dt);
        telemetry::log_snapshot(&reader.latest());
    }

    let stats = tick_loop.stats().clone();
    (tick_loop.into_engine(), stats)
}
