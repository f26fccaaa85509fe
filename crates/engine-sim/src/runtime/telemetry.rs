use engine_core::{EngineState, ExecutionStats, Published, SnapshotReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

pub fn log_snapshot(snapshot: &Published<EngineState>) {
    let s = &snapshot.value;
    info!(
        seq = snapshot.sequence,
        running = s.is_running,
        rpm = s.rpm.round(),
        gear = s.gear,
        speed_kmh = format!("{:.1}", s.speed).as_str(),
        throttle = s.throttle,
        boost_psi = format!("{:.2}", s.boost).as_str(),
        torque_nm = s.torque.round(),
        power_hp = s.power.round(),
        coolant_c = format!("{:.1}", s.coolant_temp).as_str(),
        fuel_pct = format!("{:.2}", s.fuel_level).as_str(),
        "Telemetry"
    );
}

/// Logs the latest snapshot every `interval` until `stop` is raised,
/// skipping intervals in which nothing new was published.
pub fn start_reporter(
    mut reader: SnapshotReader,
    stop: Arc<AtomicBool>,
    interval: Duration,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut last_sequence = 0u64;
        while !stop.load(Ordering::Relaxed) {
            thread::sleep(interval);
            let snapshot = reader.latest();
            if snapshot.sequence > last_sequence {
                last_sequence = snapshot.sequence;
                log_snapshot(&snapshot);
            }
        }
    })
}

pub fn log_summary(state: &EngineState, stats: &ExecutionStats) {
    info!(
        ticks = stats.ticks_executed,
        ticks_late = stats.ticks_late,
        ticks_clamped = stats.ticks_clamped,
        max_overrun_us = stats.max_overrun_us,
        commands = stats.commands_applied,
        sim_time_s = format!("{:.2}", stats.sim_time_s).as_str(),
        distance_km = format!("{:.3}", state.total_distance).as_str(),
        fuel_pct = format!("{:.2}", state.fuel_level).as_str(),
        wear_pct = format!("{:.5}", state.engine_wear).as_str(),
        best_0_100_s = state.best_0_to_100,
        best_quarter_mile_s = state.best_quarter_mile,
        "Run complete"
    );
}
