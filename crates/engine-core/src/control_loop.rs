use crate::command::DriverCommand;
use crate::engine::Engine;
use crate::sync::SnapshotPublisher;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::thread;
use std::time::{Duration, Instant};

/// Where driver commands come from each tick.
pub trait InputSource: Send {
    /// Commands due at or before `sim_time_s`.
    fn poll(&mut self, sim_time_s: f64) -> Vec<DriverCommand>;

    /// True once the source will never yield another command.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Commands pushed from another thread, applied in arrival order.
impl InputSource for Receiver<DriverCommand> {
    fn poll(&mut self, _sim_time_s: f64) -> Vec<DriverCommand> {
        self.try_iter().collect()
    }
}

#[derive(Clone, Debug)]
pub struct LoopConfig {
    pub cycle_time: Duration,
    /// Upper bound on the timestep handed to the engine, seconds.
    pub max_dt: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            cycle_time: Duration::from_micros(16_667),
            max_dt: 0.1,
        }
    }
}

#[derive(Clone, Default, Debug)]
pub struct ExecutionStats {
    pub ticks_executed: u64,
    pub ticks_late: u64,
    pub ticks_clamped: u64,
    pub max_overrun_us: u64,
    pub commands_applied: u64,
    pub sim_time_s: f64,
}

/// Owns the engine and drives it at a fixed cadence, publishing a snapshot
/// after every tick.
pub struct TickLoop<I: InputSource> {
    engine: Engine,
    input: I,
    config: LoopConfig,
    publisher: SnapshotPublisher,
    stats: ExecutionStats,
}

impl<I: InputSource> TickLoop<I> {
    pub fn new(engine: Engine, input: I, config: LoopConfig, publisher: SnapshotPublisher) -> Self {
        Self {
            engine,
            input,
            config,
            publisher,
            stats: ExecutionStats::default(),
        }
    }

    /// One simulation step. `dt` is clamped to `[0, max_dt]`.
    pub fn tick(&mut self, dt: f64) {
        let clamped = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_dt)
        } else {
            0.0
        };
        if clamped != dt {
            self.stats.ticks_clamped += 1;
        }

        for command in self.input.poll(self.stats.sim_time_s) {
            self.engine.apply(command);
            self.stats.commands_applied += 1;
        }
        self.engine.update(clamped);
        self.stats.sim_time_s += clamped;
        self.stats.ticks_executed += 1;
        self.publisher.publish(self.engine.snapshot());
    }

    /// Runs `ticks` steps of `dt` back to back without pacing.
    pub fn run_for(&mut self, ticks: u64, dt: f64) {
        for _ in 0..ticks {
            self.tick(dt);
        }
    }

    /// Paces ticks against the wall clock until `stop` is raised. Each tick
    /// is fed the real time elapsed since the previous one.
    pub fn run(&mut self, stop: &AtomicBool) {
        debug!(
            "tick loop starting, cycle {:?}, max dt {}s",
            self.config.cycle_time, self.config.max_dt
        );
        let mut last_tick = Instant::now();
        let mut next_cycle = last_tick + self.config.cycle_time;

        while !stop.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now < next_cycle {
                thread::sleep(next_cycle - now);
            } else {
                let overrun = now.duration_since(next_cycle);
                self.stats.ticks_late += 1;
                self.stats.max_overrun_us = self.stats.max_overrun_us.max(overrun.as_micros() as u64);
                if overrun > self.config.cycle_time * 10 {
                    warn!("tick loop fell {:?} behind, resynchronising", overrun);
                    next_cycle = now;
                }
            }

            let tick_start = Instant::now();
            let dt = tick_start.duration_since(last_tick).as_secs_f64();
            last_tick = tick_start;
            self.tick(dt);

            next_cycle += self.config.cycle_time;
        }
        debug!("tick loop stopped after {} ticks", self.stats.ticks_executed);
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn stats(&self) -> &ExecutionStats {
        &self.stats
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }
}
