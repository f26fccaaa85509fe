use crate::boost;
use crate::command::DriverCommand;
use crate::config::{EngineConfig, MAX_BOOST_PSI, MAX_REDLINE_RPM, MIN_REDLINE_RPM};
use crate::error::ConfigError;
use crate::fuel;
use crate::gearbox::{self, ShiftDirection};
use crate::powertrain::{self, CurvePoint};
use crate::revs::{self, IdleJitter};
use crate::session::{self, LaunchTimer};
use crate::state::EngineState;
use crate::thermal;
use log::{debug, trace};

/// The engine simulation. Owns its state outright; drive it with the setters
/// and one [`Engine::update`] per frame, then read the published fields.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    state: EngineState,
    jitter: IdleJitter,
    launch: LaunchTimer,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self::build(config.validate()?))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            state: EngineState::new(&config),
            jitter: IdleJitter::new(config.idle_jitter_rpm, config.jitter_seed),
            launch: LaunchTimer::default(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn snapshot(&self) -> EngineState {
        self.state
    }

    /// Returns whether the engine is running afterwards. An empty tank keeps
    /// it off.
    pub fn start_engine(&mut self) -> bool {
        if self.state.is_running {
            return true;
        }
        if self.state.fuel_level <= 0.0 {
            debug!("start refused: fuel tank empty");
            return false;
        }
        self.state.is_running = true;
        self.state.rpm = self.state.idle_rpm;
        self.rederive_target();
        debug!("engine started at {} rpm", self.state.rpm);
        true
    }

    pub fn stop_engine(&mut self) {
        if self.state.is_running {
            debug!("engine stopped at {:.0} rpm", self.state.rpm);
        }
        self.state.is_running = false;
        self.state.throttle = 0.0;
        self.state.target_rpm = 0.0;
    }

    pub fn set_throttle(&mut self, throttle: f64) {
        self.state.throttle = unit_interval(throttle);
        if self.state.is_running {
            self.rederive_target();
        }
    }

    pub fn set_brake(&mut self, brake: f64) {
        self.state.brake = unit_interval(brake);
    }

    pub fn shift_up(&mut self) -> bool {
        self.shift(ShiftDirection::Up)
    }

    pub fn shift_down(&mut self) -> bool {
        self.shift(ShiftDirection::Down)
    }

    fn shift(&mut self, direction: ShiftDirection) -> bool {
        match gearbox::shift(&mut self.state, direction) {
            Ok(gear) => {
                debug!("shifted {:?} into gear {}", direction, gear);
                true
            }
            Err(reason) => {
                trace!("shift {:?} rejected: {:?}", direction, reason);
                false
            }
        }
    }

    pub fn toggle_clutch(&mut self) {
        gearbox::toggle_clutch(&mut self.state);
    }

    /// Selects a gear directly. Requests outside -1..=6 are ignored.
    pub fn set_gear(&mut self, gear: i32) -> bool {
        let accepted = i8::try_from(gear)
            .map(|gear| gearbox::select(&mut self.state, gear))
            .unwrap_or(false);
        if !accepted {
            trace!("gear request {} ignored", gear);
        }
        accepted
    }

    /// Moves the rev limiter, clamped to 3000..=12000 rpm.
    pub fn set_rev_limiter(&mut self, rpm: f64) {
        if !rpm.is_finite() {
            trace!("non-finite rev limit ignored");
            return;
        }
        let redline = rpm.clamp(MIN_REDLINE_RPM, MAX_REDLINE_RPM);
        self.state.redline_rpm = redline;
        self.state.rpm = self.state.rpm.min(redline);
        self.state.target_rpm = self.state.target_rpm.min(redline);
        if self.state.is_running {
            self.rederive_target();
        }
    }

    /// Sets the boost ceiling in psi, clamped to 0..=25.
    pub fn set_boost_pressure(&mut self, psi: f64) {
        if !psi.is_finite() {
            trace!("non-finite boost pressure ignored");
            return;
        }
        let max_boost = psi.clamp(0.0, MAX_BOOST_PSI);
        self.state.max_boost = max_boost;
        self.state.boost = self.state.boost.min(max_boost);
        self.state.target_boost = self.state.target_boost.min(max_boost);
    }

    pub fn reset_session(&mut self) {
        session::reset(&mut self.state, &mut self.launch);
        debug!("session reset");
    }

    pub fn apply(&mut self, command: DriverCommand) {
        match command {
            DriverCommand::StartEngine => {
                self.start_engine();
            }
            DriverCommand::StopEngine => self.stop_engine(),
            DriverCommand::Throttle(value) => self.set_throttle(value),
            DriverCommand::Brake(value) => self.set_brake(value),
            DriverCommand::ShiftUp => {
                self.shift_up();
            }
            DriverCommand::ShiftDown => {
                self.shift_down();
            }
            DriverCommand::ToggleClutch => self.toggle_clutch(),
            DriverCommand::SetGear(gear) => {
                self.set_gear(gear);
            }
            DriverCommand::RevLimiter(rpm) => self.set_rev_limiter(rpm),
            DriverCommand::BoostPressure(psi) => self.set_boost_pressure(psi),
            DriverCommand::ResetSession => self.reset_session(),
        }
    }

    /// Advances the simulation by `dt` seconds. Negative or non-finite
    /// steps are treated as zero.
    pub fn update(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let state = &mut self.state;

        if gearbox::advance_lockout(state, dt) && state.is_running {
            state.target_rpm =
                revs::derive_target(state.throttle, state.idle_rpm, state.redline_rpm);
        }

        revs::step(state, &mut self.jitter, dt);
        boost::step(state, self.config.induction, dt);

        let output = powertrain::output(
            state.rpm,
            state.throttle,
            state.boost,
            self.config.peak_torque,
            self.config.peak_torque_rpm,
        );
        state.torque = output.torque;
        state.power = output.power;

        let ran_dry = fuel::step(
            state,
            self.config.fuel_base_lph,
            self.config.tank_capacity_l,
            dt,
        );
        if ran_dry && state.is_running {
            debug!("fuel exhausted, engine stalled");
            state.is_running = false;
            state.throttle = 0.0;
            state.target_rpm = 0.0;
        }

        thermal::step(state, dt);

        let speed_before = state.speed;
        session::update_speed(state, dt);
        session::update_wear(state, dt);
        self.launch.track(state, speed_before, dt);
    }

    fn rederive_target(&mut self) {
        self.state.target_rpm = revs::derive_target(
            self.state.throttle,
            self.state.idle_rpm,
            self.state.redline_rpm,
        );
    }

    /// Full-throttle torque (Nm) at the current boost level.
    pub fn torque_curve(&self, start_rpm: f64, end_rpm: f64, step_rpm: f64) -> Vec<CurvePoint> {
        powertrain::torque_curve(&self.dyno_sweep(start_rpm, end_rpm, step_rpm))
    }

    /// Full-throttle power (hp) at the current boost level.
    pub fn power_curve(&self, start_rpm: f64, end_rpm: f64, step_rpm: f64) -> Vec<CurvePoint> {
        powertrain::power_curve(&self.dyno_sweep(start_rpm, end_rpm, step_rpm))
    }

    fn dyno_sweep(&self, start: f64, end: f64, step: f64) -> Vec<(f64, powertrain::Output)> {
        powertrain::dyno_sweep(
            start,
            end,
            step,
            self.state.redline_rpm,
            self.state.boost,
            self.config.peak_torque,
            self.config.peak_torque_rpm,
        )
    }

    pub fn rpm(&self) -> f64 {
        self.state.rpm
    }

    pub fn speed(&self) -> f64 {
        self.state.speed
    }

    pub fn torque(&self) -> f64 {
        self.state.torque
    }

    pub fn power(&self) -> f64 {
        self.state.power
    }

    pub fn boost(&self) -> f64 {
        self.state.boost
    }

    pub fn max_boost(&self) -> f64 {
        self.state.max_boost
    }

    pub fn current_gear(&self) -> i8 {
        self.state.gear
    }

    pub fn is_clutch_engaged(&self) -> bool {
        self.state.clutch_engaged
    }

    pub fn is_shifting(&self) -> bool {
        self.state.is_shifting
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn throttle_position(&self) -> f64 {
        self.state.throttle
    }

    pub fn redline_rpm(&self) -> f64 {
        self.state.redline_rpm
    }

    pub fn oil_temp(&self) -> f64 {
        self.state.oil_temp
    }

    pub fn coolant_temp(&self) -> f64 {
        self.state.coolant_temp
    }

    pub fn intake_temp(&self) -> f64 {
        self.state.intake_temp
    }

    pub fn fuel_level(&self) -> f64 {
        self.state.fuel_level
    }

    pub fn fuel_consumption_rate(&self) -> f64 {
        self.state.fuel_consumption_rate
    }

    pub fn engine_wear(&self) -> f64 {
        self.state.engine_wear
    }

    pub fn total_distance(&self) -> f64 {
        self.state.total_distance
    }

    pub fn runtime(&self) -> f64 {
        self.state.runtime
    }

    pub fn best_0_to_100(&self) -> f64 {
        self.state.best_0_to_100
    }

    pub fn best_quarter_mile(&self) -> f64 {
        self.state.best_quarter_mile
    }
}

fn unit_interval(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
