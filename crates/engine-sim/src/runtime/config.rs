use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub show_help: bool,
    pub run_seconds: Option<f64>,
    pub preset: String,
    pub engine_config: Option<PathBuf>,
    pub script_path: Option<PathBuf>,
    pub scenario: String,
    pub rate_hz: f64,
    pub max_dt: f64,
    pub seed: Option<u64>,
    pub report_ms: u64,
    pub fast: bool,
    pub json_logs: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            show_help: false,
            run_seconds: None,
            preset: "inline4-turbo".to_string(),
            engine_config: None,
            script_path: None,
            scenario: "launch".to_string(),
            rate_hz: 60.0,
            max_dt: 0.1,
            seed: None,
            report_ms: 500,
            fast: false,
            json_logs: false,
            log_file: None,
        }
    }
}

/// Longest run accepted, one simulated day.
pub const MAX_RUN_SECONDS: f64 = 86_400.0;
pub const MIN_RATE_HZ: f64 = 1.0;
pub const MAX_RATE_HZ: f64 = 10_000.0;
pub const MAX_STEP_SECONDS: f64 = 1.0;
pub const MAX_REPORT_MS: u64 = 60_000;

/// Parses a number in `(0, max]`.
fn bounded(value: &str, max: f64) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| *v > 0.0 && *v <= max)
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::from_args(&args)
    }

    pub fn from_args(args: &[String]) -> Self {
        let mut cfg = RuntimeConfig::default();
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--run-seconds" => {
                    if i + 1 < args.len() {
                        cfg.run_seconds = bounded(&args[i + 1], MAX_RUN_SECONDS);
                        i += 1;
                    }
                }
                "--preset" => {
                    if i + 1 < args.len() {
                        cfg.preset = args[i + 1].clone();
                        i += 1;
                    }
                }
                "--engine-config" => {
                    if i + 1 < args.len() {
                        cfg.engine_config = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    }
                }
                "--script" => {
                    if i + 1 < args.len() {
                        cfg.script_path = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    }
                }
                "--scenario" => {
                    if i + 1 < args.len() {
                        cfg.scenario = args[i + 1].clone();
                        i += 1;
                    }
                }
                "--rate-hz" => {
                    if i + 1 < args.len() {
                        cfg.rate_hz = bounded(&args[i + 1], MAX_RATE_HZ)
                            .filter(|hz| *hz >= MIN_RATE_HZ)
                            .unwrap_or(cfg.rate_hz);
                        i += 1;
                    }
                }
                "--max-dt" => {
                    if i + 1 < args.len() {
                        cfg.max_dt = bounded(&args[i + 1], MAX_STEP_SECONDS).unwrap_or(cfg.max_dt);
                        i += 1;
                    }
                }
                "--seed" => {
                    if i + 1 < args.len() {
                        cfg.seed = args[i + 1].parse::<u64>().ok();
                        i += 1;
                    }
                }
                "--report-ms" => {
                    if i + 1 < args.len() {
                        cfg.report_ms = args[i + 1]
                            .parse::<u64>()
                            .ok()
                            .filter(|ms| (1..=MAX_REPORT_MS).contains(ms))
                            .unwrap_or(cfg.report_ms);
                        i += 1;
                    }
                }
                "--fast" => {
                    cfg.fast = true;
                }
                "--json-logs" => {
                    cfg.json_logs = true;
                }
                "--log-file" => {
                    if i + 1 < args.len() {
                        cfg.log_file = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    }
                }
                "--help" | "-h" => {
                    cfg.show_help = true;
                    break;
                }
                _ => {}
            }
            i += 1;
        }
        cfg
    }

    pub fn print_help() {
        println!(
            r#"engine-sim - Headless engine and drivetrain simulator

USAGE:
    engine-sim [OPTIONS]

OPTIONS:
    --preset <NAME>         Engine preset (inline4-turbo|v6-na|v8-na|diesel-i4) [default: inline4-turbo]
    --engine-config <PATH>  Load the engine from a JSON file instead of a preset
    --scenario <NAME>       Built-in drive script (idle|redline|launch) [default: launch]
    --script <PATH>         Load the drive script from a JSON file instead of a scenario
    --run-seconds <SECS>    Stop after a fixed duration, at most 86400 [default: script length + 2s]
    --rate-hz <HZ>          Simulation tick rate, 1 to 10000 [default: 60]
    --max-dt <SECS>         Largest timestep handed to the engine, at most 1 [default: 0.1]
    --seed <N>              Override the idle jitter seed
    --report-ms <MS>        Telemetry report interval, 1 to 60000 [default: 500]
    --fast                  Step the simulation unpaced instead of in real time
    --json-logs             Output logs in JSON format (for log aggregation)
    --log-file <PATH>       Also write JSON logs to a file
    -h, --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log filter (e.g., RUST_LOG=debug,engine_core=trace)

EXAMPLES:
    # Free-rev a V8 in neutral
    engine-sim --preset v8-na --scenario redline

    # Replay a recorded drive as fast as possible
    engine-sim --script drive.json --fast --json-logs
"#
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("engine-sim")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn defaults_without_flags() {
        let cfg = RuntimeConfig::from_args(&args(&[]));
        assert!(!cfg.show_help);
        assert_eq!(cfg.preset, "inline4-turbo");
        assert_eq!(cfg.scenario, "launch");
        assert_eq!(cfg.rate_hz, 60.0);
        assert!(cfg.run_seconds.is_none());
    }

    #[test]
    fn parses_every_flag() {
        let cfg = RuntimeConfig::from_args(&args(&[
            "--preset", "v8-na",
            "--engine-config", "engine.json",
            "--script", "drive.json",
            "--scenario", "redline",
            "--run-seconds", "2.5",
            "--rate-hz", "120",
            "--max-dt", "0.05",
            "--seed", "42",
            "--report-ms", "250",
            "--fast",
            "--json-logs",
            "--log-file", "sim.log",
        ]));
        assert_eq!(cfg.preset, "v8-na");
        assert_eq!(cfg.engine_config, Some(PathBuf::from("engine.json")));
        assert_eq!(cfg.script_path, Some(PathBuf::from("drive.json")));
        assert_eq!(cfg.scenario, "redline");
        assert_eq!(cfg.run_seconds, Some(2.5));
        assert_eq!(cfg.rate_hz, 120.0);
        assert_eq!(cfg.max_dt, 0.05);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.report_ms, 250);
        assert!(cfg.fast);
        assert!(cfg.json_logs);
        assert_eq!(cfg.log_file, Some(PathBuf::from("sim.log")));
    }

    #[test]
    fn bad_numbers_keep_defaults() {
        let cfg = RuntimeConfig::from_args(&args(&[
            "--rate-hz", "-5", "--max-dt", "nan", "--run-seconds", "0",
        ]));
        assert_eq!(cfg.rate_hz, 60.0);
        assert_eq!(cfg.max_dt, 0.1);
        assert!(cfg.run_seconds.is_none());
    }

    #[test]
    fn out_of_range_durations_keep_defaults() {
        let cfg = RuntimeConfig::from_args(&args(&[
            "--run-seconds", "1e300", "--rate-hz", "1e-300", "--max-dt", "5",
        ]));
        assert!(cfg.run_seconds.is_none());
        assert_eq!(cfg.rate_hz, 60.0);
        assert_eq!(cfg.max_dt, 0.1);

        let cfg = RuntimeConfig::from_args(&args(&[
            "--rate-hz", "1e9", "--run-seconds", "inf", "--report-ms", "0",
        ]));
        assert_eq!(cfg.rate_hz, 60.0);
        assert!(cfg.run_seconds.is_none());
        assert_eq!(cfg.report_ms, 500);
    }

    #[test]
    fn help_stops_parsing() {
        let cfg = RuntimeConfig::from_args(&args(&["-h", "--fast"]));
        assert!(cfg.show_help);
        assert!(!cfg.fast);
    }
}
