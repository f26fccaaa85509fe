pub mod boost;
pub mod command;
pub mod config;
pub mod control_loop;
pub mod engine;
mod engine_proptest;
pub mod error;
pub mod fuel;
pub mod gearbox;
pub mod powertrain;
pub mod revs;
pub mod session;
pub mod state;
pub mod sync;
pub mod thermal;

pub use command::DriverCommand;
pub use config::{EngineConfig, InductionKind};
pub use control_loop::{ExecutionStats, InputSource, LoopConfig, TickLoop};
pub use engine::Engine;
pub use error::ConfigError;
pub use powertrain::CurvePoint;
pub use state::EngineState;
pub use sync::{snapshot_exchange, Published, SnapshotPublisher, SnapshotReader};
