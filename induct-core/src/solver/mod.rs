//! The optimization run lifecycle: configuration, the evolutionary search itself,
//! termination criteria, telemetry and the controller which owns worker threads.

pub mod config;
pub mod controller;
pub mod evolution;
pub mod telemetry;
pub mod termination;

pub use self::config::{ObjectiveWeights, SearchMode, SolverConfig};
pub use self::controller::{ExecutionController, OptimizationResult, RunHandle, RunStatus};
pub use self::evolution::{EvolutionSimulator, SearchOutcome};
pub use self::telemetry::{ProgressEvent, Telemetry};
pub use self::termination::StopReason;
