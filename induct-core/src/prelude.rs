//! Convenience re-exports of the types needed to run a full planning cycle.

pub use crate::error::{ConfigViolation, EngineError, EngineResult};

pub use crate::models::{
    Assignment, Candidate, FleetSnapshot, HardViolation, IneligibilityReason, ObjectiveVector,
    ServiceEligibility, SnapshotBuilder, TargetState,
};

pub use crate::evaluation::{ConstraintEvaluator, EvaluationParams, InductionObjective};

pub use crate::solver::{
    ExecutionController, ObjectiveWeights, OptimizationResult, ProgressEvent, RunHandle,
    RunStatus, SearchMode, SolverConfig, StopReason,
};

pub use crate::analysis::{FrontMetrics, Recommendation, Scalarization};

pub use crate::format::{
    create_result, deserialize_problem, serialize_result, InductionProblem, InductionResult,
};

pub use crate::utils::{DefaultRandom, Environment, Float, InfoLogger, Quota, Random, TimeQuota};
