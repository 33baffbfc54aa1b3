//! Run lifecycle management: one dedicated worker thread per run, progress over a channel,
//! cooperative cancellation and a wall-clock quota.

#[cfg(test)]
#[path = "../../tests/unit/solver/controller_test.rs"]
mod controller_test;

use crate::analysis::{
    analyze_front, pareto_front, recommend, FrontMetrics, Recommendation, Scalarization,
};
use crate::error::{EngineError, EngineResult};
use crate::evaluation::{ConstraintEvaluator, EvaluationParams};
use crate::models::{Candidate, FleetSnapshot};
use crate::solver::config::SolverConfig;
use crate::solver::evolution::EvolutionSimulator;
use crate::solver::telemetry::{ProgressEvent, Telemetry};
use crate::solver::termination::{
    CompositeTermination, MaxGeneration, MinVariation, StopReason, Termination,
};
use crate::utils::{DefaultRandom, Environment, InfoLogger, TimeQuota, Timer};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use time::OffsetDateTime;

/// How generation log lines are throttled.
const LOG_EVERY_GENERATIONS: usize = 25;

/// Terminal status of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// The search ran to convergence or its generation budget.
    Completed,
    /// The wall-clock limit cut the search short; the last population is kept.
    TimedOut,
    /// The run was cancelled; the last population is kept.
    Cancelled,
    /// The worker hit an unrecoverable fault.
    Failed,
}

/// Everything a finished run hands back to the caller.
pub struct OptimizationResult {
    /// Identifier the run was started under.
    pub run_id: String,
    /// Terminal status.
    pub status: RunStatus,
    /// Which criterion stopped the search; absent for failed runs.
    pub stop_reason: Option<StopReason>,
    /// Diagnostic detail of a failed run.
    pub failure: Option<String>,
    /// The rank-zero front of the terminal population.
    pub pareto_front: Vec<Candidate>,
    /// Metrics over the front.
    pub metrics: FrontMetrics,
    /// The best-compromise pick, absent when no feasible member exists.
    pub recommendation: Option<Recommendation>,
    /// Completed generation count.
    pub generations: usize,
    /// When the worker started.
    pub started_at: OffsetDateTime,
    /// When the worker finished.
    pub finished_at: OffsetDateTime,
    /// Worker wall-clock time.
    pub duration_ms: u128,
}

/// A handle on a running optimization.
pub struct RunHandle {
    run_id: String,
    cancelled: Arc<AtomicBool>,
    progress: Receiver<ProgressEvent>,
    worker: JoinHandle<OptimizationResult>,
}

impl RunHandle {
    /// Returns the run identifier.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Returns the progress event receiver. Events arrive at generation boundaries.
    pub fn progress(&self) -> &Receiver<ProgressEvent> {
        &self.progress
    }

    /// Requests cooperative cancellation. Safe to call repeatedly and after completion.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Waits for the worker and returns the result. A worker panic surfaces as a failed run,
    /// never as a propagated panic.
    pub fn join(self) -> OptimizationResult {
        let run_id = self.run_id;
        self.worker.join().unwrap_or_else(move |_| {
            let now = OffsetDateTime::now_utc();
            OptimizationResult {
                run_id,
                status: RunStatus::Failed,
                stop_reason: None,
                failure: Some("worker thread panicked".to_string()),
                pareto_front: Vec::new(),
                metrics: analyze_front(&[]),
                recommendation: None,
                generations: 0,
                started_at: now,
                finished_at: now,
                duration_ms: 0,
            }
        })
    }
}

/// Starts, tracks and cancels optimization runs. At most one active run per run id.
pub struct ExecutionController {
    logger: InfoLogger,
    active: Arc<Mutex<FxHashMap<String, Arc<AtomicBool>>>>,
}

impl Default for ExecutionController {
    fn default() -> Self {
        Self::new(Environment::default().logger)
    }
}

impl ExecutionController {
    /// Creates a controller which logs through the given logger.
    pub fn new(logger: InfoLogger) -> Self {
        Self { logger, active: Arc::new(Mutex::new(FxHashMap::default())) }
    }

    /// Validates the configuration and spawns a worker thread for the run.
    ///
    /// Fails fast with [`EngineError::InvalidConfiguration`] before any search work, and with
    /// [`EngineError::DuplicateRun`] while a run with the same id is still active.
    pub fn start(
        &self,
        run_id: &str,
        snapshot: Arc<FleetSnapshot>,
        config: SolverConfig,
    ) -> EngineResult<RunHandle> {
        config.validate(snapshot.trainset_count())?;

        let cancelled = Arc::new(AtomicBool::new(false));
        {
            let mut active = self.active.lock().map_err(|_| {
                EngineError::internal("run registry lock poisoned")
            })?;
            if active.contains_key(run_id) {
                return Err(EngineError::DuplicateRun { run_id: run_id.to_string() });
            }
            active.insert(run_id.to_string(), cancelled.clone());
        }

        let (progress_sender, progress_receiver) = channel();
        let environment = Arc::new(Environment::new(
            Arc::new(match config.seed {
                Some(seed) => DefaultRandom::new_with_seed(seed),
                None => DefaultRandom::default(),
            }),
            config.max_runtime_seconds.map(|limit| {
                Arc::new(TimeQuota::new(limit)) as Arc<dyn crate::utils::Quota>
            }),
            self.logger.clone(),
        ));
        let telemetry = Telemetry::new(
            run_id,
            self.logger.clone(),
            Some(progress_sender),
            LOG_EVERY_GENERATIONS,
        );
        let termination = CompositeTermination::new(vec![
            Box::new(MinVariation::default()) as Box<dyn Termination>,
            Box::new(MaxGeneration::new(config.effective_max_generations())),
        ]);

        let worker_run_id = run_id.to_string();
        let worker_cancelled = cancelled.clone();
        let registry = self.active.clone();
        let worker = std::thread::Builder::new()
            .name(format!("induct-run-{run_id}"))
            .spawn(move || {
                let result = run_worker(
                    worker_run_id.clone(),
                    snapshot,
                    config,
                    environment,
                    telemetry,
                    termination,
                    worker_cancelled,
                );
                if let Ok(mut active) = registry.lock() {
                    active.remove(&worker_run_id);
                }
                result
            })
            .map_err(|err| EngineError::internal(format!("cannot spawn worker: {err}")))?;

        Ok(RunHandle { run_id: run_id.to_string(), cancelled, progress: progress_receiver, worker })
    }

    /// Requests cancellation of an active run. A finished or unknown run id is a no-op, so
    /// the call is idempotent.
    pub fn cancel(&self, run_id: &str) {
        if let Ok(active) = self.active.lock() {
            if let Some(flag) = active.get(run_id) {
                flag.store(true, Ordering::SeqCst);
            }
        }
    }

    /// Returns true while a run with the given id is active.
    pub fn is_active(&self, run_id: &str) -> bool {
        self.active.lock().map(|active| active.contains_key(run_id)).unwrap_or(false)
    }
}

fn run_worker(
    run_id: String,
    snapshot: Arc<FleetSnapshot>,
    config: SolverConfig,
    environment: Arc<Environment>,
    telemetry: Telemetry,
    termination: CompositeTermination,
    cancelled: Arc<AtomicBool>,
) -> OptimizationResult {
    let started_at = OffsetDateTime::now_utc();
    let timer = Timer::start();

    let params = EvaluationParams {
        min_service_count: config.min_service_count,
        ..EvaluationParams::default()
    };
    let evaluator = Arc::new(ConstraintEvaluator::new(snapshot.clone(), params));
    let scalarization = match &config.objective_weights {
        Some(weights) => Scalarization::WeightedSum(weights.clone()),
        None => Scalarization::IdealPoint,
    };

    let simulator = EvolutionSimulator::new(
        evaluator,
        environment,
        telemetry,
        termination,
        config.effective_population_size(),
        config.mutation_rate,
        cancelled,
    );

    match simulator.run() {
        Ok(outcome) => {
            let front = pareto_front(&outcome.population);
            let metrics = analyze_front(&front);
            let recommendation = recommend(&front, &snapshot, &scalarization);
            let status = match outcome.stop_reason {
                StopReason::Timeout => RunStatus::TimedOut,
                StopReason::Cancelled => RunStatus::Cancelled,
                StopReason::Convergence | StopReason::GenerationBudget => RunStatus::Completed,
            };

            OptimizationResult {
                run_id,
                status,
                stop_reason: Some(outcome.stop_reason),
                failure: None,
                pareto_front: front,
                metrics,
                recommendation,
                generations: outcome.generations,
                started_at,
                finished_at: OffsetDateTime::now_utc(),
                duration_ms: timer.elapsed_millis(),
            }
        }
        Err(error) => OptimizationResult {
            run_id,
            status: RunStatus::Failed,
            stop_reason: None,
            failure: Some(error.to_string()),
            pareto_front: Vec::new(),
            metrics: analyze_front(&[]),
            recommendation: None,
            generations: 0,
            started_at,
            finished_at: OffsetDateTime::now_utc(),
            duration_ms: timer.elapsed_millis(),
        },
    }
}
