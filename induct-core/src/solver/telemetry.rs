//! Run observability: generation log lines and progress events for the caller.

#[cfg(test)]
#[path = "../../tests/unit/solver/telemetry_test.rs"]
mod telemetry_test;

use crate::models::ObjectiveVector;
use crate::solver::termination::StopReason;
use crate::utils::{InfoLogger, Timer};
use std::sync::mpsc::Sender;

/// A progress snapshot emitted at a generation boundary.
#[derive(Clone, Debug)]
pub struct ProgressEvent {
    /// Identifier of the originating run.
    pub run_id: String,
    /// Completed generation count.
    pub generation: usize,
    /// Objectives of the current best compromise, absent while no candidate exists.
    pub best_objectives: Option<ObjectiveVector>,
    /// Feasible candidates in the current population.
    pub feasible_count: usize,
    /// Wall-clock time since the run started.
    pub elapsed_ms: u128,
}

/// Emits log lines through the environment logger and progress events over an optional
/// channel. A dropped receiver never fails the run.
pub struct Telemetry {
    run_id: String,
    logger: InfoLogger,
    progress: Option<Sender<ProgressEvent>>,
    log_every: usize,
}

impl Telemetry {
    /// Creates telemetry for one run. Generation lines are logged every `log_every`
    /// generations; progress events go out every generation.
    pub fn new(
        run_id: &str,
        logger: InfoLogger,
        progress: Option<Sender<ProgressEvent>>,
        log_every: usize,
    ) -> Self {
        Self { run_id: run_id.to_string(), logger, progress, log_every: log_every.max(1) }
    }

    /// Reports the initial population.
    pub fn on_initial(&self, population_size: usize, feasible_count: usize, timer: &Timer) {
        (self.logger)(&format!(
            "[{}s] created initial population of {population_size} candidates ({feasible_count} feasible)",
            timer.elapsed_secs()
        ));
    }

    /// Reports a completed generation.
    pub fn on_generation(
        &self,
        generation: usize,
        best_objectives: Option<ObjectiveVector>,
        feasible_count: usize,
        timer: &Timer,
    ) {
        if generation % self.log_every == 0 {
            let best = best_objectives
                .as_ref()
                .map(|objectives| {
                    format!(
                        "readiness: {:.2}, cost: {:.2}, exposure: {:.2}",
                        objectives.service_readiness,
                        objectives.maintenance_cost,
                        objectives.branding_exposure
                    )
                })
                .unwrap_or_else(|| "none".to_string());
            (self.logger)(&format!(
                "[{}s] generation {generation}, feasible: {feasible_count}, best: [{best}]",
                timer.elapsed_secs()
            ));
        }

        if let Some(progress) = &self.progress {
            let _ = progress.send(ProgressEvent {
                run_id: self.run_id.clone(),
                generation,
                best_objectives,
                feasible_count,
                elapsed_ms: timer.elapsed_millis(),
            });
        }
    }

    /// Reports the final outcome.
    pub fn on_stop(&self, reason: StopReason, generation: usize, front_size: usize, timer: &Timer) {
        (self.logger)(&format!(
            "[{}s] stopped after generation {generation} ({reason:?}), front size: {front_size}",
            timer.elapsed_secs()
        ));
    }
}
