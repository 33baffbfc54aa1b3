//! The elitist multi-objective search loop over induction candidates.
//!
//! Each generation selects parents by binary tournament on (rank, crowding distance),
//! produces offspring by uniform assignment crossover with bay-collision repair plus a
//! low-rate mutation, evaluates offspring in parallel, merges parents and offspring and
//! truncates back to the population size by non-dominated sort and crowding distance.
//! Candidates with identical objective vectors are kept only once per merge so the front
//! does not silt up with clones. Cancellation and the wall-clock quota are checked at
//! generation boundaries only.

#[cfg(test)]
#[path = "../../tests/unit/solver/evolution_test.rs"]
mod evolution_test;

use crate::algorithms::nsga2::{select_and_rank, Objective};
use crate::error::{EngineError, EngineResult};
use crate::evaluation::{ConstraintEvaluator, InductionObjective};
use crate::models::{Assignment, BayKind, Candidate, FleetSnapshot, TargetState};
use crate::solver::telemetry::Telemetry;
use crate::solver::termination::{CompositeTermination, StopReason};
use crate::utils::{parallel_into_collect, Environment, Float, Timer};
use rustc_hash::FxHashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Probability that an eligible trainset starts in revenue service.
const INITIAL_SERVICE_BIAS: Float = 0.7;
/// Probability that a crossover gene comes from the second parent.
const CROSSOVER_MIX_RATE: Float = 0.5;

/// Mutable state shared with termination criteria.
pub struct EvolutionContext {
    /// Completed generation count.
    pub generation: usize,
    /// Mean objective vector of the best front, one entry per completed generation plus the
    /// initial population.
    pub front_mean_history: Vec<[Float; 3]>,
}

/// A population member annotated with its latest ranking.
#[derive(Clone)]
struct RankedCandidate {
    candidate: Candidate,
    rank: usize,
    crowding: Float,
}

/// What the search loop hands back to the controller.
pub struct SearchOutcome {
    /// The terminal population, best ranks first.
    pub population: Vec<Candidate>,
    /// Which criterion stopped the search.
    pub stop_reason: StopReason,
    /// Completed generation count.
    pub generations: usize,
}

/// One full evolutionary search over a fleet snapshot.
pub struct EvolutionSimulator {
    evaluator: Arc<ConstraintEvaluator>,
    objective: InductionObjective,
    environment: Arc<Environment>,
    telemetry: Telemetry,
    termination: CompositeTermination,
    population_size: usize,
    mutation_rate: Float,
    cancelled: Arc<AtomicBool>,
}

impl EvolutionSimulator {
    /// Creates a simulator. The cancellation flag is owned by the controller and may be set
    /// from any thread.
    pub fn new(
        evaluator: Arc<ConstraintEvaluator>,
        environment: Arc<Environment>,
        telemetry: Telemetry,
        termination: CompositeTermination,
        population_size: usize,
        mutation_rate: Float,
        cancelled: Arc<AtomicBool>,
    ) -> Self {
        Self {
            evaluator,
            objective: InductionObjective::default(),
            environment,
            telemetry,
            termination,
            population_size,
            mutation_rate,
            cancelled,
        }
    }

    /// Runs the search to one of its stopping conditions.
    ///
    /// An empty feasible set is a valid outcome and reported as such, but an unrepairable
    /// offspring aborts the run with [`EngineError::InternalSearch`].
    pub fn run(self) -> EngineResult<SearchOutcome> {
        let timer = Timer::start();

        let assignments = (0..self.population_size)
            .map(|_| self.create_random_assignments())
            .collect::<EngineResult<Vec<_>>>()?;
        let evaluator = self.evaluator.clone();
        let candidates =
            parallel_into_collect(assignments, move |assignment| evaluator.evaluate(assignment));
        let mut population = self.rank(candidates);

        let feasible = count_feasible(&population);
        self.telemetry.on_initial(population.len(), feasible, &timer);

        let mut ctx = EvolutionContext { generation: 0, front_mean_history: Vec::new() };
        ctx.front_mean_history.push(front_means(&population));

        let stop_reason = loop {
            if self.cancelled.load(Ordering::SeqCst) {
                break StopReason::Cancelled;
            }
            if self.environment.quota.as_ref().is_some_and(|quota| quota.is_reached()) {
                break StopReason::Timeout;
            }
            if let Some(reason) = self.termination.check(&ctx) {
                break reason;
            }

            population = self.next_generation(population)?;
            ctx.generation += 1;
            ctx.front_mean_history.push(front_means(&population));

            self.telemetry.on_generation(
                ctx.generation,
                best_compromise(&population, &self.objective).map(|best| best.objectives().clone()),
                count_feasible(&population),
                &timer,
            );
        };

        let front_size = population.iter().filter(|member| member.rank == 0).count();
        self.telemetry.on_stop(stop_reason, ctx.generation, front_size, &timer);

        Ok(SearchOutcome {
            population: population.into_iter().map(|member| member.candidate).collect(),
            stop_reason,
            generations: ctx.generation,
        })
    }

    fn next_generation(&self, population: Vec<RankedCandidate>) -> EngineResult<Vec<RankedCandidate>> {
        let offspring = (0..self.population_size)
            .map(|_| {
                let first = self.tournament(&population);
                let second = self.tournament(&population);
                let mut child = self.crossover(first, second)?;
                if self.environment.random.is_hit(self.mutation_rate) {
                    self.mutate(&mut child);
                }
                Ok(child)
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let evaluator = self.evaluator.clone();
        let offspring =
            parallel_into_collect(offspring, move |assignment| evaluator.evaluate(assignment));

        let mut merged: Vec<Candidate> =
            population.into_iter().map(|member| member.candidate).collect();
        merged.extend(offspring);
        let merged = eliminate_duplicates(merged);

        Ok(self.rank(merged))
    }

    fn rank(&self, candidates: Vec<Candidate>) -> Vec<RankedCandidate> {
        let ranked = select_and_rank(&candidates, self.population_size, &self.objective)
            .iter()
            .map(|assigned| (assigned.index, assigned.rank, assigned.crowding_distance))
            .collect::<Vec<_>>();

        let mut slots: Vec<Option<Candidate>> = candidates.into_iter().map(Some).collect();
        ranked
            .into_iter()
            .map(|(index, rank, crowding)| RankedCandidate {
                candidate: slots[index].take().unwrap_or_else(|| unreachable!()),
                rank,
                crowding,
            })
            .collect()
    }

    /// Binary tournament: lower rank wins, equal ranks fall back to larger crowding distance.
    fn tournament<'a>(&self, population: &'a [RankedCandidate]) -> &'a RankedCandidate {
        let random = self.environment.random.as_ref();
        let first = &population[random.uniform_int(0, population.len() as i32 - 1) as usize];
        let second = &population[random.uniform_int(0, population.len() as i32 - 1) as usize];

        if first.rank != second.rank {
            if first.rank < second.rank { first } else { second }
        } else if first.crowding >= second.crowding {
            first
        } else {
            second
        }
    }

    /// Uniform crossover over trainsets followed by bay-collision repair. Both parents are
    /// collision-free, so only genes taken from the second parent can collide.
    fn crossover(
        &self,
        first: &RankedCandidate,
        second: &RankedCandidate,
    ) -> EngineResult<Vec<Assignment>> {
        let random = self.environment.random.as_ref();
        let mut child: Vec<Assignment> = first
            .candidate
            .assignments()
            .iter()
            .zip(second.candidate.assignments())
            .map(|(a, b)| if random.is_hit(CROSSOVER_MIX_RATE) { b.clone() } else { a.clone() })
            .collect();

        self.repair(&mut child)?;

        Ok(child)
    }

    /// Reassigns every trainset stabled in an already-taken bay. Prefers a free bay matching
    /// the current state, then switches to another reachable state with a free matching bay.
    /// An ineligible trainset is never switched into service.
    fn repair(&self, assignments: &mut [Assignment]) -> EngineResult<()> {
        let snapshot = self.evaluator.snapshot();
        let mut used = vec![false; snapshot.bays().len()];
        let colliding: Vec<usize> = assignments
            .iter()
            .enumerate()
            .filter_map(|(idx, assignment)| {
                if used[assignment.bay] {
                    Some(idx)
                } else {
                    used[assignment.bay] = true;
                    None
                }
            })
            .collect();

        for idx in colliding {
            let trainset = assignments[idx].trainset;
            let current = assignments[idx].state;
            let mut states = vec![current];
            states.extend(
                TargetState::all()
                    .into_iter()
                    .filter(|state| *state != current)
                    .filter(|state| {
                        *state != TargetState::Service
                            || snapshot.eligibility(trainset).is_eligible()
                    }),
            );

            let replacement = states.into_iter().find_map(|state| {
                self.pick_free_bay(&used, state.compatible_bay()).map(|bay| (state, bay))
            });

            match replacement {
                Some((state, bay)) => {
                    used[bay] = true;
                    assignments[idx].state = state;
                    assignments[idx].bay = bay;
                }
                None => {
                    return Err(EngineError::internal(format!(
                        "no free bay left for trainset {} during offspring repair",
                        snapshot.trainset(trainset).id
                    )))
                }
            }
        }

        Ok(())
    }

    /// Reassigns one random trainset's state and bay. The new bay is free among the other
    /// assignments; a kind mismatch is tolerated and priced by the evaluator.
    fn mutate(&self, assignments: &mut [Assignment]) {
        let snapshot = self.evaluator.snapshot();
        let random = self.environment.random.as_ref();

        let idx = random.uniform_int(0, assignments.len() as i32 - 1) as usize;
        let trainset = assignments[idx].trainset;

        let states: Vec<TargetState> = TargetState::all()
            .into_iter()
            .filter(|state| {
                *state != TargetState::Service || snapshot.eligibility(trainset).is_eligible()
            })
            .collect();
        let state = states[random.uniform_int(0, states.len() as i32 - 1) as usize];

        let mut used = vec![false; snapshot.bays().len()];
        for (other_idx, assignment) in assignments.iter().enumerate() {
            if other_idx != idx {
                used[assignment.bay] = true;
            }
        }

        let bay = self
            .pick_free_bay(&used, state.compatible_bay())
            .or_else(|| self.pick_free_bay(&used, snapshot.bay(assignments[idx].bay).kind))
            .unwrap_or(assignments[idx].bay);

        assignments[idx].state = state;
        assignments[idx].bay = bay;
    }

    fn pick_free_bay(&self, used: &[bool], kind: BayKind) -> Option<usize> {
        let snapshot = self.evaluator.snapshot();
        let free: Vec<usize> = snapshot
            .bays_of_kind(kind)
            .iter()
            .copied()
            .filter(|&bay| !used[bay])
            .collect();

        match free.len() {
            0 => None,
            1 => Some(free[0]),
            len => {
                let pick = self.environment.random.uniform_int(0, len as i32 - 1) as usize;
                Some(free[pick])
            }
        }
    }

    /// Builds one random collision-free assignment vector. Service is favoured for eligible
    /// trainsets and never drawn for ineligible ones.
    fn create_random_assignments(&self) -> EngineResult<Vec<Assignment>> {
        let snapshot = self.evaluator.snapshot();
        let random = self.environment.random.as_ref();
        let mut used = vec![false; snapshot.bays().len()];

        let mut order: Vec<usize> = (0..snapshot.trainset_count()).collect();
        random.shuffle(&mut order);

        let mut assignments = vec![
            Assignment { trainset: 0, state: TargetState::Standby, bay: 0 };
            snapshot.trainset_count()
        ];
        for trainset in order {
            let state = if snapshot.eligibility(trainset).is_eligible() {
                if random.is_hit(INITIAL_SERVICE_BIAS) {
                    TargetState::Service
                } else if random.is_head_not_tails() {
                    TargetState::Standby
                } else {
                    TargetState::Inspection
                }
            } else if snapshot.open_card_cost(trainset) > 0. || random.is_head_not_tails() {
                TargetState::Inspection
            } else {
                TargetState::Standby
            };

            let bay = self
                .pick_free_bay(&used, state.compatible_bay())
                .or_else(|| self.pick_any_free_bay(&used))
                .ok_or_else(|| {
                    EngineError::internal(format!(
                        "no free bay left for trainset {} during initialization",
                        snapshot.trainset(trainset).id
                    ))
                })?;
            used[bay] = true;
            assignments[trainset] = Assignment { trainset, state, bay };
        }

        Ok(assignments)
    }

    fn pick_any_free_bay(&self, used: &[bool]) -> Option<usize> {
        let free: Vec<usize> =
            used.iter().enumerate().filter(|(_, taken)| !**taken).map(|(bay, _)| bay).collect();

        match free.len() {
            0 => None,
            1 => Some(free[0]),
            len => {
                let pick = self.environment.random.uniform_int(0, len as i32 - 1) as usize;
                Some(free[pick])
            }
        }
    }
}

/// Keeps the first candidate of every distinct (objective vector, violation measure) pair.
fn eliminate_duplicates(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = FxHashSet::default();
    candidates
        .into_iter()
        .filter(|candidate| {
            let objectives = candidate.objectives().as_array();
            let key = (
                objectives.map(Float::to_bits),
                candidate.violation_measure().to_bits(),
            );
            seen.insert(key)
        })
        .collect()
}

fn count_feasible(population: &[RankedCandidate]) -> usize {
    population.iter().filter(|member| member.candidate.is_feasible()).count()
}

/// Per-objective mean over the best front.
fn front_means(population: &[RankedCandidate]) -> [Float; 3] {
    let front: Vec<&RankedCandidate> =
        population.iter().filter(|member| member.rank == 0).collect();
    if front.is_empty() {
        return [0.; 3];
    }

    let mut sums = [0.; 3];
    for member in &front {
        let objectives = member.candidate.objectives().as_array();
        for (sum, value) in sums.iter_mut().zip(objectives) {
            *sum += value;
        }
    }
    sums.map(|sum| sum / front.len() as Float)
}

fn best_compromise<'a>(
    population: &'a [RankedCandidate],
    objective: &InductionObjective,
) -> Option<&'a Candidate> {
    population
        .iter()
        .filter(|member| member.rank == 0 && member.candidate.is_feasible())
        .map(|member| &member.candidate)
        .min_by(|a, b| {
            crate::utils::compare_floats(objective.fitness(a), objective.fitness(b))
        })
}
