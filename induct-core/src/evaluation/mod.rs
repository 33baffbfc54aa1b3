//! Turns raw assignment vectors into evaluated candidates and defines the three induction
//! objectives together with their dominance relation.
//!
//! Hard violations never remove a candidate from the population. Instead the dominance
//! relation orders candidates lexicographically: any feasible candidate beats any infeasible
//! one, among infeasible candidates a lower violation measure beats a higher one, and only
//! then objective dominance applies.

#[cfg(test)]
#[path = "../../tests/unit/evaluation/evaluation_test.rs"]
mod evaluation_test;

use crate::algorithms::math::get_cv;
use crate::algorithms::nsga2::{dominance_order, MultiObjective, Objective};
use crate::models::{
    Assignment, BrandingContract, Candidate, FleetSnapshot, HardViolation, ObjectiveVector,
    TargetState,
};
use crate::utils::{compare_floats, Float};
use std::cmp::Ordering;
use std::sync::Arc;

/// Distance driven on a typical revenue-service day, used to project mileage spread.
const NIGHTLY_SERVICE_KM: Float = 350.;
/// Exposure hours a serviced trainset accrues on the following day.
const SERVICE_EXPOSURE_HOURS: Float = 16.;
/// Upper bound on the urgency factor so expired contracts cannot drown the exposure signal.
const URGENCY_WEIGHT_CAP: Float = 10.;
/// Cost charged per serviced trainset stabled in a dirty bay beyond cleaning capacity.
const DIRTY_BAY_PENALTY: Float = 3.;
/// Scales the mileage coefficient of variation into severity-weight units.
const MILEAGE_CV_WEIGHT: Float = 100.;

/// Tunable evaluation constants.
#[derive(Clone, Debug)]
pub struct EvaluationParams {
    /// Minimum number of trainsets that must be assigned to revenue service.
    pub min_service_count: usize,
    /// Contract exposure fraction beyond which further service hours earn nothing.
    pub exposure_target: Float,
}

impl Default for EvaluationParams {
    fn default() -> Self {
        Self { min_service_count: 15, exposure_target: 0.75 }
    }
}

/// Evaluates assignment vectors against one snapshot. Construction precomputes the
/// per-trainset exposure gain so the per-candidate work stays linear in fleet size.
pub struct ConstraintEvaluator {
    snapshot: Arc<FleetSnapshot>,
    params: EvaluationParams,
    exposure_gain: Vec<Float>,
}

impl ConstraintEvaluator {
    /// Creates an evaluator bound to the given snapshot.
    pub fn new(snapshot: Arc<FleetSnapshot>, params: EvaluationParams) -> Self {
        let exposure_gain = (0..snapshot.trainset_count())
            .map(|idx| {
                snapshot
                    .contracts(idx)
                    .iter()
                    .map(|contract| contract_gain(contract, params.exposure_target))
                    .sum()
            })
            .collect();

        Self { snapshot, params, exposure_gain }
    }

    /// Returns the snapshot this evaluator is bound to.
    pub fn snapshot(&self) -> &Arc<FleetSnapshot> {
        &self.snapshot
    }

    /// Returns the evaluation parameters.
    pub fn params(&self) -> &EvaluationParams {
        &self.params
    }

    /// Evaluates a full-fleet assignment vector into a candidate with objectives and
    /// violations. Infeasible candidates are returned as-is, never repaired here.
    pub fn evaluate(&self, assignments: Vec<Assignment>) -> Candidate {
        let violations = self.collect_violations(&assignments);
        let objectives = ObjectiveVector {
            service_readiness: self.service_readiness(&assignments),
            maintenance_cost: self.maintenance_cost(&assignments),
            branding_exposure: self.branding_exposure(&assignments),
        };

        Candidate::new(assignments, objectives, violations)
    }

    fn collect_violations(&self, assignments: &[Assignment]) -> Vec<HardViolation> {
        let snapshot = self.snapshot.as_ref();
        let mut violations = Vec::new();
        let mut bay_owner: Vec<Option<usize>> = vec![None; snapshot.bays().len()];
        let mut service_count = 0;

        for assignment in assignments {
            if assignment.state == TargetState::Service {
                service_count += 1;
                if !snapshot.eligibility(assignment.trainset).is_eligible() {
                    violations.push(HardViolation::IneligibleService { trainset: assignment.trainset });
                }
            }

            if snapshot.bay(assignment.bay).kind != assignment.state.compatible_bay() {
                violations.push(HardViolation::BayKindMismatch {
                    trainset: assignment.trainset,
                    bay: assignment.bay,
                });
            }

            match bay_owner[assignment.bay] {
                Some(first) => violations.push(HardViolation::SharedBay {
                    bay: assignment.bay,
                    trainsets: (first, assignment.trainset),
                }),
                None => bay_owner[assignment.bay] = Some(assignment.trainset),
            }
        }

        if service_count < self.params.min_service_count {
            violations.push(HardViolation::ServiceCountBelowMinimum {
                actual: service_count,
                required: self.params.min_service_count,
            });
        }

        violations
    }

    /// Count of serviced trainsets weighted by certificate margin, so a trainset whose
    /// certificates are about to run out counts for less than a freshly certified one.
    fn service_readiness(&self, assignments: &[Assignment]) -> Float {
        assignments
            .iter()
            .filter(|assignment| assignment.state == TargetState::Service)
            .map(|assignment| 0.5 + 0.5 * self.snapshot.certificate_margin(assignment.trainset))
            .sum()
    }

    fn maintenance_cost(&self, assignments: &[Assignment]) -> Float {
        let snapshot = self.snapshot.as_ref();

        let card_cost: Float = assignments
            .iter()
            .filter(|assignment| assignment.state == TargetState::Service)
            .map(|assignment| snapshot.open_card_cost(assignment.trainset))
            .sum();

        // serviced trainsets accrue a night of revenue kilometres; a low spread of the
        // projected mileage keeps component wear level across the fleet
        let projected: Vec<Float> = assignments
            .iter()
            .map(|assignment| {
                let extra =
                    if assignment.state == TargetState::Service { NIGHTLY_SERVICE_KM } else { 0. };
                snapshot.mileage(assignment.trainset) + extra
            })
            .collect();
        let mileage_penalty = get_cv(&projected) * MILEAGE_CV_WEIGHT;

        let dirty_serviced = assignments
            .iter()
            .filter(|assignment| {
                assignment.state == TargetState::Service && !snapshot.bay(assignment.bay).is_clean
            })
            .count();
        let uncleanable = dirty_serviced.saturating_sub(snapshot.cleaning_capacity() as usize);

        card_cost + mileage_penalty + uncleanable as Float * DIRTY_BAY_PENALTY
    }

    fn branding_exposure(&self, assignments: &[Assignment]) -> Float {
        assignments
            .iter()
            .filter(|assignment| assignment.state == TargetState::Service)
            .map(|assignment| self.exposure_gain[assignment.trainset])
            .sum()
    }
}

/// Urgency-weighted exposure a night of service adds towards the contract target.
fn contract_gain(contract: &BrandingContract, exposure_target: Float) -> Float {
    if contract.hours_required <= 0. {
        return 0.;
    }

    let progress = contract.progress();
    let after_night = (progress + SERVICE_EXPOSURE_HOURS / contract.hours_required)
        .min(exposure_target.max(progress));
    let deficit = (contract.hours_required - contract.hours_exposed).max(0.);
    let urgency = deficit / contract.hours_required * URGENCY_WEIGHT_CAP;

    (after_night - progress) * (1. + urgency.min(URGENCY_WEIGHT_CAP))
}

enum Direction {
    Minimize,
    Maximize,
}

/// A single induction objective reading one component of the objective vector.
pub struct InductionSingleObjective {
    direction: Direction,
    value_fn: fn(&ObjectiveVector) -> Float,
}

impl Objective for InductionSingleObjective {
    type Solution = Candidate;

    fn total_order(&self, a: &Self::Solution, b: &Self::Solution) -> Ordering {
        compare_floats(self.fitness(a), self.fitness(b))
    }

    fn distance(&self, a: &Self::Solution, b: &Self::Solution) -> Float {
        self.fitness(a) - self.fitness(b)
    }

    fn fitness(&self, solution: &Self::Solution) -> Float {
        let value = (self.value_fn)(solution.objectives());
        match self.direction {
            Direction::Minimize => value,
            Direction::Maximize => -value,
        }
    }
}

/// The three-objective dominance relation over candidates with feasibility ordered first.
pub struct InductionObjective {
    objectives: Vec<InductionSingleObjective>,
}

impl Default for InductionObjective {
    fn default() -> Self {
        Self {
            objectives: vec![
                InductionSingleObjective {
                    direction: Direction::Maximize,
                    value_fn: |objectives| objectives.service_readiness,
                },
                InductionSingleObjective {
                    direction: Direction::Minimize,
                    value_fn: |objectives| objectives.maintenance_cost,
                },
                InductionSingleObjective {
                    direction: Direction::Maximize,
                    value_fn: |objectives| objectives.branding_exposure,
                },
            ],
        }
    }
}

impl Objective for InductionObjective {
    type Solution = Candidate;

    fn total_order(&self, a: &Self::Solution, b: &Self::Solution) -> Ordering {
        match (a.is_feasible(), b.is_feasible()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => compare_floats(a.violation_measure(), b.violation_measure())
                .then_with(|| dominance_order(a, b, self.objectives())),
            (true, true) => dominance_order(a, b, self.objectives()),
        }
    }

    fn distance(&self, a: &Self::Solution, b: &Self::Solution) -> Float {
        self.objectives()
            .map(|objective| objective.distance(a, b))
            .map(|distance| distance * distance)
            .sum::<Float>()
            .sqrt()
    }

    fn fitness(&self, solution: &Self::Solution) -> Float {
        self.objectives().map(|objective| objective.fitness(solution)).sum()
    }
}

impl MultiObjective for InductionObjective {
    fn objectives<'a>(
        &'a self,
    ) -> Box<dyn Iterator<Item = &'a (dyn Objective<Solution = Self::Solution> + Send + Sync)> + 'a>
    {
        Box::new(self.objectives.iter().map(|objective| {
            objective as &(dyn Objective<Solution = Self::Solution> + Send + Sync)
        }))
    }
}
