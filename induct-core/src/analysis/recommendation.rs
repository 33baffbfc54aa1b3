//! Picks one best-compromise front member and explains it per trainset.

#[cfg(test)]
#[path = "../../tests/unit/analysis/recommendation_test.rs"]
mod recommendation_test;

use crate::models::{
    Candidate, FleetSnapshot, ObjectiveVector, TargetState,
};
use crate::solver::config::ObjectiveWeights;
use crate::utils::{compare_floats, Float};

/// How the front collapses to a single pick.
pub enum Scalarization {
    /// Minimum normalized Euclidean distance to the per-objective-best ideal point.
    IdealPoint,
    /// Weighted sum of normalized objectives.
    WeightedSum(ObjectiveWeights),
}

/// One trainset line of the recommendation.
#[derive(Clone, Debug)]
pub struct AssignmentAdvice {
    /// Trainset identifier.
    pub trainset_id: String,
    /// Recommended target state.
    pub state: TargetState,
    /// Recommended stabling bay identifier.
    pub bay_id: String,
    /// Determining constraints behind the choice, already phrased for the planner.
    pub rationale: Vec<String>,
}

/// The recommended induction plan.
#[derive(Clone, Debug)]
pub struct Recommendation {
    /// Objectives of the picked front member.
    pub objectives: ObjectiveVector,
    /// Per-trainset advice in snapshot order.
    pub assignments: Vec<AssignmentAdvice>,
}

/// Picks the best compromise among feasible front members and explains it. Returns `None`
/// when the front holds no feasible member.
pub fn recommend(
    front: &[Candidate],
    snapshot: &FleetSnapshot,
    scalarization: &Scalarization,
) -> Option<Recommendation> {
    let feasible: Vec<&Candidate> =
        front.iter().filter(|candidate| candidate.is_feasible()).collect();
    let best = pick(&feasible, scalarization)?;

    let mut assignments: Vec<AssignmentAdvice> = best
        .assignments()
        .iter()
        .map(|assignment| AssignmentAdvice {
            trainset_id: snapshot.trainset(assignment.trainset).id.to_string(),
            state: assignment.state,
            bay_id: snapshot.bay(assignment.bay).id.to_string(),
            rationale: rationale(snapshot, assignment.trainset, assignment.state),
        })
        .collect();
    assignments.sort_by(|a, b| a.trainset_id.cmp(&b.trainset_id));

    Some(Recommendation { objectives: *best.objectives(), assignments })
}

/// Normalized objective values in minimized form: each component scaled to `[0, 1]` over the
/// feasible set, lower is better for all three.
fn normalized(feasible: &[&Candidate]) -> Vec<[Float; 3]> {
    let minimized: Vec<[Float; 3]> = feasible
        .iter()
        .map(|candidate| {
            let objectives = candidate.objectives();
            [
                -objectives.service_readiness,
                objectives.maintenance_cost,
                -objectives.branding_exposure,
            ]
        })
        .collect();

    let mut lows = [Float::INFINITY; 3];
    let mut highs = [Float::NEG_INFINITY; 3];
    for value in &minimized {
        for idx in 0..3 {
            lows[idx] = lows[idx].min(value[idx]);
            highs[idx] = highs[idx].max(value[idx]);
        }
    }

    minimized
        .into_iter()
        .map(|value| {
            std::array::from_fn(|idx| {
                let range = highs[idx] - lows[idx];
                if range > 0. {
                    (value[idx] - lows[idx]) / range
                } else {
                    0.
                }
            })
        })
        .collect()
}

fn pick<'a>(feasible: &[&'a Candidate], scalarization: &Scalarization) -> Option<&'a Candidate> {
    if feasible.is_empty() {
        return None;
    }

    let normalized = normalized(feasible);
    let scores = normalized.iter().map(|value| match scalarization {
        // the ideal point is the origin after normalization
        Scalarization::IdealPoint => {
            value.iter().map(|component| component * component).sum::<Float>().sqrt()
        }
        Scalarization::WeightedSum(weights) => {
            value[0] * weights.service_readiness
                + value[1] * weights.maintenance_cost
                + value[2] * weights.branding_exposure
        }
    });

    scores
        .enumerate()
        .min_by(|(_, a), (_, b)| compare_floats(*a, *b))
        .map(|(idx, _)| feasible[idx])
}

fn rationale(snapshot: &FleetSnapshot, trainset: usize, state: TargetState) -> Vec<String> {
    let mut lines = Vec::new();
    let eligibility = snapshot.eligibility(trainset);

    match state {
        TargetState::Service => {
            lines.push(format!(
                "clear certificates (margin {:.0} %)",
                snapshot.certificate_margin(trainset) * 100.
            ));
            if let Some(progress) = snapshot.branding_progress(trainset) {
                lines.push(format!(
                    "branding contract at {:.0} % of contracted hours",
                    progress * 100.
                ));
            }
        }
        TargetState::Standby | TargetState::Inspection => {
            lines.extend(
                eligibility
                    .reasons
                    .iter()
                    .map(|reason| format!("excluded from service: {reason}")),
            );
            if lines.is_empty() {
                lines.push(match state {
                    TargetState::Standby => "held as serviceable reserve".to_string(),
                    _ => "rotated into inspection".to_string(),
                });
            }
            let card_cost = snapshot.open_card_cost(trainset);
            if state == TargetState::Inspection && card_cost > 0. {
                lines.push(format!("open job cards (severity weight {card_cost:.0})"));
            }
        }
    }

    lines
}
