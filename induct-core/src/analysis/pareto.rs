//! Metrics over the terminal Pareto front.

#[cfg(test)]
#[path = "../../tests/unit/analysis/pareto_test.rs"]
mod pareto_test;

use crate::algorithms::math::{euclidean_distance, get_mean};
use crate::algorithms::nsga2::non_dominated_sort;
use crate::evaluation::InductionObjective;
use crate::models::Candidate;
use crate::utils::Float;

/// Minimum, maximum and mean of one objective over the front.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectiveStats {
    /// A minimum value over the front.
    pub min: Float,
    /// A maximum value over the front.
    pub max: Float,
    /// A mean value over the front.
    pub mean: Float,
}

/// Summary of the terminal front handed to the planner alongside the recommendation.
#[derive(Clone, Debug)]
pub struct FrontMetrics {
    /// Number of members in the rank-zero front.
    pub front_size: usize,
    /// Number of feasible members.
    pub feasible_count: usize,
    /// Per-objective statistics in (readiness, cost, exposure) order.
    pub objectives: [ObjectiveStats; 3],
    /// Mean pairwise distance in range-normalized objective space; zero for a singleton or a
    /// degenerate front.
    pub diversity: Float,
}

/// Extracts the rank-zero front from a terminal population.
pub fn pareto_front(population: &[Candidate]) -> Vec<Candidate> {
    let objective = InductionObjective::default();
    non_dominated_sort(population, &objective)
        .iter()
        .map(|(candidate, _)| candidate.clone())
        .collect()
}

/// Computes metrics over an extracted front.
pub fn analyze_front(front: &[Candidate]) -> FrontMetrics {
    if front.is_empty() {
        let zero = || ObjectiveStats { min: 0., max: 0., mean: 0. };
        return FrontMetrics {
            front_size: 0,
            feasible_count: 0,
            objectives: [zero(), zero(), zero()],
            diversity: 0.,
        };
    }

    let feasible_count = front.iter().filter(|candidate| candidate.is_feasible()).count();

    let values: Vec<[Float; 3]> =
        front.iter().map(|candidate| candidate.objectives().as_array()).collect();

    let objectives = std::array::from_fn(|objective_idx| {
        let column: Vec<Float> = values.iter().map(|value| value[objective_idx]).collect();
        ObjectiveStats {
            min: column.iter().copied().fold(Float::INFINITY, Float::min),
            max: column.iter().copied().fold(Float::NEG_INFINITY, Float::max),
            mean: get_mean(&column),
        }
    });

    FrontMetrics {
        front_size: front.len(),
        feasible_count,
        diversity: diversity(&values, &objectives),
        objectives,
    }
}

/// Mean pairwise Euclidean distance after scaling each objective to its front range.
fn diversity(values: &[[Float; 3]], stats: &[ObjectiveStats; 3]) -> Float {
    if values.len() < 2 {
        return 0.;
    }

    let normalized: Vec<Vec<Float>> = values
        .iter()
        .map(|value| {
            value
                .iter()
                .zip(stats.iter())
                .map(|(component, stat)| {
                    let range = stat.max - stat.min;
                    if range > 0. {
                        (component - stat.min) / range
                    } else {
                        0.
                    }
                })
                .collect()
        })
        .collect();

    let mut total = 0.;
    let mut pairs = 0;
    for (idx, first) in normalized.iter().enumerate() {
        for second in normalized.iter().skip(idx + 1) {
            total += euclidean_distance(first, second);
            pairs += 1;
        }
    }

    total / pairs as Float
}
