#[cfg(test)]
#[path = "../../../tests/unit/algorithms/nsga2/crowding_distance_test.rs"]
mod crowding_distance_test;

use crate::algorithms::nsga2::non_dominated_sort::Front;
use crate::algorithms::nsga2::MultiObjective;
use crate::utils::Float;

/// A solution with its front rank and assigned crowding distance.
pub struct AssignedCrowdingDistance<'a, S> {
    /// An index of the solution in the original slice.
    pub index: usize,
    /// A reference to the solution.
    pub solution: &'a S,
    /// A rank of the front the solution belongs to.
    pub rank: usize,
    /// A crowding distance, higher means less crowded.
    pub crowding_distance: Float,
}

/// Assigns a crowding distance to each solution in `front`.
pub fn assign_crowding_distance<'a, S, O>(
    front: &Front<'a, S>,
    multi_objective: &O,
) -> Vec<AssignedCrowdingDistance<'a, S>>
where
    O: MultiObjective<Solution = S> + ?Sized,
{
    let mut assigned: Vec<_> = front
        .iter()
        .map(|(solution, index)| AssignedCrowdingDistance {
            index,
            solution,
            rank: front.rank(),
            crowding_distance: 0.,
        })
        .collect();

    if assigned.is_empty() {
        return assigned;
    }

    let objective_count = multi_objective.objectives().count();

    multi_objective.objectives().for_each(|objective| {
        // first, sort according to the objective
        assigned.sort_by(|a, b| objective.total_order(a.solution, b.solution));

        // assign infinite crowding distance to the extremes
        assigned.first_mut().unwrap().crowding_distance = Float::INFINITY;
        assigned.last_mut().unwrap().crowding_distance = Float::INFINITY;

        // the spread between the "best" and "worst" solution according to the objective
        let spread = objective.distance(assigned.first().unwrap().solution, assigned.last().unwrap().solution).abs();

        if spread > 0. {
            let norm = 1. / (spread * objective_count as Float);
            for i in 1..assigned.len() - 1 {
                let distance = objective.distance(assigned[i + 1].solution, assigned[i - 1].solution).abs();
                assigned[i].crowding_distance += distance * norm;
            }
        }
    });

    assigned
}
