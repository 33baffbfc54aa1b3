#[cfg(test)]
#[path = "../../../tests/unit/algorithms/nsga2/nsga2_sort_test.rs"]
mod nsga2_sort_test;

use super::*;
use crate::utils::compare_floats;

/// Selects `n` solutions using the approach taken by NSGA-II.
///
/// Solutions are sorted into Pareto fronts by a non-dominated sort. Whole fronts are put into
/// the result set until the next front does not fit anymore; that last front is sorted by
/// crowding distance (higher is better) and only the least crowded solutions are taken until
/// the result set holds exactly `n` solutions.
pub fn select_and_rank<'a, S, O>(solutions: &'a [S], n: usize, multi_objective: &O) -> Vec<AssignedCrowdingDistance<'a, S>>
where
    O: MultiObjective<Solution = S> + ?Sized,
{
    // cannot select more solutions than we actually have
    let n = solutions.len().min(n);

    let mut result = Vec::with_capacity(n);
    let mut missing_solutions = n;

    let mut front = non_dominated_sort(solutions, multi_objective);

    while !front.is_empty() && missing_solutions > 0 {
        let mut assigned = assign_crowding_distance(&front, multi_objective);

        if assigned.len() > missing_solutions {
            // the front does not fit in total: prefer the least crowded solutions
            assigned.sort_by(|a, b| compare_floats(b.crowding_distance, a.crowding_distance));
        }

        let take = assigned.len().min(missing_solutions);
        result.extend(assigned.into_iter().take(take));
        missing_solutions -= take;

        front = front.next_front();
    }

    debug_assert_eq!(n, result.len());

    result
}
