//! Implementation of the fast non-dominated sort algorithm as used by NSGA-II.
//! Time complexity is `O(K * N^2)`, where `K` is the number of objectives and `N` the number
//! of solutions.

#[cfg(test)]
#[path = "../../../tests/unit/algorithms/nsga2/non_dominated_sort_test.rs"]
mod non_dominated_sort_test;

use crate::algorithms::nsga2::MultiObjective;
use std::cmp::Ordering;

type SolutionIdx = usize;

/// A single Pareto front holding indices into the original solution slice.
pub struct Front<'s, S> {
    dominated_solutions: Vec<Vec<SolutionIdx>>,
    domination_count: Vec<usize>,
    current_front: Vec<SolutionIdx>,
    rank: usize,
    solutions: &'s [S],
}

impl<'s, S> Front<'s, S> {
    /// Returns the rank of this front, starting at zero for the non-dominated set.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Returns true if the front contains no solutions.
    pub fn is_empty(&self) -> bool {
        self.current_front.is_empty()
    }

    /// Iterates over `(solution, index)` pairs of the front.
    pub fn iter(&self) -> impl Iterator<Item = (&'s S, SolutionIdx)> + '_ {
        self.current_front.iter().map(move |&idx| (&self.solutions[idx], idx))
    }

    /// Consumes this front and computes the next one.
    pub fn next_front(self) -> Self {
        let Front { dominated_solutions, mut domination_count, current_front, rank, solutions } = self;

        let mut next_front = Vec::new();
        for &p_i in current_front.iter() {
            for &q_i in dominated_solutions[p_i].iter() {
                debug_assert!(domination_count[q_i] > 0);

                domination_count[q_i] -= 1;
                if domination_count[q_i] == 0 {
                    // q_i is no longer dominated, it belongs to the next front
                    next_front.push(q_i);
                }
            }
        }

        Self { dominated_solutions, domination_count, current_front: next_front, rank: rank + 1, solutions }
    }
}

/// Performs a non-dominated sort of `solutions`. Returns the first Pareto front.
pub fn non_dominated_sort<'s, S, O>(solutions: &'s [S], objective: &O) -> Front<'s, S>
where
    O: MultiObjective<Solution = S> + ?Sized,
{
    // the indices of the solutions that are dominated by this solution
    let mut dominated_solutions: Vec<Vec<SolutionIdx>> = solutions.iter().map(|_| Vec::new()).collect();

    // for each solution, the number of solutions it is dominated by
    let mut domination_count: Vec<usize> = vec![0; solutions.len()];

    let mut current_front: Vec<SolutionIdx> = Vec::new();

    let mut iter = solutions.iter().enumerate();
    while let Some((p_i, p)) = iter.next() {
        for (q_i, q) in iter.clone() {
            match objective.total_order(p, q) {
                Ordering::Less => {
                    // p dominates q
                    dominated_solutions[p_i].push(q_i);
                    domination_count[q_i] += 1;
                }
                Ordering::Greater => {
                    // q dominates p
                    dominated_solutions[q_i].push(p_i);
                    domination_count[p_i] += 1;
                }
                Ordering::Equal => {}
            }
        }

        if domination_count[p_i] == 0 {
            current_front.push(p_i);
        }
    }

    Front { dominated_solutions, domination_count, current_front, rank: 0, solutions }
}
