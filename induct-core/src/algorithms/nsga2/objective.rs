use crate::utils::Float;
use std::cmp::Ordering;

/// An *objective* defines a *total ordering relation* and a *distance metric* on a set of
/// solutions. Given any two solutions, an objective answers:
///
/// - which solution is the better one (total order, `Less` is better)
/// - how far apart the two solutions are (distance metric)
pub trait Objective {
    /// The solution value type that the objective is defined on.
    type Solution;

    /// Answers whether solution `a` is better, equal or worse than `b` according to the objective.
    fn total_order(&self, a: &Self::Solution, b: &Self::Solution) -> Ordering;

    /// A signed distance between two solutions according to the objective.
    fn distance(&self, a: &Self::Solution, b: &Self::Solution) -> Float;

    /// An objective fitness value for the given solution.
    fn fitness(&self, solution: &Self::Solution) -> Float;
}

/// A multi objective which orders solutions by dominance over its inner objectives.
pub trait MultiObjective: Objective {
    /// Returns an iterator over the inner objectives.
    fn objectives<'a>(
        &'a self,
    ) -> Box<dyn Iterator<Item = &'a (dyn Objective<Solution = Self::Solution> + Send + Sync)> + 'a>;
}

/// Calculates dominance order of two solutions using multiple objectives: a solution dominates
/// another if it is no worse in all objectives and strictly better in at least one.
pub fn dominance_order<'a, S: 'a, I>(a: &S, b: &S, objectives: I) -> Ordering
where
    I: Iterator<Item = &'a (dyn Objective<Solution = S> + Send + Sync)>,
{
    let mut less_cnt = 0;
    let mut greater_cnt = 0;

    for objective in objectives {
        match objective.total_order(a, b) {
            Ordering::Less => less_cnt += 1,
            Ordering::Greater => greater_cnt += 1,
            Ordering::Equal => {}
        }
    }

    if less_cnt > 0 && greater_cnt == 0 {
        Ordering::Less
    } else if greater_cnt > 0 && less_cnt == 0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}
