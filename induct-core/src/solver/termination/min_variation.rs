#[cfg(test)]
#[path = "../../../tests/unit/solver/termination/min_variation_test.rs"]
mod min_variation_test;

use super::{StopReason, Termination};
use crate::algorithms::math::get_cv;
use crate::solver::evolution::EvolutionContext;
use crate::utils::Float;

/// Stops the search when the mean objective vector of the best front stays flat: the
/// coefficient of variation of every objective over the last `sample` generations is below
/// `threshold`.
pub struct MinVariation {
    sample: usize,
    threshold: Float,
}

impl MinVariation {
    /// Creates a criterion with the given sliding window size and variation threshold.
    pub fn new(sample: usize, threshold: Float) -> Self {
        Self { sample, threshold }
    }
}

impl Default for MinVariation {
    fn default() -> Self {
        Self::new(30, 0.001)
    }
}

impl Termination for MinVariation {
    fn is_termination(&self, ctx: &EvolutionContext) -> bool {
        let history = &ctx.front_mean_history;
        if self.sample < 2 || history.len() < self.sample {
            return false;
        }

        let window = &history[history.len() - self.sample..];
        (0..3).all(|objective_idx| {
            let values: Vec<Float> = window.iter().map(|means| means[objective_idx]).collect();
            get_cv(&values).abs() < self.threshold
        })
    }

    fn reason(&self) -> StopReason {
        StopReason::Convergence
    }
}
