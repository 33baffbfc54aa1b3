#[cfg(test)]
#[path = "../../../tests/unit/solver/termination/max_generation_test.rs"]
mod max_generation_test;

use super::{StopReason, Termination};
use crate::solver::evolution::EvolutionContext;

/// Stops the search after a fixed number of generations.
pub struct MaxGeneration {
    limit: usize,
}

impl MaxGeneration {
    /// Creates a criterion with the given generation budget.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Termination for MaxGeneration {
    fn is_termination(&self, ctx: &EvolutionContext) -> bool {
        ctx.generation >= self.limit
    }

    fn reason(&self) -> StopReason {
        StopReason::GenerationBudget
    }
}
