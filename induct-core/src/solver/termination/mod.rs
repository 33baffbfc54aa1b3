//! Criteria which decide when the evolution should stop.

use crate::solver::evolution::EvolutionContext;

mod max_generation;
pub use self::max_generation::MaxGeneration;

mod min_variation;
pub use self::min_variation::MinVariation;

/// Why a run stopped. Reported in the result metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The front-mean objectives stabilized before the generation budget ran out.
    Convergence,
    /// The configured generation budget was spent.
    GenerationBudget,
    /// The wall-clock limit was reached.
    Timeout,
    /// The run was cancelled cooperatively.
    Cancelled,
}

/// A termination criterion checked once per generation.
pub trait Termination: Send + Sync {
    /// Returns true when the search should stop.
    fn is_termination(&self, ctx: &EvolutionContext) -> bool;

    /// The reason this criterion reports when it fires.
    fn reason(&self) -> StopReason;
}

/// Checks criteria in order and reports the first which fires.
pub struct CompositeTermination {
    criteria: Vec<Box<dyn Termination>>,
}

impl CompositeTermination {
    /// Creates a composite from individual criteria.
    pub fn new(criteria: Vec<Box<dyn Termination>>) -> Self {
        Self { criteria }
    }

    /// Returns the reason of the first firing criterion, if any.
    pub fn check(&self, ctx: &EvolutionContext) -> Option<StopReason> {
        self.criteria
            .iter()
            .find(|criterion| criterion.is_termination(ctx))
            .map(|criterion| criterion.reason())
    }
}
