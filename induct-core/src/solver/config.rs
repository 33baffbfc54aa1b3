//! Run configuration with mode presets and fail-fast validation.

#[cfg(test)]
#[path = "../../tests/unit/solver/config_test.rs"]
mod config_test;

use crate::error::{ConfigViolation, EngineError, EngineResult};
use crate::utils::Float;

/// Search effort preset. Resolves to a population size and generation budget unless both are
/// overridden explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// A quick sketch for interactive what-if checks.
    Fast,
    /// The default night-run effort.
    #[default]
    Balanced,
    /// Full effort for the final pre-dispatch plan.
    Thorough,
}

impl SearchMode {
    /// Returns the preset population size.
    pub fn population_size(&self) -> usize {
        match self {
            Self::Fast => 50,
            Self::Balanced => 100,
            Self::Thorough => 200,
        }
    }

    /// Returns the preset generation budget.
    pub fn max_generations(&self) -> usize {
        match self {
            Self::Fast => 80,
            Self::Balanced => 200,
            Self::Thorough => 400,
        }
    }
}

/// Relative importance of the three objectives for the weighted-sum recommendation pick.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectiveWeights {
    /// A service readiness weight.
    pub service_readiness: Float,
    /// A maintenance cost weight.
    pub maintenance_cost: Float,
    /// A branding exposure weight.
    pub branding_exposure: Float,
}

/// Full configuration of one optimization run.
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Effort preset.
    pub mode: SearchMode,
    /// Population size override; preset value when `None`.
    pub population_size: Option<usize>,
    /// Generation budget override; preset value when `None`.
    pub max_generations: Option<usize>,
    /// Minimum number of trainsets assigned to revenue service.
    pub min_service_count: usize,
    /// Wall-clock budget in seconds; unlimited when `None`.
    pub max_runtime_seconds: Option<Float>,
    /// Probability of mutating each offspring.
    pub mutation_rate: Float,
    /// Weights for the recommendation scalarization; ideal-point distance when `None`.
    pub objective_weights: Option<ObjectiveWeights>,
    /// Seed for all stochastic choices; a random seed when `None`.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            population_size: None,
            max_generations: None,
            min_service_count: 15,
            max_runtime_seconds: None,
            mutation_rate: 0.1,
            objective_weights: None,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Returns the effective population size.
    pub fn effective_population_size(&self) -> usize {
        self.population_size.unwrap_or_else(|| self.mode.population_size())
    }

    /// Returns the effective generation budget.
    pub fn effective_max_generations(&self) -> usize {
        self.max_generations.unwrap_or_else(|| self.mode.max_generations())
    }

    /// Validates the configuration against the fleet size before any search work starts.
    ///
    /// Collects every violation instead of stopping at the first, so a caller can fix a bad
    /// configuration in one round trip. Validation has no side effects and repeated calls
    /// return the same result.
    pub fn validate(&self, trainset_count: usize) -> EngineResult<()> {
        let mut violations = Vec::new();

        if self.effective_population_size() < 2 {
            violations.push(ConfigViolation::new(
                "population_size",
                format!("is {}, must be at least 2", self.effective_population_size()),
                "raise the population size or drop the override",
            ));
        }

        if self.effective_max_generations() == 0 {
            violations.push(ConfigViolation::new(
                "max_generations",
                "is 0, must be at least 1".to_string(),
                "raise the generation budget or drop the override",
            ));
        }

        if !(0. ..=1.).contains(&self.mutation_rate) {
            violations.push(ConfigViolation::new(
                "mutation_rate",
                format!("is {}, must be within [0, 1]", self.mutation_rate),
                "use a probability",
            ));
        }

        if self.min_service_count > trainset_count {
            violations.push(ConfigViolation::new(
                "min_service_count",
                format!("is {}, but the snapshot has only {trainset_count} trainsets", self.min_service_count),
                "lower the minimum or extend the fleet data",
            ));
        }

        if let Some(limit) = self.max_runtime_seconds {
            if !(limit > 0.) {
                violations.push(ConfigViolation::new(
                    "max_runtime_seconds",
                    format!("is {limit}, must be positive"),
                    "drop the limit or use a positive number of seconds",
                ));
            }
        }

        if let Some(weights) = &self.objective_weights {
            let all = [weights.service_readiness, weights.maintenance_cost, weights.branding_exposure];
            if all.iter().any(|weight| *weight < 0. || !weight.is_finite()) {
                violations.push(ConfigViolation::new(
                    "objective_weights",
                    "contains a negative or non-finite weight".to_string(),
                    "use finite non-negative weights",
                ));
            } else if all.iter().sum::<Float>() == 0. {
                violations.push(ConfigViolation::new(
                    "objective_weights",
                    "all weights are zero".to_string(),
                    "give at least one objective a positive weight",
                ));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(EngineError::InvalidConfiguration(violations))
        }
    }
}
