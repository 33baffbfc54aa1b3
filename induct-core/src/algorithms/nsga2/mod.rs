//! This module contains logic for multi objective optimization based on the
//! `Non Dominated Sorting Genetic Algorithm II` (NSGA-II):
//!
//! - fast non-dominated sorting approach
//! - crowding distance estimation
//! - rank/crowding based truncation
//!
//! For algorithm details, check the original paper "A fast and elitist multiobjective genetic
//! algorithm: NSGA-II", Kalyanmoy Deb et al. DOI: `10.1109/4235.996017`.

mod crowding_distance;
pub use self::crowding_distance::*;

mod non_dominated_sort;
pub use self::non_dominated_sort::*;

mod nsga2_sort;
pub use self::nsga2_sort::select_and_rank;

mod objective;
pub use self::objective::*;
