//! Post-search analysis: Pareto front metrics and the best-compromise recommendation.

pub mod pareto;
pub mod recommendation;

pub use self::pareto::{analyze_front, pareto_front, FrontMetrics, ObjectiveStats};
pub use self::recommendation::{recommend, AssignmentAdvice, Recommendation, Scalarization};
