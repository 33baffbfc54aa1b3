//! JSON interchange models. Field keys follow the depot data platform's stable naming, so
//! exports from the source systems load without a mapping step. Unknown keys are ignored on
//! input, timestamps are RFC 3339.

pub mod problem;
pub mod result;

pub use self::problem::{deserialize_problem, InductionProblem};
pub use self::result::{create_result, serialize_result, InductionResult};
