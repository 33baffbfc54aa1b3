//! Solution representation: one [`Assignment`] per trainset forms a [`Candidate`], the unit the
//! genetic search works on. Candidates are created and discarded entirely within one run and
//! are treated as read-only once they leave the optimization core.

use crate::models::fleet::BayKind;
use crate::utils::Float;
use std::fmt;

/// A target state of a trainset for the next operational day.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum TargetState {
    /// Enter revenue service.
    Service,
    /// Remain on standby.
    Standby,
    /// Go to the inspection bay line.
    Inspection,
}

impl TargetState {
    /// Returns the bay kind a trainset in this state must be stabled in.
    pub fn compatible_bay(&self) -> BayKind {
        match self {
            Self::Service => BayKind::Revenue,
            Self::Standby => BayKind::Standby,
            Self::Inspection => BayKind::Inspection,
        }
    }

    /// All target states in a stable order.
    pub fn all() -> [TargetState; 3] {
        [Self::Service, Self::Standby, Self::Inspection]
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service => write!(f, "service"),
            Self::Standby => write!(f, "standby"),
            Self::Inspection => write!(f, "inspection"),
        }
    }
}

/// A decision variable unit: one trainset's target state and stabling position. Trainsets and
/// bays are referenced by their snapshot indices; the format layer resolves them back to ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// A trainset index in the snapshot.
    pub trainset: usize,
    /// A target state.
    pub state: TargetState,
    /// A bay index in the snapshot, consistent with the state's bay kind.
    pub bay: usize,
}

/// Values of the three planning objectives. Directions are fixed: readiness and exposure are
/// maximized, cost is minimized; the values themselves stay in domain units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ObjectiveVector {
    /// Service readiness: serviced trainset count weighted by certificate margin.
    pub service_readiness: Float,
    /// Maintenance cost: open job card severity weights plus mileage variance penalty.
    pub maintenance_cost: Float,
    /// Branding exposure: contractual hour progress of serviced trainsets, capped per contract.
    pub branding_exposure: Float,
}

impl ObjectiveVector {
    /// Returns objective values as an array in stable order.
    pub fn as_array(&self) -> [Float; 3] {
        [self.service_readiness, self.maintenance_cost, self.branding_exposure]
    }
}

/// A hard constraint violation. Any violation makes a candidate infeasible, but the candidate
/// stays in the population for genetic diversity, ranked strictly worse than feasible ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HardViolation {
    /// A service assignment of a trainset which is not service eligible.
    IneligibleService {
        /// A trainset index.
        trainset: usize,
    },
    /// A bay whose kind does not match the assigned state.
    BayKindMismatch {
        /// A trainset index.
        trainset: usize,
        /// A bay index.
        bay: usize,
    },
    /// Two trainsets assigned to the same bay.
    SharedBay {
        /// A bay index.
        bay: usize,
        /// Both trainset indices.
        trainsets: (usize, usize),
    },
    /// Fewer trainsets in service than the configured minimum.
    ServiceCountBelowMinimum {
        /// How many trainsets are in service.
        actual: usize,
        /// The configured minimum.
        required: usize,
    },
}

/// A fully evaluated member of the population.
#[derive(Clone, Debug)]
pub struct Candidate {
    assignments: Vec<Assignment>,
    objectives: ObjectiveVector,
    violations: Vec<HardViolation>,
}

impl Candidate {
    /// Creates a new evaluated candidate.
    pub fn new(assignments: Vec<Assignment>, objectives: ObjectiveVector, violations: Vec<HardViolation>) -> Self {
        Self { assignments, objectives, violations }
    }

    /// Returns assignments, one per trainset, ordered by trainset index.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Returns the objective vector.
    pub fn objectives(&self) -> &ObjectiveVector {
        &self.objectives
    }

    /// Returns hard violations, empty for a feasible candidate.
    pub fn violations(&self) -> &[HardViolation] {
        &self.violations
    }

    /// Returns true if no hard constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }

    /// A scalar violation measure used to order infeasible candidates: the violation count is
    /// an implicit, lexicographically dominant objective, never a silently repaired value.
    pub fn violation_measure(&self) -> Float {
        self.violations.len() as Float
    }
}
