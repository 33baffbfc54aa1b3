//! This module contains the fleet domain model, the point-in-time planning snapshot and the
//! solution representation used by the search.

pub mod fleet;
pub mod snapshot;
pub mod solution;

pub use self::fleet::*;
pub use self::snapshot::{FleetSnapshot, IneligibilityReason, ServiceEligibility, SnapshotBuilder};
pub use self::solution::*;
