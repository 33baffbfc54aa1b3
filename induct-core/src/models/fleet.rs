//! Raw fleet records as supplied by the storage collaborator. All records are plain immutable
//! data; the interesting derived views live in [`crate::models::snapshot`].

use crate::utils::Float;
use std::fmt;
use time::OffsetDateTime;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Creates a new id from anything string-like.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

id_type! {
    /// A trainset identifier, e.g. `TS007`.
    TrainsetId
}
id_type! {
    /// A stabling bay identifier, e.g. `Bay012`.
    BayId
}
id_type! {
    /// A job card identifier.
    JobCardId
}
id_type! {
    /// A branding contract identifier.
    ContractId
}
id_type! {
    /// A cleaning slot identifier.
    SlotId
}

/// A physical trainset of the fleet.
#[derive(Clone, Debug)]
pub struct Trainset {
    /// A unique trainset id.
    pub id: TrainsetId,
    /// A fleet number.
    pub fleet_number: u32,
    /// A bay the trainset is currently stabled in, if known.
    pub current_bay: Option<BayId>,
    /// Free-form operational notes.
    pub notes: String,
}

/// A certified subsystem of a trainset.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Subsystem {
    /// Rolling stock department.
    RollingStock,
    /// Signalling department.
    Signalling,
    /// Telecom department.
    Telecom,
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RollingStock => write!(f, "rolling-stock"),
            Self::Signalling => write!(f, "signalling"),
            Self::Telecom => write!(f, "telecom"),
        }
    }
}

/// A fitness certificate for one subsystem of a trainset.
#[derive(Clone, Debug)]
pub struct Certificate {
    /// A trainset the certificate belongs to.
    pub trainset: TrainsetId,
    /// A certified subsystem.
    pub subsystem: Subsystem,
    /// Validity window start.
    pub valid_from: OffsetDateTime,
    /// Validity window end.
    pub valid_until: OffsetDateTime,
    /// Whether the certificate is clear. A trainset is service eligible only if every
    /// certificate covering the planning date is clear.
    pub is_clear: bool,
}

/// A job card severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Safety critical work: an open card of this severity makes a trainset service ineligible.
    Critical,
    /// Major work.
    Major,
    /// Minor work.
    Minor,
}

impl Severity {
    /// A maintenance cost weight of open work of this severity.
    pub fn cost_weight(&self) -> Float {
        match self {
            Self::Critical => 10.,
            Self::Major => 3.,
            Self::Minor => 1.,
        }
    }
}

/// A job card status. `PendingReview` counts as closed for eligibility purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobCardStatus {
    /// Work not yet started.
    Open,
    /// Work in progress.
    InProgress,
    /// Work done, awaiting review.
    PendingReview,
    /// Work completed.
    Closed,
}

impl JobCardStatus {
    /// Returns true if the card still blocks or penalizes the trainset.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

/// A maintenance job card.
#[derive(Clone, Debug)]
pub struct JobCard {
    /// A job card id.
    pub id: JobCardId,
    /// A trainset the card is raised against.
    pub trainset: TrainsetId,
    /// A severity of the work.
    pub severity: Severity,
    /// A card status.
    pub status: JobCardStatus,
    /// What the card is about.
    pub description: String,
}

/// A cumulative mileage reading of a trainset.
#[derive(Clone, Debug)]
pub struct MileageRecord {
    /// A trainset the reading belongs to.
    pub trainset: TrainsetId,
    /// Accumulated distance in kilometres.
    pub total_km: Float,
}

/// An advertising exposure contract bound to a trainset.
#[derive(Clone, Debug)]
pub struct BrandingContract {
    /// A contract id.
    pub id: ContractId,
    /// A branded trainset.
    pub trainset: TrainsetId,
    /// An advertiser name.
    pub advertiser: String,
    /// Contractual exposure hours required.
    pub hours_required: Float,
    /// Exposure hours accumulated to date.
    pub hours_exposed: Float,
    /// Contract end date.
    pub end_date: OffsetDateTime,
}

impl BrandingContract {
    /// Exposure progress as a fraction of contracted hours, capped at 1.0 so over-exposure
    /// is never rewarded.
    pub fn progress(&self) -> Float {
        if self.hours_required <= 0. {
            1.
        } else {
            (self.hours_exposed / self.hours_required).min(1.)
        }
    }
}

/// A stabling bay kind which determines which target state a bay can host.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum BayKind {
    /// A revenue service bay.
    Revenue,
    /// A standby bay.
    Standby,
    /// An inspection bay line (IBL).
    Inspection,
}

impl fmt::Display for BayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Revenue => write!(f, "revenue"),
            Self::Standby => write!(f, "standby"),
            Self::Inspection => write!(f, "inspection"),
        }
    }
}

/// A physical stabling bay.
#[derive(Clone, Debug)]
pub struct StablingBay {
    /// A bay id.
    pub id: BayId,
    /// A bay kind.
    pub kind: BayKind,
    /// Whether the bay is clean: a trainset stabled in a dirty bay competes for cleaning
    /// slot capacity.
    pub is_clean: bool,
    /// A trainset currently occupying the bay, if any.
    pub occupied_by: Option<TrainsetId>,
    /// Whether the bay is excluded by yard maintenance.
    pub out_of_service: bool,
}

/// A night cleaning slot with a bounded capacity.
#[derive(Clone, Debug)]
pub struct CleaningSlot {
    /// A slot id.
    pub id: SlotId,
    /// Window start.
    pub starts_at: OffsetDateTime,
    /// Window end.
    pub ends_at: OffsetDateTime,
    /// How many trainsets the slot can serve.
    pub capacity: u32,
    /// A trainset already booked into the slot, if any.
    pub assigned_to: Option<TrainsetId>,
}
