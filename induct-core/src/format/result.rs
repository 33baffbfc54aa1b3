//! Result output: the terminal front, metrics and the recommendation, written as JSON.

#[cfg(test)]
#[path = "../../tests/unit/format/result_test.rs"]
mod result_test;

use crate::analysis::{FrontMetrics, Recommendation};
use crate::error::{EngineError, EngineResult};
use crate::models::{Candidate, FleetSnapshot, HardViolation, ObjectiveVector};
use crate::solver::controller::{OptimizationResult, RunStatus};
use crate::solver::termination::StopReason;
use crate::utils::Float;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use time::format_description::well_known::Rfc3339;

/// Objective values of one candidate or recommendation.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectivesDto {
    /// A service readiness value.
    pub service_readiness: Float,
    /// A maintenance cost value.
    pub maintenance_cost: Float,
    /// A branding exposure value.
    pub branding_exposure: Float,
}

impl From<&ObjectiveVector> for ObjectivesDto {
    fn from(objectives: &ObjectiveVector) -> Self {
        Self {
            service_readiness: objectives.service_readiness,
            maintenance_cost: objectives.maintenance_cost,
            branding_exposure: objectives.branding_exposure,
        }
    }
}

/// One trainset assignment inside a front member.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDto {
    /// A trainset id.
    pub trainset_id: String,
    /// A target state: `service`, `standby` or `inspection`.
    pub target_state: String,
    /// A stabling bay id.
    pub bay_id: String,
}

/// One member of the terminal front.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMemberDto {
    /// Objective values of the member.
    pub objectives: ObjectivesDto,
    /// Whether the member violates no hard constraint.
    pub feasible: bool,
    /// Human-readable hard violations, omitted when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<String>,
    /// One assignment per trainset.
    pub assignments: Vec<AssignmentDto>,
}

/// Per-objective statistics of the front.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveStatsDto {
    /// A minimum value over the front.
    pub min: Float,
    /// A maximum value over the front.
    pub max: Float,
    /// A mean value over the front.
    pub mean: Float,
}

/// Front metrics.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDto {
    /// Number of front members.
    pub front_size: usize,
    /// Number of feasible members.
    pub feasible_count: usize,
    /// Service readiness statistics.
    pub service_readiness: ObjectiveStatsDto,
    /// Maintenance cost statistics.
    pub maintenance_cost: ObjectiveStatsDto,
    /// Branding exposure statistics.
    pub branding_exposure: ObjectiveStatsDto,
    /// Mean pairwise distance in normalized objective space.
    pub diversity: Float,
}

/// One line of the recommendation.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceDto {
    /// A trainset id.
    pub trainset_id: String,
    /// A recommended target state.
    pub target_state: String,
    /// A recommended stabling bay id.
    pub bay_id: String,
    /// Determining constraints behind the choice.
    pub rationale: Vec<String>,
}

/// The recommended plan.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDto {
    /// Objective values of the picked member.
    pub objectives: ObjectivesDto,
    /// Per-trainset advice ordered by trainset id.
    pub assignments: Vec<AdviceDto>,
}

/// The whole result file.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InductionResult {
    /// Identifier the run was started under.
    pub run_id: String,
    /// A terminal status: `completed`, `timed_out`, `cancelled` or `failed`.
    pub status: String,
    /// Which criterion stopped the search, absent for failed runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    /// Diagnostic detail of a failed run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    /// Completed generation count.
    pub generations: usize,
    /// When the run started, RFC 3339.
    pub started_at: String,
    /// When the run finished, RFC 3339.
    pub finished_at: String,
    /// Run wall-clock time in milliseconds.
    pub duration_ms: u128,
    /// Metrics over the front.
    pub metrics: MetricsDto,
    /// The terminal Pareto front.
    pub pareto_front: Vec<FrontMemberDto>,
    /// The best-compromise plan, absent without feasible members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<RecommendationDto>,
}

/// Maps a finished run to its interchange form, resolving snapshot indices back to ids.
pub fn create_result(result: &OptimizationResult, snapshot: &FleetSnapshot) -> InductionResult {
    InductionResult {
        run_id: result.run_id.clone(),
        status: status_name(result.status).to_string(),
        stop_reason: result.stop_reason.map(|reason| reason_name(reason).to_string()),
        failure: result.failure.clone(),
        generations: result.generations,
        started_at: format_timestamp(result.started_at),
        finished_at: format_timestamp(result.finished_at),
        duration_ms: result.duration_ms,
        metrics: create_metrics(&result.metrics),
        pareto_front: result
            .pareto_front
            .iter()
            .map(|candidate| create_member(candidate, snapshot))
            .collect(),
        recommendation: result.recommendation.as_ref().map(create_recommendation),
    }
}

/// Writes a result as pretty JSON.
pub fn serialize_result<W: Write>(result: &InductionResult, writer: BufWriter<W>) -> EngineResult<()> {
    serde_json::to_writer_pretty(writer, result)
        .map_err(|err| EngineError::internal(format!("cannot write result: {err}")))
}

fn create_member(candidate: &Candidate, snapshot: &FleetSnapshot) -> FrontMemberDto {
    FrontMemberDto {
        objectives: candidate.objectives().into(),
        feasible: candidate.is_feasible(),
        violations: candidate
            .violations()
            .iter()
            .map(|violation| describe_violation(violation, snapshot))
            .collect(),
        assignments: candidate
            .assignments()
            .iter()
            .map(|assignment| AssignmentDto {
                trainset_id: snapshot.trainset(assignment.trainset).id.to_string(),
                target_state: assignment.state.to_string(),
                bay_id: snapshot.bay(assignment.bay).id.to_string(),
            })
            .collect(),
    }
}

fn create_recommendation(recommendation: &Recommendation) -> RecommendationDto {
    RecommendationDto {
        objectives: (&recommendation.objectives).into(),
        assignments: recommendation
            .assignments
            .iter()
            .map(|advice| AdviceDto {
                trainset_id: advice.trainset_id.clone(),
                target_state: advice.state.to_string(),
                bay_id: advice.bay_id.clone(),
                rationale: advice.rationale.clone(),
            })
            .collect(),
    }
}

fn create_metrics(metrics: &FrontMetrics) -> MetricsDto {
    let stats = |idx: usize| ObjectiveStatsDto {
        min: metrics.objectives[idx].min,
        max: metrics.objectives[idx].max,
        mean: metrics.objectives[idx].mean,
    };

    MetricsDto {
        front_size: metrics.front_size,
        feasible_count: metrics.feasible_count,
        service_readiness: stats(0),
        maintenance_cost: stats(1),
        branding_exposure: stats(2),
        diversity: metrics.diversity,
    }
}

fn describe_violation(violation: &HardViolation, snapshot: &FleetSnapshot) -> String {
    match violation {
        HardViolation::IneligibleService { trainset } => {
            format!("trainset {} is not service eligible", snapshot.trainset(*trainset).id)
        }
        HardViolation::BayKindMismatch { trainset, bay } => format!(
            "trainset {} is stabled in incompatible bay {}",
            snapshot.trainset(*trainset).id,
            snapshot.bay(*bay).id
        ),
        HardViolation::SharedBay { bay, trainsets } => format!(
            "bay {} is shared by trainsets {} and {}",
            snapshot.bay(*bay).id,
            snapshot.trainset(trainsets.0).id,
            snapshot.trainset(trainsets.1).id
        ),
        HardViolation::ServiceCountBelowMinimum { actual, required } => {
            format!("only {actual} trainsets in service, {required} required")
        }
    }
}

fn status_name(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Completed => "completed",
        RunStatus::TimedOut => "timed_out",
        RunStatus::Cancelled => "cancelled",
        RunStatus::Failed => "failed",
    }
}

fn reason_name(reason: StopReason) -> &'static str {
    match reason {
        StopReason::Convergence => "convergence",
        StopReason::GenerationBudget => "generation_budget",
        StopReason::Timeout => "timeout",
        StopReason::Cancelled => "cancelled",
    }
}

fn format_timestamp(timestamp: time::OffsetDateTime) -> String {
    timestamp.format(&Rfc3339).unwrap_or_else(|_| timestamp.to_string())
}
