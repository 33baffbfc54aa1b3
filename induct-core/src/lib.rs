//! A multi-objective planner for nightly metro fleet induction.
//!
//! Every night a depot has to decide, for each trainset, whether it enters revenue service,
//! stays on standby or goes to inspection, and which stabling bay it occupies. The decision
//! trades fleet readiness against maintenance risk and branding contract exposure, so there
//! is no single best answer. This crate assembles a point-in-time snapshot of the fleet,
//! explores the trade-off surface with an elitist genetic search, and hands back a Pareto
//! front together with one explained best-compromise plan.
//!
//! The expected flow:
//!
//! 1. read an [`format::InductionProblem`] and build a [`models::FleetSnapshot`];
//! 2. start a run through [`solver::ExecutionController`], optionally watching progress
//!    events and cancelling;
//! 3. join the [`solver::RunHandle`] and serialize the [`solver::OptimizationResult`] via
//!    [`format::create_result`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[macro_use]
pub mod helpers;

pub mod algorithms;
pub mod analysis;
pub mod error;
pub mod evaluation;
pub mod format;
pub mod models;
pub mod prelude;
pub mod solver;
pub mod utils;
