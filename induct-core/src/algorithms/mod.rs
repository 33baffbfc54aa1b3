//! This module contains algorithmic building blocks used by the solver.

pub mod math;
pub mod nsga2;
