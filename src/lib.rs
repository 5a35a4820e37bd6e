//! # tour-milp
//!
//! Computes an optimal closed tour over a small set of locations by formulating the asymmetric
//! travelling salesperson problem as a mixed-integer linear program and handing it to a MILP
//! solver.
//!
//! The pipeline runs in stages, each producing an immutable value for the next:
//!
//! 1. [`cost::CostMatrix`] collects pairwise travel costs from a [`cost::CostLookup`].
//! 2. [`formulation::TspModel`] declares the arc and rank variables and the out-degree,
//!    in-degree and Miller-Tucker-Zemlin constraints over a solver-agnostic [`model::Model`].
//! 3. [`solver::SolverAdapter`] runs a [`solver::MilpBackend`] under a time budget.
//! 4. [`tour::extract_tour`] turns the selected arcs into a visiting order.
//! 5. [`tour::validate_tour`] confirms the arcs form a single Hamiltonian cycle.
//!
//! [`pipeline::TourPlanner`] strings the stages together.

pub mod asserts;
pub mod cost;
pub mod formulation;
pub mod model;
pub mod pipeline;
pub mod runner;
pub mod solver;
pub mod statistics;
pub mod termination;
pub mod tour;

mod basic_types;

#[cfg(test)]
mod tests;

pub use pipeline::PlannedTour;
pub use pipeline::PlannerOptions;
pub use pipeline::PlanningError;
pub use pipeline::TourPlanner;
