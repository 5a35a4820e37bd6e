//! The end-to-end planner: locations in, validated tour out.

use std::fmt::Display;
use std::fmt::Formatter;
use std::time::Duration;

use log::debug;
use log::info;
use log::warn;
use thiserror::Error;

use crate::cost::CostLookup;
use crate::cost::CostMatrix;
use crate::cost::CostMatrixError;
use crate::cost::DepartureTime;
use crate::cost::Location;
use crate::formulation::ensure_tour_size;
use crate::formulation::InfeasibleModelSize;
use crate::formulation::TspModel;
use crate::solver::MilpBackend;
use crate::solver::SolveOutcome;
use crate::solver::SolveStatus;
use crate::solver::SolverAdapter;
use crate::statistics::log_statistic;
use crate::termination::TimeBudget;
use crate::tour::extract_tour;
use crate::tour::validate_tour;
use crate::tour::TourDefect;
use crate::tour::TourEdge;

/// Relative difference tolerated between the solver's objective and the recomputed tour cost.
const OBJECTIVE_TOLERANCE: f64 = 1e-6;

#[derive(Clone, Copy, Debug)]
pub struct PlannerOptions {
    /// The wall-clock time the solver may spend.
    pub time_budget: Duration,
    /// The departure time used for every cost lookup.
    pub departure: DepartureTime,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        PlannerOptions {
            time_budget: Duration::from_secs(60),
            departure: DepartureTime::now(),
        }
    }
}

/// A validated optimal tour.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedTour {
    /// The nodes in visiting order, starting and ending at node 0.
    pub order: Vec<usize>,
    /// The arcs of the tour, sorted by source. Contains no duplicates and no self-loops.
    pub edges: Vec<TourEdge>,
    /// The sum of the costs of [`PlannedTour::edges`].
    pub total_cost: f64,
    /// The objective value of the backend's solution, evaluated by the backend. Not recomputed
    /// from the cost matrix; compare with [`PlannedTour::total_cost`].
    pub objective_value: f64,
    pub solve_time: Duration,
}

/// The stage of the pipeline in which planning failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    CostMatrix,
    Model,
    Solve,
    Extraction,
    Validation,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::CostMatrix => "cost matrix",
            Stage::Model => "model",
            Stage::Solve => "solve",
            Stage::Extraction => "tour extraction",
            Stage::Validation => "tour validation",
        };

        f.write_str(name)
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum PlanningError {
    #[error(transparent)]
    CostUnavailable(#[from] CostMatrixError),
    #[error(transparent)]
    InfeasibleModelSize(#[from] InfeasibleModelSize),
    #[error("no tour exists under the current constraints: the model is {status}")]
    NoTour { status: SolveStatus },
    #[error("the solver exhausted its time budget after {elapsed:?}")]
    TimedOut {
        elapsed: Duration,
        best_bound: Option<f64>,
    },
    #[error("the solver failed: {message}")]
    SolverFailed { message: String },
    #[error("the solver produced a malformed tour: {defect}")]
    MalformedSolution { stage: Stage, defect: TourDefect },
}

impl PlanningError {
    pub fn stage(&self) -> Stage {
        match self {
            PlanningError::CostUnavailable(_) => Stage::CostMatrix,
            PlanningError::InfeasibleModelSize(_) => Stage::Model,
            PlanningError::NoTour { .. }
            | PlanningError::TimedOut { .. }
            | PlanningError::SolverFailed { .. } => Stage::Solve,
            PlanningError::MalformedSolution { stage, .. } => *stage,
        }
    }
}

/// Runs the stages in order, failing fast with the first [`PlanningError`]. Nothing is retried.
#[derive(Debug)]
pub struct TourPlanner<Backend> {
    adapter: SolverAdapter<Backend>,
    options: PlannerOptions,
}

impl<Backend: MilpBackend> TourPlanner<Backend> {
    pub fn new(adapter: SolverAdapter<Backend>, options: PlannerOptions) -> Self {
        TourPlanner { adapter, options }
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// Plan a tour visiting every location, with costs from `lookup`.
    ///
    /// Fewer than two locations are rejected before any cost is looked up.
    pub fn plan(
        &self,
        locations: &[Location],
        lookup: &impl CostLookup,
    ) -> Result<PlannedTour, PlanningError> {
        ensure_tour_size(locations.len())?;

        let costs = CostMatrix::build(locations, lookup, self.options.departure)?;
        self.plan_with_costs(&costs)
    }

    /// Plan a tour over an already built cost matrix.
    pub fn plan_with_costs(&self, costs: &CostMatrix) -> Result<PlannedTour, PlanningError> {
        let formulation = TspModel::build(costs)?;
        log_statistic("numberOfVariables", formulation.model().num_variables());
        log_statistic("numberOfConstraints", formulation.model().num_constraints());

        let report = self.adapter.solve(
            formulation.model(),
            TimeBudget::starting_now(self.options.time_budget),
        );

        let status = report.status();
        let solution = match report.outcome {
            SolveOutcome::Optimal(solution) => solution,
            SolveOutcome::Infeasible | SolveOutcome::Unbounded => {
                return Err(PlanningError::NoTour { status })
            }
            SolveOutcome::TimedOut { best_bound } => {
                return Err(PlanningError::TimedOut {
                    elapsed: report.elapsed,
                    best_bound,
                })
            }
            SolveOutcome::Error(message) => return Err(PlanningError::SolverFailed { message }),
        };

        let tour = extract_tour(&formulation, &solution).map_err(|defect| {
            PlanningError::MalformedSolution {
                stage: Stage::Extraction,
                defect,
            }
        })?;
        debug!("Extracted visiting order {:?}", tour.order);

        validate_tour(costs.size(), &tour.edges).map_err(|defect| {
            PlanningError::MalformedSolution {
                stage: Stage::Validation,
                defect,
            }
        })?;

        let total_cost: f64 = tour
            .edges
            .iter()
            .map(|edge| costs.get(edge.source, edge.target))
            .sum();

        if (total_cost - solution.objective_value()).abs()
            > OBJECTIVE_TOLERANCE * total_cost.abs().max(1.0)
        {
            warn!(
                "Solver objective {} differs from the tour cost {total_cost}",
                solution.objective_value()
            );
        }

        info!(
            "Found an optimal tour over {} locations with cost {total_cost} in {:?}",
            costs.size(),
            report.elapsed
        );
        log_statistic("tourCost", total_cost);

        Ok(PlannedTour {
            order: tour.order,
            edges: tour.edges,
            total_cost,
            objective_value: solution.objective_value(),
            solve_time: report.elapsed,
        })
    }
}
