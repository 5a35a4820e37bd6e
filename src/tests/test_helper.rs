#![cfg(test)]
//! Shared fixtures for the pipeline tests.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::cost::CostLookup;
use crate::cost::CostLookupError;
use crate::cost::CostMatrix;
use crate::cost::DepartureTime;
use crate::cost::Location;
use crate::model::Model;
use crate::pipeline::PlannerOptions;
use crate::pipeline::TourPlanner;
use crate::solver::GoodLpBackend;
use crate::solver::MilpBackend;
use crate::solver::SolveOutcome;
use crate::solver::SolverAdapter;
use crate::tour::TourEdge;

pub(crate) fn options(time_budget: Duration) -> PlannerOptions {
    PlannerOptions {
        time_budget,
        departure: DepartureTime::from_unix_seconds(1_700_000_000),
    }
}

/// A planner backed by the real MILP solver.
pub(crate) fn milp_planner() -> TourPlanner<GoodLpBackend> {
    TourPlanner::new(
        SolverAdapter::new(GoodLpBackend),
        options(Duration::from_secs(120)),
    )
}

pub(crate) fn locations(size: usize) -> Vec<Location> {
    (0..size)
        .map(|index| Location::new(index, format!("{}.0,{}.0", 50 + index, 4 + index)))
        .collect()
}

/// A lookup which answers with the entries of `rows`.
pub(crate) fn lookup_from(
    rows: Vec<Vec<f64>>,
) -> impl Fn(&Location, &Location, DepartureTime) -> Result<f64, CostLookupError> {
    move |origin, destination, _| Ok(rows[origin.index()][destination.index()])
}

/// A backend which returns the same outcome every time and counts its invocations.
#[derive(Clone, Debug)]
pub(crate) struct ScriptedBackend {
    outcome: SolveOutcome,
    calls: Arc<AtomicUsize>,
}

impl ScriptedBackend {
    pub(crate) fn new(outcome: SolveOutcome) -> Self {
        ScriptedBackend {
            outcome,
            calls: Arc::default(),
        }
    }

    pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl MilpBackend for ScriptedBackend {
    fn solve(&self, _: &Model) -> SolveOutcome {
        let _ = self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// A backend which never finishes within any reasonable budget.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StallingBackend;

impl MilpBackend for StallingBackend {
    fn solve(&self, _: &Model) -> SolveOutcome {
        thread::sleep(Duration::from_secs(30));
        SolveOutcome::Error("stalling backend woke up".to_owned())
    }
}

/// The optimal tour cost, found by trying every order of the nodes `1..n` after node 0.
pub(crate) fn brute_force_optimum(costs: &CostMatrix) -> f64 {
    fn search(costs: &CostMatrix, last: usize, remaining: &mut Vec<usize>, cost: f64) -> f64 {
        if remaining.is_empty() {
            return cost + costs.get(last, 0);
        }

        let mut best = f64::INFINITY;
        for idx in 0..remaining.len() {
            let next = remaining.swap_remove(idx);
            best = best.min(search(costs, next, remaining, cost + costs.get(last, next)));
            remaining.push(next);
            let end = remaining.len() - 1;
            remaining.swap(idx, end);
        }
        best
    }

    let mut remaining: Vec<usize> = (1..costs.size()).collect();
    search(costs, 0, &mut remaining, 0.0)
}

/// The arcs of a tour as unordered pairs, for comparing tours over symmetric costs.
pub(crate) fn undirected(edges: impl IntoIterator<Item = TourEdge>) -> Vec<(usize, usize)> {
    let mut pairs: Vec<_> = edges
        .into_iter()
        .map(|edge| (edge.source.min(edge.target), edge.source.max(edge.target)))
        .collect();
    pairs.sort_unstable();
    pairs
}
