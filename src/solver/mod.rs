//! Runs a MILP backend against a [`Model`] under a time budget.
//!
//! The search itself is delegated to a [`MilpBackend`]; any backend which solves the model to
//! optimality is interchangeable. The [`SolverAdapter`] makes sure every outcome, including
//! timeouts, cancellation and backend failures, is reported as a [`SolveStatus`] instead of a
//! panic or an indefinite block.

mod good_lp_backend;

use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::mpsc;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use log::debug;
use log::warn;

pub use good_lp_backend::GoodLpBackend;

use crate::model::Model;
use crate::model::VariableId;
use crate::statistics::log_statistic;
use crate::termination::Cancellation;
use crate::termination::TimeBudget;

/// How often the adapter checks for cancellation while the backend is running.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A general-purpose MILP solver.
pub trait MilpBackend: Send + Sync + 'static {
    /// Solve `model` to optimality.
    ///
    /// Backends which can stop early on their own may return [`SolveOutcome::TimedOut`]; the
    /// [`SolverAdapter`] enforces the time budget regardless.
    fn solve(&self, model: &Model) -> SolveOutcome;
}

/// The values of all variables at the end of a successful solve.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    values: Box<[f64]>,
    objective_value: f64,
}

impl Solution {
    /// `values` is indexed by [`VariableId::index`].
    pub fn new(values: impl Into<Box<[f64]>>, objective_value: f64) -> Self {
        Solution {
            values: values.into(),
            objective_value,
        }
    }

    /// # Panics
    ///
    /// Panics if `variable` does not belong to the solved model.
    pub fn value(&self, variable: VariableId) -> f64 {
        self.values[variable.index()]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SolveOutcome {
    Optimal(Solution),
    Infeasible,
    Unbounded,
    /// The budget ran out or the solve was cancelled. Carries the best bound the backend proved,
    /// if it reported one.
    TimedOut {
        best_bound: Option<f64>,
    },
    Error(String),
}

impl SolveOutcome {
    pub fn status(&self) -> SolveStatus {
        match self {
            SolveOutcome::Optimal(_) => SolveStatus::Optimal,
            SolveOutcome::Infeasible => SolveStatus::Infeasible,
            SolveOutcome::Unbounded => SolveStatus::Unbounded,
            SolveOutcome::TimedOut { .. } => SolveStatus::TimedOut,
            SolveOutcome::Error(_) => SolveStatus::Error,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    TimedOut,
    Error,
}

impl Display for SolveStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::TimedOut => "timed out",
            SolveStatus::Error => "error",
        };

        f.write_str(name)
    }
}

/// The outcome of a solve together with the wall-clock time it took.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveReport {
    pub outcome: SolveOutcome,
    pub elapsed: Duration,
}

impl SolveReport {
    pub fn status(&self) -> SolveStatus {
        self.outcome.status()
    }
}

/// Runs a [`MilpBackend`] on a worker thread so the caller regains control when the
/// [`TimeBudget`] is spent or the [`Cancellation`] is raised.
///
/// Backends cannot be interrupted, so after a timeout or cancellation the backend thread is
/// detached: it keeps running with its own copy of the model until the backend returns, and its
/// result is discarded. Each solve uses a fresh channel, so a late result never leaks into a later
/// solve, but repeated timeouts leave one running thread each until they finish.
#[derive(Debug)]
pub struct SolverAdapter<Backend> {
    backend: Arc<Backend>,
    cancellation: Cancellation,
}

impl<Backend: MilpBackend> SolverAdapter<Backend> {
    pub fn new(backend: Backend) -> Self {
        SolverAdapter {
            backend: Arc::new(backend),
            cancellation: Cancellation::default(),
        }
    }

    pub fn with_cancellation(self, cancellation: Cancellation) -> Self {
        SolverAdapter {
            cancellation,
            ..self
        }
    }

    pub fn solve(&self, model: &Model, time_budget: TimeBudget) -> SolveReport {
        let started_at = Instant::now();
        let outcome = self.run(model, time_budget);
        let elapsed = started_at.elapsed();

        debug!("Solver finished with status '{}' after {elapsed:?}", outcome.status());
        log_statistic("solveStatus", outcome.status());
        log_statistic("timeSpentInSolverInMilliseconds", elapsed.as_millis());

        SolveReport { outcome, elapsed }
    }

    fn run(&self, model: &Model, time_budget: TimeBudget) -> SolveOutcome {
        if time_budget.is_exhausted() || self.cancellation.is_cancelled() {
            return SolveOutcome::TimedOut { best_bound: None };
        }

        let (sender, receiver) = mpsc::channel();
        let backend = Arc::clone(&self.backend);
        let model = model.clone();

        let spawned = thread::Builder::new()
            .name("milp-solve".to_owned())
            .spawn(move || {
                let outcome = backend.solve(&model);
                // The receiver is gone when the adapter has already given up.
                let _ = sender.send(outcome);
            });

        if let Err(error) = spawned {
            return SolveOutcome::Error(format!("failed to start the solver thread: {error}"));
        }

        loop {
            match receiver.recv_timeout(time_budget.remaining().min(POLL_INTERVAL)) {
                Ok(outcome) => return outcome,
                Err(RecvTimeoutError::Timeout) => {
                    if self.cancellation.is_cancelled() {
                        warn!(
                            "Solve cancelled after {:?}; the backend thread is left to finish",
                            time_budget.elapsed()
                        );
                        return SolveOutcome::TimedOut { best_bound: None };
                    }
                    if time_budget.is_exhausted() {
                        warn!(
                            "Solver exceeded its time budget of {:?}; \
                             the backend thread is left to finish",
                            time_budget.budget()
                        );
                        return SolveOutcome::TimedOut { best_bound: None };
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return SolveOutcome::Error(
                        "the solver thread stopped without reporting a result".to_owned(),
                    );
                }
            }
        }
    }
}
