//! Conditions under which a solve is abandoned.

use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use signal_hook::consts::TERM_SIGNALS;

/// A wall-clock budget which starts counting when it is created.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    started_at: Instant,
    budget: Duration,
}

impl TimeBudget {
    pub fn starting_now(budget: Duration) -> TimeBudget {
        TimeBudget {
            started_at: Instant::now(),
            budget,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// The time left, or [`Duration::ZERO`] once the budget is spent.
    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed())
    }

    pub fn is_exhausted(&self) -> bool {
        self.elapsed() >= self.budget
    }
}

/// A flag shared between the party requesting cancellation and the solver adapter polling it.
#[derive(Clone, Debug, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    /// A flag which is raised when the process receives SIGINT, SIGTERM or SIGQUIT.
    pub fn on_termination_signals() -> io::Result<Cancellation> {
        let flag = Arc::new(AtomicBool::new(false));

        for signal in TERM_SIGNALS {
            let _ = signal_hook::flag::register(*signal, Arc::clone(&flag))?;
        }

        Ok(Cancellation(flag))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
