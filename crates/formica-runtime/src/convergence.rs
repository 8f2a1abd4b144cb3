//! Convergence controller: decides when a run stops.
//!
//! The controller owns the run state: iteration counter, best path so far,
//! and the stagnation counter. After every iteration it applies, in order:
//!
//! 1. colony starvation → `Failed`
//! 2. best cost at or below the target cost (zero when unset) → `Converged`
//! 3. `stagnation_limit` iterations without strict improvement, once a
//!    path exists → `Converged`
//! 4. `max_iterations` reached → `Exhausted`
//!
//! Cancellation is requested from outside and moves a running controller
//! straight to `Cancelled`.

use crate::colony::IterationResult;
use formica_core::error::FormicaError;
use formica_core::types::{Iteration, Path};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    Running,
    /// The best path stopped improving or met the target cost.
    Converged,
    /// The iteration cap was hit first.
    Exhausted,
    /// The colony starved.
    Failed,
    /// Cancelled at an iteration boundary.
    Cancelled,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunState::Running)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Running => "RUNNING",
            RunState::Converged => "CONVERGED",
            RunState::Exhausted => "EXHAUSTED",
            RunState::Failed => "FAILED",
            RunState::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

/// Stopping criteria.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopCriteria {
    pub max_iterations: u64,
    pub stagnation_limit: u64,
    pub target_cost: Option<f64>,
}

/// What changed when an iteration was observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub state: RunState,
    /// The global best improved this iteration.
    pub improved: bool,
}

/// Tracks the running best and applies the stopping rules.
#[derive(Debug, Clone)]
pub struct ConvergenceController {
    criteria: StopCriteria,
    state: RunState,
    iterations: Iteration,
    best: Option<Path>,
    best_found_at: Option<Iteration>,
    stagnation: u64,
    failure: Option<FormicaError>,
}

impl ConvergenceController {
    pub fn new(criteria: StopCriteria) -> Self {
        Self {
            criteria,
            state: RunState::Running,
            iterations: 0,
            best: None,
            best_found_at: None,
            stagnation: 0,
            failure: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Iterations observed so far.
    pub fn iterations(&self) -> Iteration {
        self.iterations
    }

    pub fn best(&self) -> Option<&Path> {
        self.best.as_ref()
    }

    pub fn best_cost(&self) -> Option<f64> {
        self.best.as_ref().map(Path::cost)
    }

    /// Iteration in which the current best was first found.
    pub fn best_found_at(&self) -> Option<Iteration> {
        self.best_found_at
    }

    /// Iterations since the last strict improvement.
    pub fn stagnation(&self) -> u64 {
        self.stagnation
    }

    /// The error that failed the run, if any.
    pub fn failure(&self) -> Option<&FormicaError> {
        self.failure.as_ref()
    }

    /// Fold one iteration into the run state and evaluate the stopping
    /// rules. `starvation` carries the scheduler's starvation error when the
    /// colony has gone too long without a successful ant.
    ///
    /// Observing after a terminal state leaves the state unchanged.
    pub fn observe(
        &mut self,
        result: &IterationResult,
        starvation: Option<FormicaError>,
    ) -> Observation {
        if self.state.is_terminal() {
            return Observation {
                state: self.state,
                improved: false,
            };
        }
        self.iterations += 1;

        let improved = match (&result.best_path, self.best_cost()) {
            (Some(candidate), Some(best)) => candidate.cost() < best,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if improved {
            self.best = result.best_path.clone();
            self.best_found_at = Some(result.iteration);
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }

        // Costs are never negative, so a zero-cost best cannot improve.
        let target = self.criteria.target_cost.unwrap_or(0.0);
        let reached_target = self.best_cost().is_some_and(|best| best <= target);

        self.state = if let Some(err) = starvation {
            self.failure = Some(err);
            RunState::Failed
        } else if reached_target {
            RunState::Converged
        } else if self.best.is_some() && self.stagnation >= self.criteria.stagnation_limit {
            RunState::Converged
        } else if self.iterations >= self.criteria.max_iterations {
            RunState::Exhausted
        } else {
            RunState::Running
        };

        Observation {
            state: self.state,
            improved,
        }
    }

    /// Stop a running controller at the current iteration boundary.
    pub fn cancel(&mut self) -> RunState {
        if self.is_running() {
            self.state = RunState::Cancelled;
        }
        self.state
    }

    /// Consume the controller, yielding the best path and failure cause.
    pub fn into_parts(self) -> (Option<Path>, Option<FormicaError>) {
        (self.best, self.failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formica_core::types::Cell;

    fn criteria() -> StopCriteria {
        StopCriteria {
            max_iterations: 10,
            stagnation_limit: 3,
            target_cost: None,
        }
    }

    fn path(cost: f64) -> Path {
        Path::new(vec![Cell::new(0, 0), Cell::new(0, 1)], cost)
    }

    fn result(iteration: Iteration, best: Option<f64>) -> IterationResult {
        IterationResult {
            iteration,
            paths: Vec::new(),
            costs: Vec::new(),
            failures: Vec::new(),
            best_path: best.map(path),
            best_cost: best,
            best_ant: None,
            consecutive_starved: 0,
        }
    }

    #[test]
    fn converges_after_stagnation_limit() {
        let mut ctl = ConvergenceController::new(criteria());
        assert!(ctl.observe(&result(1, Some(10.0)), None).improved);
        assert!(ctl.observe(&result(2, Some(8.0)), None).improved);
        assert_eq!(ctl.observe(&result(3, Some(8.0)), None).state, RunState::Running);
        assert_eq!(ctl.observe(&result(4, Some(9.0)), None).state, RunState::Running);
        assert_eq!(ctl.observe(&result(5, None), None).state, RunState::Converged);
        assert_eq!(ctl.best_cost(), Some(8.0));
        assert_eq!(ctl.best_found_at(), Some(2));
        assert_eq!(ctl.iterations(), 5);
    }

    #[test]
    fn equal_cost_is_not_an_improvement() {
        let mut ctl = ConvergenceController::new(criteria());
        ctl.observe(&result(1, Some(8.0)), None);
        let obs = ctl.observe(&result(2, Some(8.0)), None);
        assert!(!obs.improved);
        assert_eq!(ctl.stagnation(), 1);
        assert_eq!(ctl.best_found_at(), Some(1));
    }

    #[test]
    fn never_converges_without_a_path() {
        let mut ctl = ConvergenceController::new(criteria());
        for i in 1..10 {
            assert_eq!(ctl.observe(&result(i, None), None).state, RunState::Running);
        }
        assert_eq!(ctl.observe(&result(10, None), None).state, RunState::Exhausted);
        assert!(ctl.best().is_none());
    }

    #[test]
    fn target_cost_stops_early() {
        let mut ctl = ConvergenceController::new(StopCriteria {
            target_cost: Some(8.0),
            ..criteria()
        });
        assert_eq!(ctl.observe(&result(1, Some(12.0)), None).state, RunState::Running);
        assert_eq!(ctl.observe(&result(2, Some(8.0)), None).state, RunState::Converged);
    }

    #[test]
    fn starvation_takes_precedence() {
        let mut ctl = ConvergenceController::new(StopCriteria {
            max_iterations: 1,
            ..criteria()
        });
        let starved = FormicaError::ColonyStarved {
            consecutive: 1,
            iteration: 1,
        };
        let obs = ctl.observe(&result(1, None), Some(starved.clone()));
        assert_eq!(obs.state, RunState::Failed);
        assert_eq!(ctl.failure(), Some(&starved));
    }

    #[test]
    fn terminal_state_is_sticky() {
        let mut ctl = ConvergenceController::new(StopCriteria {
            max_iterations: 1,
            ..criteria()
        });
        assert_eq!(ctl.observe(&result(1, Some(5.0)), None).state, RunState::Exhausted);
        assert_eq!(ctl.observe(&result(2, Some(1.0)), None).state, RunState::Exhausted);
        assert_eq!(ctl.cancel(), RunState::Exhausted);
        assert_eq!(ctl.best_cost(), Some(5.0));
    }

    #[test]
    fn cancel_keeps_best_so_far() {
        let mut ctl = ConvergenceController::new(criteria());
        ctl.observe(&result(1, Some(6.0)), None);
        assert_eq!(ctl.cancel(), RunState::Cancelled);
        let (best, failure) = ctl.into_parts();
        assert_eq!(best.map(|p| p.cost()), Some(6.0));
        assert!(failure.is_none());
    }
}
