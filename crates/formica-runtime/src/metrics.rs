//! Run metrics computed from a finished run's history.

use crate::solver::SolveResult;
use formica_core::types::Iteration;
use serde::Serialize;

/// Aggregate statistics over all iterations of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunMetrics {
    pub iterations: Iteration,
    /// Ant walks attempted across the whole run.
    pub walks: usize,
    pub successful_walks: usize,
    /// `successful_walks / walks`, 0.0 for an empty run.
    pub success_rate: f64,
    /// First iteration in which any ant reached the goal.
    pub first_success_iteration: Option<Iteration>,
    /// Iteration in which the final best path was found.
    pub best_found_iteration: Option<Iteration>,
    /// Mean of the per-iteration best costs over iterations that had one.
    pub mean_iteration_best_cost: Option<f64>,
    /// Iterations that ended without a single successful ant.
    pub starved_iterations: usize,
}

impl RunMetrics {
    pub fn compute(result: &SolveResult) -> Self {
        let history = &result.history;
        let walks: usize = history.iter().map(|s| s.successes + s.failures).sum();
        let successful_walks: usize = history.iter().map(|s| s.successes).sum();

        let first_success_iteration = history
            .iter()
            .find(|s| s.successes > 0)
            .map(|s| s.iteration);
        // The global best changes exactly when stagnation resets to zero
        // with a path on record.
        let best_found_iteration = history
            .iter()
            .rev()
            .find(|s| s.stagnation == 0 && s.global_best_cost.is_some())
            .map(|s| s.iteration);

        let bests: Vec<f64> = history.iter().filter_map(|s| s.iteration_best_cost).collect();
        let mean_iteration_best_cost = if bests.is_empty() {
            None
        } else {
            Some(bests.iter().sum::<f64>() / bests.len() as f64)
        };

        Self {
            iterations: result.iterations,
            walks,
            successful_walks,
            success_rate: if walks == 0 {
                0.0
            } else {
                successful_walks as f64 / walks as f64
            },
            first_success_iteration,
            best_found_iteration,
            mean_iteration_best_cost,
            starved_iterations: history.iter().filter(|s| s.successes == 0).count(),
        }
    }
}
