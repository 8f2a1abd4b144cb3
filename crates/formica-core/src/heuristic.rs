//! Heuristic desirability of stepping onto a cell.
//!
//! Ants weight each candidate edge by `intensity^alpha * desirability^beta`.
//! A heuristic returns a desirability: larger means "closer to the goal".
//! Any closure `Fn(Cell, Cell) -> f64` works as a heuristic.

use crate::types::Cell;
use serde::{Deserialize, Serialize};

/// Estimate how attractive `candidate` is on the way to `goal`.
///
/// Implementations should return a non-negative value. `+inf` (for
/// example `1 / distance` at the goal itself) makes the candidate the
/// ants' overwhelming favourite; NaN or negative values count as zero.
pub trait Heuristic: Send + Sync {
    fn desirability(&self, candidate: Cell, goal: Cell) -> f64;
}

impl<F> Heuristic for F
where
    F: Fn(Cell, Cell) -> f64 + Send + Sync,
{
    fn desirability(&self, candidate: Cell, goal: Cell) -> f64 {
        self(candidate, goal)
    }
}

/// The built-in heuristics, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HeuristicKind {
    /// `1 / (1 + manhattan distance)`.
    #[default]
    InverseManhattan,
    /// `1 / (1 + euclidean distance)`.
    InverseEuclidean,
    /// `1 / (1 + chebyshev distance)`, natural for 8-connected mazes.
    InverseChebyshev,
    /// Every cell equally desirable; pheromone alone steers the ants.
    Uniform,
}

impl Heuristic for HeuristicKind {
    fn desirability(&self, candidate: Cell, goal: Cell) -> f64 {
        match self {
            HeuristicKind::InverseManhattan => 1.0 / (1.0 + candidate.manhattan(&goal) as f64),
            HeuristicKind::InverseEuclidean => 1.0 / (1.0 + candidate.euclidean(&goal)),
            HeuristicKind::InverseChebyshev => 1.0 / (1.0 + candidate.chebyshev(&goal) as f64),
            HeuristicKind::Uniform => 1.0,
        }
    }
}
