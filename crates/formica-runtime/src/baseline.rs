//! Exact shortest paths, for judging how close a colony got.
//!
//! The colony never consults this module; it is a reference only.

use crate::solver::SolveResult;
use formica_core::maze::MazeGraph;
use formica_core::types::{Connectivity, CostModel, Path};
use petgraph::algo::astar;
use petgraph::visit::EdgeRef;
use serde::Serialize;

/// Tolerance when comparing path costs.
const COST_EPSILON: f64 = 1e-9;

/// Shortest start-to-goal path under `cost`, found with A*.
pub fn optimal_path(graph: &MazeGraph, cost: CostModel) -> Option<Path> {
    let start = graph.petgraph_index(&graph.start())?;
    let goal = graph.petgraph_index(&graph.goal())?;
    let goal_cell = graph.goal();
    let connectivity = graph.connectivity();
    let g = graph.petgraph();

    let (total, nodes) = astar(
        g,
        start,
        |n| n == goal,
        |e| match cost {
            CostModel::Steps => 1.0,
            CostModel::Weighted => *e.weight(),
        },
        // Every step moves at most one row and one column and costs at
        // least 1, so these never overestimate.
        |n| {
            let cell = g[n];
            match connectivity {
                Connectivity::Four => cell.manhattan(&goal_cell) as f64,
                Connectivity::Eight => cell.chebyshev(&goal_cell) as f64,
            }
        },
    )?;
    let cells = nodes.into_iter().map(|n| g[n]).collect();
    Some(Path::new(cells, total))
}

/// How a colony's best path compares with the exact optimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimalityReport {
    pub aco_cost: f64,
    pub optimal_cost: f64,
    /// Relative excess over the optimum; 0.0 when optimal.
    pub gap: f64,
    pub is_optimal: bool,
}

/// Compare a run against the exact optimum. `None` if the run found no path.
pub fn compare(result: &SolveResult, graph: &MazeGraph, cost: CostModel) -> Option<OptimalityReport> {
    let aco_cost = result.best_cost?;
    let optimal_cost = optimal_path(graph, cost)?.cost();
    let excess = aco_cost - optimal_cost;
    let gap = if optimal_cost > 0.0 {
        excess / optimal_cost
    } else {
        excess
    };
    Some(OptimalityReport {
        aco_cost,
        optimal_cost,
        gap,
        is_optimal: excess.abs() < COST_EPSILON,
    })
}
