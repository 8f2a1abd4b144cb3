//! Ant: a single stochastic walker.
//!
//! An ant starts at the start cell and repeatedly steps to an unvisited
//! neighbor drawn by [`roulette`](crate::selection::roulette) over
//! `tau^alpha * eta^beta`. Visited cells are never candidates again, so
//! every returned path is cycle-free. The walk fails rather than returning
//! a partial path when it runs out of steps or reaches a dead end.
//!
//! With backtracking enabled an ant that hits a dead end retreats one cell
//! along its own trail and tries again from there. The abandoned cell stays
//! marked as visited.

use crate::selection::{attractiveness, roulette};
use formica_core::error::{FormicaError, NoPathReason, Result, UnsolvableReason};
use formica_core::heuristic::Heuristic;
use formica_core::maze::MazeGraph;
use formica_core::pheromone::PheromoneField;
use formica_core::random::RandomSource;
use formica_core::types::{AntId, Cell, CostModel, Path};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Parameters shared by every ant in a cohort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AntParams {
    /// Trust in accumulated pheromone.
    pub alpha: f64,
    /// Trust in the heuristic.
    pub beta: f64,
    /// Maximum moves (forward and, with backtracking, backward) per walk.
    pub max_steps: usize,
    /// Retreat from dead ends instead of failing.
    pub backtracking: bool,
    /// How the finished path is priced.
    pub cost: CostModel,
}

impl Default for AntParams {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 3.0,
            max_steps: 10_000,
            backtracking: false,
            cost: CostModel::Steps,
        }
    }
}

/// A path-constructing agent.
#[derive(Debug, Clone)]
pub struct Ant {
    id: AntId,
    params: AntParams,
}

impl Ant {
    pub fn new(id: AntId, params: AntParams) -> Self {
        Self { id, params }
    }

    pub fn id(&self) -> AntId {
        self.id
    }

    pub fn params(&self) -> &AntParams {
        &self.params
    }

    /// Walk from `start` to `goal` over a frozen view of `field`.
    ///
    /// Fails with [`FormicaError::NoPathFound`] when the step budget runs
    /// out or the ant is stuck with no unvisited neighbor.
    pub fn construct_path<H, R>(
        &self,
        graph: &MazeGraph,
        field: &PheromoneField,
        start: Cell,
        goal: Cell,
        heuristic: &H,
        rng: &mut R,
    ) -> Result<Path>
    where
        H: Heuristic + ?Sized,
        R: RandomSource + ?Sized,
    {
        let start_node = graph
            .node_of(&start)
            .ok_or(FormicaError::unsolvable(UnsolvableReason::Wall(start)))?;
        let goal_node = graph
            .node_of(&goal)
            .ok_or(FormicaError::unsolvable(UnsolvableReason::Wall(goal)))?;

        let AntParams {
            alpha,
            beta,
            max_steps,
            backtracking,
            cost,
        } = self.params;

        let mut visited = vec![false; graph.node_count()];
        visited[start_node] = true;
        let mut trail = vec![start_node];
        // Weight of the edge that led to each trail cell after the first.
        let mut weights: Vec<f64> = Vec::new();
        let mut slots: Vec<usize> = Vec::with_capacity(8);
        let mut scores: Vec<f64> = Vec::with_capacity(8);
        let mut steps = 0usize;
        let mut current = start_node;

        while current != goal_node {
            if steps >= max_steps {
                trace!(ant = %self.id, steps, "step limit reached");
                return Err(FormicaError::no_path(NoPathReason::StepLimit { steps }));
            }

            slots.clear();
            scores.clear();
            for (slot, adj) in graph.adjacent(current).iter().enumerate() {
                if visited[adj.node] {
                    continue;
                }
                let tau = field.intensity_at(current, slot);
                let eta = heuristic.desirability(adj.cell, goal);
                slots.push(slot);
                scores.push(attractiveness(tau, eta, alpha, beta));
            }

            let Some(pick) = roulette(&scores, rng) else {
                if backtracking && trail.len() > 1 {
                    trail.pop();
                    weights.pop();
                    steps += 1;
                    current = trail[trail.len() - 1];
                    continue;
                }
                let at = graph.cell_of(current);
                trace!(ant = %self.id, %at, steps, "dead end");
                return Err(FormicaError::no_path(NoPathReason::DeadEnd { at, steps }));
            };

            let step = graph.adjacent(current)[slots[pick]];
            visited[step.node] = true;
            trail.push(step.node);
            weights.push(step.weight);
            steps += 1;
            current = step.node;
        }

        let path_cost = match cost {
            CostModel::Steps => weights.len() as f64,
            CostModel::Weighted => weights.iter().sum(),
        };
        let cells = trail.into_iter().map(|n| graph.cell_of(n)).collect();
        Ok(Path::new(cells, path_cost))
    }
}
