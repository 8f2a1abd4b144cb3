//! Colony: the iteration scheduler.
//!
//! The colony owns the pheromone field and runs one iteration at a time:
//!
//! 1. Every ant of the cohort walks from start to goal against the same
//!    frozen field (fanned out over rayon when `parallel` is on)
//! 2. The whole field evaporates once
//! 3. The deposit rule picks which successful paths reinforce their edges
//! 4. Optionally the best-known path gets an elitist bonus
//! 5. The iteration's best path is picked (lowest cost, lowest ant index on ties)
//!
//! Ants borrow the field immutably during step 1; steps 2–4 borrow it
//! mutably, so no ant can observe a deposit from its own iteration.
//!
//! Failed ants contribute nothing. An iteration in which every ant fails
//! still evaporates; once more than `starvation_limit` such iterations
//! happen in a row [`Colony::starvation`] reports [`FormicaError::ColonyStarved`].

use crate::convergence::RunState;
use crate::deposit::{self, DepositRule};
use formica_agents::ant::{Ant, AntParams};
use formica_core::error::{FormicaError, NoPathReason, Result};
use formica_core::heuristic::Heuristic;
use formica_core::maze::MazeGraph;
use formica_core::pheromone::PheromoneField;
use formica_core::random::ant_rng;
use formica_core::types::{AntId, Iteration, Path};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Event emitted while a run progresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColonyEvent {
    /// An iteration finished and the field was updated.
    IterationComplete { summary: IterationSummary },
    /// The global best path improved.
    NewBest {
        iteration: Iteration,
        cost: f64,
        length: usize,
    },
    /// No ant reached the goal this iteration.
    Starved { iteration: Iteration, consecutive: u64 },
    /// The run reached a terminal state.
    Terminated {
        state: RunState,
        iterations: Iteration,
    },
}

/// Compact, serializable record of one iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationSummary {
    pub iteration: Iteration,
    pub successes: usize,
    pub failures: usize,
    /// Cheapest path of this iteration.
    pub iteration_best_cost: Option<f64>,
    /// Cheapest path of the run so far, including this iteration.
    pub global_best_cost: Option<f64>,
    /// Iterations since the global best last improved.
    pub stagnation: u64,
    /// Mean cost over successful ants.
    pub mean_cost: Option<f64>,
}

/// Outcome of one iteration.
#[derive(Debug, Clone)]
pub struct IterationResult {
    pub iteration: Iteration,
    /// Successful paths, in ant order.
    pub paths: Vec<(AntId, Path)>,
    /// Costs of `paths`, index for index.
    pub costs: Vec<f64>,
    pub failures: Vec<(AntId, NoPathReason)>,
    pub best_path: Option<Path>,
    pub best_cost: Option<f64>,
    pub best_ant: Option<AntId>,
    /// Zero-success iterations in a row, this one included.
    pub consecutive_starved: u64,
}

impl IterationResult {
    pub fn successes(&self) -> usize {
        self.paths.len()
    }

    pub fn population(&self) -> usize {
        self.paths.len() + self.failures.len()
    }

    pub fn mean_cost(&self) -> Option<f64> {
        if self.costs.is_empty() {
            None
        } else {
            Some(self.costs.iter().sum::<f64>() / self.costs.len() as f64)
        }
    }
}

/// Field update parameters applied between iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateRule {
    pub rho: f64,
    pub q: f64,
    pub deposit: DepositRule,
    /// Elitist weight, `None` when elitism is off.
    pub elitist: Option<f64>,
}

/// Runs iterations against an exclusively owned pheromone field.
pub struct Colony<'g> {
    graph: &'g MazeGraph,
    field: PheromoneField,
    ants: Vec<Ant>,
    update: UpdateRule,
    seed: u64,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel: bool,
    iteration: Iteration,
    starved: u64,
    starvation_limit: u64,
}

impl<'g> Colony<'g> {
    /// A colony of `population` ants sharing `params`.
    pub fn new(
        graph: &'g MazeGraph,
        field: PheromoneField,
        population: usize,
        params: AntParams,
        update: UpdateRule,
        seed: u64,
    ) -> Result<Self> {
        let count = u32::try_from(population).map_err(|_| {
            FormicaError::out_of_range("population_size", 1.0, f64::from(u32::MAX), population as f64)
        })?;
        if count == 0 {
            return Err(FormicaError::invalid_config(
                "population_size",
                "0",
                "at least one ant is required",
            ));
        }
        Ok(Self {
            graph,
            field,
            ants: (0..count).map(|i| Ant::new(AntId(i), params)).collect(),
            update,
            seed,
            parallel: false,
            iteration: 0,
            starved: 0,
            starvation_limit: u64::MAX,
        })
    }

    /// Construct paths on the rayon pool. Without the `parallel` feature
    /// this is a no-op and ants always run sequentially.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_starvation_limit(mut self, limit: u64) -> Self {
        self.starvation_limit = limit;
        self
    }

    pub fn graph(&self) -> &MazeGraph {
        self.graph
    }

    pub fn field(&self) -> &PheromoneField {
        &self.field
    }

    pub fn into_field(self) -> PheromoneField {
        self.field
    }

    pub fn population(&self) -> usize {
        self.ants.len()
    }

    /// Iterations run so far.
    pub fn iteration(&self) -> Iteration {
        self.iteration
    }

    /// Run one iteration. `elite` is the best path known before this
    /// iteration; it only matters when elitism is on.
    pub fn run_iteration<H>(&mut self, heuristic: &H, elite: Option<&Path>) -> Result<IterationResult>
    where
        H: Heuristic + ?Sized,
    {
        self.iteration += 1;
        let iteration = self.iteration;

        let outcomes = self.construct_all(heuristic);

        let mut paths = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(path) => paths.push((id, path)),
                Err(FormicaError::NoPathFound(reason)) => {
                    trace!(iteration, ant = %id, %reason, "ant failed");
                    failures.push((id, reason));
                }
                Err(other) => return Err(other),
            }
        }
        let costs: Vec<f64> = paths.iter().map(|(_, p)| p.cost()).collect();

        // First strictly cheaper path wins, so ties go to the lower ant index.
        let best_idx = costs
            .iter()
            .enumerate()
            .fold(None, |best: Option<usize>, (i, &c)| match best {
                Some(b) if costs[b] <= c => Some(b),
                _ => Some(i),
            });

        self.field.evaporate(self.update.rho)?;
        let deposited = deposit::apply(&mut self.field, self.update.deposit, &paths, self.update.q)?;

        if let Some(weight) = self.update.elitist {
            let iteration_best = best_idx.map(|i| &paths[i].1);
            let target = match (elite, iteration_best) {
                (Some(e), Some(b)) if b.cost() < e.cost() => Some(b),
                (Some(e), _) => Some(e),
                (None, b) => b,
            };
            if let Some(path) = target {
                deposit::reinforce_best(&mut self.field, path, self.update.q, weight)?;
            }
        }

        if paths.is_empty() {
            self.starved += 1;
            warn!(iteration, consecutive = self.starved, "no ant reached the goal");
        } else {
            self.starved = 0;
        }

        debug!(
            iteration,
            successes = paths.len(),
            failures = failures.len(),
            deposited,
            best = ?best_idx.map(|i| costs[i]),
            "iteration complete"
        );

        Ok(IterationResult {
            iteration,
            best_path: best_idx.map(|i| paths[i].1.clone()),
            best_cost: best_idx.map(|i| costs[i]),
            best_ant: best_idx.map(|i| paths[i].0),
            paths,
            costs,
            failures,
            consecutive_starved: self.starved,
        })
    }

    /// `Some(ColonyStarved)` once the starvation limit has been exceeded.
    pub fn starvation(&self) -> Option<FormicaError> {
        (self.starved > self.starvation_limit).then_some(FormicaError::ColonyStarved {
            consecutive: self.starved,
            iteration: self.iteration,
        })
    }

    fn construct_all<H>(&self, heuristic: &H) -> Vec<(AntId, Result<Path>)>
    where
        H: Heuristic + ?Sized,
    {
        let (start, goal) = (self.graph.start(), self.graph.goal());
        let walk = |ant: &Ant| {
            let mut rng = ant_rng(self.seed, self.iteration, ant.id().0);
            let outcome = ant.construct_path(self.graph, &self.field, start, goal, heuristic, &mut rng);
            (ant.id(), outcome)
        };

        #[cfg(feature = "parallel")]
        if self.parallel {
            return self.ants.par_iter().map(walk).collect();
        }

        self.ants.iter().map(walk).collect()
    }
}
