//! Solver: the `solve` entry point.
//!
//! Validates the configuration, builds the maze graph, then alternates
//! colony iterations and convergence checks until the run reaches a
//! terminal state.
//!
//! # Example
//!
//! ```rust
//! use formica_core::grid::MazeGrid;
//! use formica_core::types::Cell;
//! use formica_runtime::config::SolveConfig;
//! use formica_runtime::solver::solve;
//!
//! let grid = MazeGrid::open(5, 5);
//! let config = SolveConfig::default().with_seed(7);
//! let result = solve(&grid, Cell::new(0, 0), Cell::new(4, 4), &config).unwrap();
//! assert_eq!(result.best_cost, Some(8.0));
//! ```

use crate::cancel::CancelToken;
use crate::colony::{Colony, ColonyEvent, IterationSummary, UpdateRule};
use crate::config::SolveConfig;
use crate::convergence::{ConvergenceController, RunState, StopCriteria};
use formica_core::error::{FormicaError, Result};
use formica_core::grid::MazeGrid;
use formica_core::heuristic::Heuristic;
use formica_core::maze::MazeGraph;
use formica_core::pheromone::PheromoneField;
use formica_core::random::fresh_seed;
use formica_core::types::{Cell, Iteration, Path, RunId};
use tracing::{info, info_span, warn};

/// How a run ended and what it found.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub run_id: RunId,
    /// The seed actually used; pass it back in to replay the run.
    pub seed: u64,
    pub best_path: Option<Path>,
    pub best_cost: Option<f64>,
    pub iterations: Iteration,
    pub terminal_state: RunState,
    /// Set when `terminal_state` is `Failed`.
    pub failure: Option<FormicaError>,
    pub history: Vec<IterationSummary>,
}

impl SolveResult {
    /// A path was found and the colony did not starve.
    pub fn is_success(&self) -> bool {
        self.terminal_state != RunState::Failed && self.best_path.is_some()
    }

    /// Turn a failed run into its error.
    pub fn into_result(mut self) -> Result<Self> {
        if self.terminal_state != RunState::Failed {
            return Ok(self);
        }
        Err(self.failure.take().unwrap_or(FormicaError::ColonyStarved {
            consecutive: 0,
            iteration: self.iterations,
        }))
    }
}

/// Solve with a configuration and the configured built-in heuristic.
pub fn solve(grid: &MazeGrid, start: Cell, goal: Cell, config: &SolveConfig) -> Result<SolveResult> {
    Solver::new(config.clone()).solve(grid, start, goal)
}

/// A configurable solve run: custom heuristic, cancellation, event observer.
pub struct Solver<'a> {
    config: SolveConfig,
    heuristic: Option<Box<dyn Heuristic + 'a>>,
    cancel: Option<CancelToken>,
    observer: Option<Box<dyn FnMut(&ColonyEvent) + 'a>>,
}

impl<'a> Solver<'a> {
    pub fn new(config: SolveConfig) -> Self {
        Self {
            config,
            heuristic: None,
            cancel: None,
            observer: None,
        }
    }

    pub fn config(&self) -> &SolveConfig {
        &self.config
    }

    /// Replace the configured heuristic with a caller-supplied one.
    pub fn with_heuristic<H: Heuristic + 'a>(mut self, heuristic: H) -> Self {
        self.heuristic = Some(Box::new(heuristic));
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Receive every [`ColonyEvent`] as the run progresses.
    pub fn on_event<F: FnMut(&ColonyEvent) + 'a>(mut self, observer: F) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Build the maze graph for `grid` and run the colony on it.
    pub fn solve(&mut self, grid: &MazeGrid, start: Cell, goal: Cell) -> Result<SolveResult> {
        self.config.validate()?;
        let graph = MazeGraph::build(grid, start, goal, self.config.connectivity)?;
        self.solve_graph(&graph)
    }

    /// Run the colony on an already built graph. The graph's connectivity
    /// takes precedence over the configured one.
    pub fn solve_graph(&mut self, graph: &MazeGraph) -> Result<SolveResult> {
        self.config.validate()?;
        let Solver {
            config,
            heuristic,
            cancel,
            observer,
        } = self;

        let seed = config.seed.unwrap_or_else(fresh_seed);
        let run_id = config.seed.map_or_else(RunId::new, RunId::from_seed);
        let span = info_span!("solve", %run_id, seed);
        let _guard = span.enter();

        let heuristic: &dyn Heuristic = match heuristic.as_deref() {
            Some(h) => h,
            None => &config.heuristic,
        };
        let mut emit = |event: ColonyEvent| {
            if let Some(observer) = observer.as_mut() {
                observer(&event);
            }
        };

        info!(
            cells = graph.node_count(),
            edges = graph.edge_count(),
            population = config.population_size,
            start = %graph.start(),
            goal = %graph.goal(),
            "run started"
        );

        let field = PheromoneField::initialize(graph, config.tau0, config.tau_min)?;
        let update = UpdateRule {
            rho: config.rho,
            q: config.q,
            deposit: config.deposit,
            elitist: config.elitist.then_some(config.elitist_weight),
        };
        let mut colony = Colony::new(
            graph,
            field,
            config.population_size,
            config.ant_params(graph.node_count()),
            update,
            seed,
        )?
        .with_parallel(config.parallel)
        .with_starvation_limit(config.starvation_limit);

        let mut controller = ConvergenceController::new(StopCriteria {
            max_iterations: config.max_iterations,
            stagnation_limit: config.stagnation_limit,
            target_cost: config.target_cost,
        });
        let mut history = Vec::new();

        while controller.is_running() {
            if cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                controller.cancel();
                break;
            }

            let result = colony.run_iteration(heuristic, controller.best())?;
            if result.successes() == 0 {
                emit(ColonyEvent::Starved {
                    iteration: result.iteration,
                    consecutive: result.consecutive_starved,
                });
            }

            let observation = controller.observe(&result, colony.starvation());
            if observation.improved {
                if let Some(best) = controller.best() {
                    info!(
                        iteration = result.iteration,
                        cost = best.cost(),
                        length = best.len(),
                        "new best path"
                    );
                    emit(ColonyEvent::NewBest {
                        iteration: result.iteration,
                        cost: best.cost(),
                        length: best.len(),
                    });
                }
            }

            let summary = IterationSummary {
                iteration: result.iteration,
                successes: result.successes(),
                failures: result.failures.len(),
                iteration_best_cost: result.best_cost,
                global_best_cost: controller.best_cost(),
                stagnation: controller.stagnation(),
                mean_cost: result.mean_cost(),
            };
            emit(ColonyEvent::IterationComplete {
                summary: summary.clone(),
            });
            history.push(summary);
        }

        let terminal_state = controller.state();
        let iterations = controller.iterations();
        match (terminal_state, controller.failure()) {
            (RunState::Failed, Some(err)) => warn!(iterations, error = %err, "run failed"),
            _ => info!(
                state = %terminal_state,
                iterations,
                best_cost = ?controller.best_cost(),
                "run finished"
            ),
        }
        emit(ColonyEvent::Terminated {
            state: terminal_state,
            iterations,
        });

        let (best_path, failure) = controller.into_parts();
        Ok(SolveResult {
            run_id,
            seed,
            best_cost: best_path.as_ref().map(Path::cost),
            best_path,
            iterations,
            terminal_state,
            failure,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formica_core::error::UnsolvableReason;

    #[test]
    fn corridor_converges_to_its_only_path() {
        let grid = MazeGrid::parse("S.#\n#.#\n#.G").unwrap().grid;
        let config = SolveConfig::default()
            .with_population_size(5)
            .with_stagnation_limit(3)
            .with_seed(1);
        let result = solve(&grid, Cell::new(0, 0), Cell::new(2, 2), &config).unwrap();
        assert_eq!(result.terminal_state, RunState::Converged);
        assert_eq!(result.best_cost, Some(4.0));
        // Found in iteration 1, then three stagnant iterations.
        assert_eq!(result.iterations, 4);
        assert_eq!(result.history.len(), 4);
        assert_eq!(result.seed, 1);
        assert_eq!(result.run_id, RunId::from_seed(1));
    }

    #[test]
    fn start_equal_to_goal_converges_immediately() {
        let grid = MazeGrid::open(2, 2);
        let config = SolveConfig::default().with_seed(4);
        let result = solve(&grid, Cell::new(1, 1), Cell::new(1, 1), &config).unwrap();
        assert_eq!(result.terminal_state, RunState::Converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.best_cost, Some(0.0));
        assert_eq!(result.best_path.unwrap().cells(), &[Cell::new(1, 1)]);
    }

    #[test]
    fn invalid_config_fails_before_graph_checks() {
        let grid = MazeGrid::open(0, 0);
        let config = SolveConfig::default().with_population_size(0);
        let err = solve(&grid, Cell::new(0, 0), Cell::new(0, 0), &config).unwrap_err();
        assert!(matches!(err, FormicaError::Config(_)));
    }

    #[test]
    fn wall_start_is_unsolvable() {
        let grid = MazeGrid::parse("#.G").unwrap().grid;
        let err = solve(&grid, Cell::new(0, 0), Cell::new(0, 2), &SolveConfig::default()).unwrap_err();
        assert_eq!(err, FormicaError::unsolvable(UnsolvableReason::Wall(Cell::new(0, 0))));
    }

    #[test]
    fn starvation_fails_the_run() {
        let grid = MazeGrid::open(1, 6);
        let config = SolveConfig::default()
            .with_max_steps(2)
            .with_starvation_limit(3)
            .with_seed(5);
        let result = solve(&grid, Cell::new(0, 0), Cell::new(0, 5), &config).unwrap();
        assert_eq!(result.terminal_state, RunState::Failed);
        assert_eq!(result.iterations, 4);
        assert!(result.best_path.is_none());
        assert!(!result.is_success());
        let err = result.into_result().unwrap_err();
        assert_eq!(
            err,
            FormicaError::ColonyStarved {
                consecutive: 4,
                iteration: 4
            }
        );
    }

    #[test]
    fn unseeded_runs_report_their_seed() {
        let grid = MazeGrid::open(3, 3);
        let config = SolveConfig::default().with_population_size(4);
        let first = solve(&grid, Cell::new(0, 0), Cell::new(2, 2), &config).unwrap();
        let replay = solve(
            &grid,
            Cell::new(0, 0),
            Cell::new(2, 2),
            &config.clone().with_seed(first.seed),
        )
        .unwrap();
        assert_eq!(first.best_path, replay.best_path);
        assert_eq!(first.iterations, replay.iterations);
    }

    #[test]
    fn custom_heuristic_and_observer() {
        let grid = MazeGrid::open(3, 3);
        let mut events: Vec<ColonyEvent> = Vec::new();
        let result = Solver::new(SolveConfig::default().with_seed(2).with_population_size(8))
            .with_heuristic(|c: Cell, g: Cell| 1.0 / (1.0 + c.chebyshev(&g) as f64))
            .on_event(|e| events.push(e.clone()))
            .solve(&grid, Cell::new(0, 0), Cell::new(2, 2))
            .unwrap();

        let completed = events
            .iter()
            .filter(|e| matches!(e, ColonyEvent::IterationComplete { .. }))
            .count() as u64;
        assert_eq!(completed, result.iterations);
        assert!(events.iter().any(|e| matches!(e, ColonyEvent::NewBest { .. })));
        assert!(matches!(
            events.last(),
            Some(ColonyEvent::Terminated { state, .. }) if *state == result.terminal_state
        ));
    }
}
