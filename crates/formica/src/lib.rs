//! # Formica
//!
//! Ant colony optimization for maze pathfinding.
//!
//! A colony of simulated ants repeatedly walks from a start cell to a goal
//! cell. Each ant picks its next step at random, weighted by the pheromone
//! left on that edge and by a distance heuristic. Successful paths deposit
//! pheromone in proportion to how short they are, and the whole field
//! evaporates every iteration, so the colony's shared memory drifts toward
//! short routes.
//!
//! ## Quick Start
//!
//! ```rust
//! use formica::prelude::*;
//!
//! let maze = MazeGrid::parse(
//!     "S...#....\n\
//!      .##.#.##.\n\
//!      .#.....#.\n\
//!      .#.###.#.\n\
//!      ...#.....\n\
//!      ###...##.G",
//! )
//! .unwrap();
//!
//! let config = SolveConfig::default().with_seed(42);
//! let result = solve(
//!     &maze.grid,
//!     maze.start.unwrap(),
//!     maze.goal.unwrap(),
//!     &config,
//! )
//! .unwrap();
//!
//! assert!(result.is_success());
//! println!("{} after {} iterations", result.terminal_state, result.iterations);
//! if let Some(path) = &result.best_path {
//!     println!("{}", maze.grid.render_path(path));
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`formica_core`] - cells, maze grid and graph, pheromone field, heuristics, errors
//! - [`formica_agents`] - the ant and its weighted move selection
//! - [`formica_runtime`] - colony scheduler, convergence control, `solve`, reporting
//!
//! ## Run lifecycle
//!
//! | State | Meaning |
//! |-------|---------|
//! | RUNNING | iterations continue |
//! | CONVERGED | the best path stopped improving, or met `target_cost` |
//! | EXHAUSTED | `max_iterations` reached first |
//! | FAILED | more than `starvation_limit` iterations in a row without a successful ant |
//! | CANCELLED | a [`CancelToken`](formica_runtime::cancel::CancelToken) fired |

// Re-export all subcrates
pub use formica_core as core;
pub use formica_agents as agents;
pub use formica_runtime as runtime;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
///
/// ```rust
/// use formica::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use formica_core::types::{AntId, Cell, Connectivity, CostModel, Iteration, Path, RunId};
    pub use formica_core::grid::{MazeGrid, ParsedMaze};
    pub use formica_core::maze::MazeGraph;
    pub use formica_core::pheromone::{EdgeIntensity, PheromoneField};
    pub use formica_core::heuristic::{Heuristic, HeuristicKind};

    // Error types
    pub use formica_core::error::{ConfigError, FormicaError, NoPathReason, Result, UnsolvableReason};

    // Agents
    pub use formica_agents::ant::{Ant, AntParams};

    // Runtime
    pub use formica_runtime::cancel::CancelToken;
    pub use formica_runtime::colony::{Colony, ColonyEvent, IterationSummary};
    pub use formica_runtime::config::SolveConfig;
    pub use formica_runtime::convergence::RunState;
    pub use formica_runtime::deposit::DepositRule;
    pub use formica_runtime::solver::{solve, SolveResult, Solver};

    // Reporting
    pub use formica_runtime::baseline::{compare, optimal_path, OptimalityReport};
    pub use formica_runtime::export::{field_snapshot, history_to_jsonl, report_json};
    pub use formica_runtime::metrics::RunMetrics;
}
