//! End-to-end solve scenarios.

use formica_agents::ant::AntParams;
use formica_core::error::{ConfigError, FormicaError, UnsolvableReason};
use formica_core::grid::MazeGrid;
use formica_core::heuristic::HeuristicKind;
use formica_core::maze::MazeGraph;
use formica_core::pheromone::PheromoneField;
use formica_core::types::{Cell, Connectivity, CostModel};
use formica_runtime::baseline::optimal_path;
use formica_runtime::cancel::CancelToken;
use formica_runtime::colony::{Colony, ColonyEvent, UpdateRule};
use formica_runtime::config::SolveConfig;
use formica_runtime::convergence::RunState;
use formica_runtime::deposit::DepositRule;
use formica_runtime::solver::{solve, Solver};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const BRAIDED: &str = "\
S...#....
.##.#.##.
.#.....#.
.#.###.#.
...#.....
##...##.G";

#[test]
fn open_five_by_five_converges_to_manhattan_optimum() {
    init_tracing();
    let grid = MazeGrid::open(5, 5);
    let config = SolveConfig::default().with_seed(2024);
    let result = solve(&grid, Cell::new(0, 0), Cell::new(4, 4), &config).unwrap();

    assert_eq!(result.terminal_state, RunState::Converged);
    assert_eq!(result.best_cost, Some(8.0));
    let path = result.best_path.unwrap();
    assert_eq!(path.first(), Some(Cell::new(0, 0)));
    assert_eq!(path.last(), Some(Cell::new(4, 4)));
    assert!(path.is_cycle_free());
    assert!(result.iterations <= config.max_iterations);
}

#[test]
fn unreachable_goal_is_rejected_before_any_iteration() {
    init_tracing();
    // The corridor through column 2 has been walled off.
    let grid = MazeGrid::parse("S.#..\n..#..\n..#..\n..#..\n..#.G").unwrap().grid;
    let mut iterations = 0;
    let err = Solver::new(SolveConfig::default().with_seed(1))
        .on_event(|e| {
            if matches!(e, ColonyEvent::IterationComplete { .. }) {
                iterations += 1;
            }
        })
        .solve(&grid, Cell::new(0, 0), Cell::new(4, 4))
        .unwrap_err();

    assert!(matches!(
        err,
        FormicaError::UnsolvableMaze(UnsolvableReason::Disconnected { .. })
    ));
    assert_eq!(iterations, 0);
}

#[test]
fn zero_population_or_iterations_is_invalid() {
    let grid = MazeGrid::open(3, 3);
    for config in [
        SolveConfig::default().with_population_size(0),
        SolveConfig::default().with_max_iterations(0),
    ] {
        let err = solve(&grid, Cell::new(0, 0), Cell::new(2, 2), &config).unwrap_err();
        assert!(matches!(err, FormicaError::Config(ConfigError::InvalidValue { .. })));
    }
}

#[test]
fn fixed_seed_is_deterministic() {
    init_tracing();
    let maze = MazeGrid::parse(BRAIDED).unwrap();
    let (start, goal) = (maze.start.unwrap(), maze.goal.unwrap());
    let config = SolveConfig::default().with_seed(77).with_population_size(20);

    let a = solve(&maze.grid, start, goal, &config).unwrap();
    let b = solve(&maze.grid, start, goal, &config).unwrap();
    assert_eq!(a.best_path, b.best_path);
    assert_eq!(a.iterations, b.iterations);
    assert_eq!(a.history, b.history);
    assert_eq!(a.run_id, b.run_id);
}

#[test]
fn sequential_and_parallel_runs_agree() {
    let maze = MazeGrid::parse(BRAIDED).unwrap();
    let (start, goal) = (maze.start.unwrap(), maze.goal.unwrap());
    let config = SolveConfig::default().with_seed(5).with_population_size(24);

    let parallel = solve(&maze.grid, start, goal, &config.clone().with_parallel(true)).unwrap();
    let sequential = solve(&maze.grid, start, goal, &config.with_parallel(false)).unwrap();
    assert_eq!(parallel.best_path, sequential.best_path);
    assert_eq!(parallel.iterations, sequential.iterations);
}

#[test]
fn braided_maze_finds_a_valid_path() {
    init_tracing();
    let maze = MazeGrid::parse(BRAIDED).unwrap();
    let (start, goal) = (maze.start.unwrap(), maze.goal.unwrap());
    let config = SolveConfig::default()
        .with_seed(9)
        .with_max_iterations(400)
        .with_stagnation_limit(40);
    let result = solve(&maze.grid, start, goal, &config).unwrap();
    assert_ne!(result.terminal_state, RunState::Failed);

    let path = result.best_path.unwrap();
    assert!(path.is_cycle_free());
    for cell in path.cells() {
        assert!(maze.grid.is_passable(cell), "{cell} is a wall");
    }
    let graph = MazeGraph::build(&maze.grid, start, goal, Connectivity::Four).unwrap();
    assert_eq!(graph.path_cost(path.cells(), CostModel::Steps), Some(path.cost()));
    let optimum = optimal_path(&graph, CostModel::Steps).unwrap();
    assert!(path.cost() >= optimum.cost());
}

#[test]
fn eight_connected_weighted_run() {
    let grid = MazeGrid::open(4, 4);
    let config = SolveConfig::default()
        .with_seed(13)
        .with_connectivity(Connectivity::Eight)
        .with_heuristic(HeuristicKind::InverseChebyshev)
        .with_cost(CostModel::Weighted);
    let result = solve(&grid, Cell::new(0, 0), Cell::new(3, 3), &config).unwrap();
    let best = result.best_cost.unwrap();
    assert!((best - 3.0 * std::f64::consts::SQRT_2).abs() < 1e-9);
}

#[test]
fn elitist_best_n_and_backtracking_options_solve() {
    let maze = MazeGrid::parse(BRAIDED).unwrap();
    let (start, goal) = (maze.start.unwrap(), maze.goal.unwrap());
    let config = SolveConfig::default()
        .with_seed(31)
        .with_elitist(2.0)
        .with_deposit(DepositRule::BestN { n: 5 })
        .with_backtracking(true);
    let result = solve(&maze.grid, start, goal, &config).unwrap();
    assert!(result.is_success());
    assert!(result.best_path.unwrap().is_cycle_free());
}

#[test]
fn target_cost_stops_the_run() {
    let grid = MazeGrid::open(6, 6);
    let config = SolveConfig::default().with_seed(4).with_target_cost(10.0);
    let result = solve(&grid, Cell::new(0, 0), Cell::new(5, 5), &config).unwrap();
    assert_eq!(result.terminal_state, RunState::Converged);
    assert_eq!(result.best_cost, Some(10.0));
    assert_eq!(result.history.last().and_then(|s| s.global_best_cost), Some(10.0));
}

#[test]
fn cancelled_before_start_runs_nothing() {
    let token = CancelToken::new();
    token.cancel();
    let result = Solver::new(SolveConfig::default().with_seed(1))
        .with_cancel(token)
        .solve(&MazeGrid::open(3, 3), Cell::new(0, 0), Cell::new(2, 2))
        .unwrap();
    assert_eq!(result.terminal_state, RunState::Cancelled);
    assert_eq!(result.iterations, 0);
    assert!(result.best_path.is_none());
}

#[test]
fn cancellation_keeps_best_so_far() {
    let token = CancelToken::new();
    let trigger = token.clone();
    let result = Solver::new(
        SolveConfig::default()
            .with_seed(6)
            .with_stagnation_limit(1_000)
            .with_max_iterations(1_000),
    )
    .with_cancel(token)
    .on_event(move |e| {
        if let ColonyEvent::IterationComplete { summary } = e {
            if summary.iteration == 3 {
                trigger.cancel();
            }
        }
    })
    .solve(&MazeGrid::open(5, 5), Cell::new(0, 0), Cell::new(4, 4))
    .unwrap();

    assert_eq!(result.terminal_state, RunState::Cancelled);
    assert_eq!(result.iterations, 3);
    assert!(result.best_path.is_some());
    assert!(result.into_result().is_ok());
}

#[test]
fn intensity_never_drops_below_floor() {
    let maze = MazeGrid::parse(BRAIDED).unwrap();
    let graph = MazeGraph::build(
        &maze.grid,
        maze.start.unwrap(),
        maze.goal.unwrap(),
        Connectivity::Four,
    )
    .unwrap();
    let tau_min = 0.05;
    let field = PheromoneField::initialize(&graph, 1.0, tau_min).unwrap();
    let update = UpdateRule {
        rho: 0.9,
        q: 1.0,
        deposit: DepositRule::AllAnts,
        elitist: None,
    };
    let params = AntParams {
        max_steps: 4 * graph.node_count(),
        ..AntParams::default()
    };
    let mut colony = Colony::new(&graph, field, 10, params, update, 12).unwrap();

    for _ in 0..60 {
        colony.run_iteration(&HeuristicKind::InverseManhattan, None).unwrap();
        assert!(colony.field().min() >= tau_min);
    }
    assert_eq!(colony.field().evaporations(), 60);
}

#[test]
fn graph_construction_is_idempotent() {
    let maze = MazeGrid::parse(BRAIDED).unwrap();
    let build = || {
        MazeGraph::build(
            &maze.grid,
            maze.start.unwrap(),
            maze.goal.unwrap(),
            Connectivity::Eight,
        )
        .unwrap()
    };
    assert_eq!(build().adjacency_sets(), build().adjacency_sets());
}

#[test]
fn config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("formica.toml");
    std::fs::write(
        &path,
        "population_size = 30\nbeta = 4.0\nstagnation_limit = 10\nseed = 21\n",
    )
    .unwrap();

    let config = SolveConfig::from_toml_file(&path).unwrap();
    assert_eq!(config.population_size, 30);
    assert_eq!(config.beta, 4.0);
    assert_eq!(config.seed, Some(21));

    let result = solve(&MazeGrid::open(4, 4), Cell::new(0, 0), Cell::new(3, 3), &config).unwrap();
    assert_eq!(result.seed, 21);
    assert_eq!(result.best_cost, Some(6.0));

    let missing = SolveConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(missing, FormicaError::Io(_)));
}

#[test]
fn inverse_distance_heuristic_finds_adjacent_goal() {
    let result = Solver::new(SolveConfig::default().with_seed(3))
        .with_heuristic(|c: Cell, g: Cell| 1.0 / c.manhattan(&g) as f64)
        .solve(&MazeGrid::open(2, 2), Cell::new(0, 0), Cell::new(0, 1))
        .unwrap();
    assert_eq!(result.terminal_state, RunState::Converged);
    assert_eq!(result.best_cost, Some(1.0));
    assert_eq!(
        result.best_path.unwrap().cells(),
        &[Cell::new(0, 0), Cell::new(0, 1)][..]
    );
}
