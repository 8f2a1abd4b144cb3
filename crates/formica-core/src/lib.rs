//! # Formica Core
//!
//! Shared structure for ant colony search over mazes:
//!
//! - **MazeGrid**: the pass/wall layout produced by a maze generator
//! - **MazeGraph**: immutable adjacency of passable cells, validated solvable
//! - **PheromoneField**: per-edge intensities with evaporation and a floor
//! - **Heuristic**: desirability of a cell on the way to the goal
//! - **RandomSource**: the single seam through which randomness enters
//!
//! ## Quick Start
//!
//! ```rust
//! use formica_core::prelude::*;
//!
//! let grid = MazeGrid::open(5, 5);
//! let graph = MazeGraph::build(&grid, Cell::new(0, 0), Cell::new(4, 4), Connectivity::Four).unwrap();
//! let field = PheromoneField::initialize(&graph, 1.0, 1e-4).unwrap();
//!
//! assert_eq!(graph.node_count(), 25);
//! assert_eq!(field.intensity(&Cell::new(0, 0), &Cell::new(0, 1)), Some(1.0));
//! ```

pub mod types;
pub mod error;
pub mod grid;
pub mod maze;
pub mod pheromone;
pub mod heuristic;
pub mod random;
pub mod prelude;
