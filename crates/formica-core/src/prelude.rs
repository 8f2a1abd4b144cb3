//! Formica Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use formica_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{AntId, Cell, Connectivity, CostModel, Iteration, Path, RunId};

// Maze structure
pub use crate::grid::{MazeGrid, ParsedMaze};
pub use crate::maze::{Adjacent, MazeGraph};

// Shared pheromone memory
pub use crate::pheromone::{EdgeIntensity, PheromoneField};

// Steering
pub use crate::heuristic::{Heuristic, HeuristicKind};
pub use crate::random::RandomSource;

// Re-export error types
pub use crate::error::{ConfigError, FormicaError, NoPathReason, Result, UnsolvableReason};
