//! Error types for Formica operations.
//!
//! Three kinds of failure matter to a caller:
//! - structural: the maze has no route at all ([`FormicaError::UnsolvableMaze`])
//! - per-agent: one ant failed to reach the goal ([`FormicaError::NoPathFound`]),
//!   which the colony absorbs as a zero-contribution walk
//! - systemic: the whole colony keeps failing ([`FormicaError::ColonyStarved`])
//!
//! Invalid configuration is rejected before any iteration runs.

use crate::types::{Cell, Iteration};
use thiserror::Error;

/// Result type for Formica operations.
pub type Result<T> = std::result::Result<T, FormicaError>;

/// Errors that can occur while building a maze graph or running a colony.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormicaError {
    /// No route exists between start and goal.
    #[error("Unsolvable maze: {0}")]
    UnsolvableMaze(UnsolvableReason),
    /// A single ant failed to construct a path.
    #[error("No path found: {0}")]
    NoPathFound(NoPathReason),
    /// Too many consecutive iterations without a single successful ant.
    #[error("Colony starved: {consecutive} consecutive iterations without a path (at iteration {iteration})")]
    ColonyStarved {
        consecutive: u64,
        iteration: Iteration,
    },
    /// Configuration errors.
    #[error("Config error: {0}")]
    Config(ConfigError),
    /// A textual maze layout could not be read.
    #[error("Invalid maze layout: {0}")]
    InvalidGrid(String),
    /// A pheromone operation referenced a transition that is not an edge.
    #[error("Edge not found: {from} -> {to}")]
    EdgeNotFound { from: Cell, to: Cell },
    /// A deposit amount was negative or not finite.
    #[error("Invalid deposit amount: {amount}")]
    InvalidDeposit { amount: f64 },
    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(String),
    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for FormicaError {
    fn from(e: std::io::Error) -> Self {
        FormicaError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for FormicaError {
    fn from(e: serde_json::Error) -> Self {
        FormicaError::Serialization(e.to_string())
    }
}

impl From<ConfigError> for FormicaError {
    fn from(e: ConfigError) -> Self {
        FormicaError::Config(e)
    }
}

/// Why a maze was rejected at graph construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsolvableReason {
    /// The grid has no rows or no columns.
    #[error("grid is empty")]
    EmptyGrid,
    /// Start or goal lies outside the grid.
    #[error("cell {0} is outside the grid")]
    OutOfBounds(Cell),
    /// Start or goal is a wall.
    #[error("cell {0} is a wall")]
    Wall(Cell),
    /// Start and goal are in different connected regions.
    #[error("goal {goal} is not reachable from start {start}")]
    Disconnected { start: Cell, goal: Cell },
}

/// Why a single ant gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NoPathReason {
    /// The walk used its whole step budget.
    #[error("step limit of {steps} reached")]
    StepLimit { steps: usize },
    /// No unvisited neighbor was left.
    #[error("dead end at {at} after {steps} steps")]
    DeadEnd { at: Cell, steps: usize },
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid value.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    /// Out of range.
    #[error("{field} out of range: {value} (must be {min}-{max})")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
    /// The configuration source could not be parsed.
    #[error("Parse failed: {0}")]
    Parse(String),
}

// Convenience constructors
impl FormicaError {
    pub fn unsolvable(reason: UnsolvableReason) -> Self {
        FormicaError::UnsolvableMaze(reason)
    }

    pub fn no_path(reason: NoPathReason) -> Self {
        FormicaError::NoPathFound(reason)
    }

    pub fn invalid_config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FormicaError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        FormicaError::Config(ConfigError::OutOfRange {
            field: field.into(),
            min,
            max,
            value,
        })
    }

    /// Whether this error aborts a run (as opposed to a single ant).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, FormicaError::NoPathFound(_))
    }
}
