//! Formica Runtime Prelude: convenient imports for common usage.
//!
//! ```rust
//! use formica_runtime::prelude::*;
//! ```

// Re-export the scheduler and its records
pub use crate::colony::{Colony, ColonyEvent, IterationResult, IterationSummary, UpdateRule};
pub use crate::convergence::{ConvergenceController, Observation, RunState, StopCriteria};
pub use crate::deposit::DepositRule;

// Re-export the entry point
pub use crate::cancel::CancelToken;
pub use crate::config::SolveConfig;
pub use crate::solver::{solve, SolveResult, Solver};

// Re-export reporting
pub use crate::baseline::{compare, optimal_path, OptimalityReport};
pub use crate::export::{field_snapshot, history_to_jsonl, report_json, RunReport};
pub use crate::metrics::RunMetrics;

// Re-export from agents
pub use formica_agents::prelude::*;
