//! JSON export for visualization and reporting tools.
//!
//! Nothing here touches the filesystem; callers decide where the text goes.

use crate::colony::IterationSummary;
use crate::solver::SolveResult;
use formica_core::error::Result;
use formica_core::pheromone::PheromoneField;
use formica_core::types::Cell;
use serde::Serialize;

/// Serializable view of a [`SolveResult`].
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub run_id: String,
    pub seed: u64,
    pub terminal_state: String,
    pub iterations: u64,
    pub best_cost: Option<f64>,
    pub best_path: Option<&'a [Cell]>,
    pub failure: Option<String>,
}

impl<'a> RunReport<'a> {
    pub fn from_result(result: &'a SolveResult) -> Self {
        Self {
            run_id: result.run_id.to_string(),
            seed: result.seed,
            terminal_state: result.terminal_state.to_string(),
            iterations: result.iterations,
            best_cost: result.best_cost,
            best_path: result.best_path.as_ref().map(|p| p.cells()),
            failure: result.failure.as_ref().map(ToString::to_string),
        }
    }
}

/// One JSON object per iteration, newline separated.
pub fn history_to_jsonl(history: &[IterationSummary]) -> Result<String> {
    let mut out = String::new();
    for summary in history {
        out.push_str(&serde_json::to_string(summary)?);
        out.push('\n');
    }
    Ok(out)
}

/// The field's edges as a JSON array, strongest first.
pub fn field_snapshot(field: &PheromoneField) -> Result<String> {
    Ok(serde_json::to_string(&field.snapshot())?)
}

/// A run summary as pretty-printed JSON.
pub fn report_json(result: &SolveResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(&RunReport::from_result(result))?)
}
