//! Deposit rules: which of an iteration's paths reinforce the field.
//!
//! Every depositing path adds `q / cost` to each of its edges. Shorter
//! paths therefore deposit more per edge and are reinforced faster.

use formica_core::error::{FormicaError, Result};
use formica_core::pheromone::PheromoneField;
use formica_core::types::{AntId, Path};
use serde::{Deserialize, Serialize};

/// Selects the depositing paths of one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DepositRule {
    /// Every successful ant deposits.
    #[default]
    AllAnts,
    /// Only the `n` cheapest paths deposit; ties go to the lower ant index.
    BestN { n: usize },
}

impl DepositRule {
    pub fn validate(&self) -> Result<()> {
        match self {
            DepositRule::BestN { n: 0 } => Err(FormicaError::invalid_config(
                "deposit",
                "BestN { n: 0 }",
                "at least one path must deposit",
            )),
            _ => Ok(()),
        }
    }

    /// Indices into `paths` that deposit, in deposit order.
    ///
    /// `paths` must be in ant order.
    pub fn depositors(&self, paths: &[(AntId, Path)]) -> Vec<usize> {
        match *self {
            DepositRule::AllAnts => (0..paths.len()).collect(),
            DepositRule::BestN { n } => {
                let mut order: Vec<usize> = (0..paths.len()).collect();
                // Stable sort keeps ant order among equal costs.
                order.sort_by(|&a, &b| paths[a].1.cost().total_cmp(&paths[b].1.cost()));
                order.truncate(n);
                order
            }
        }
    }
}

/// Amount each edge of `path` receives, or `None` when the path has no
/// edges to reinforce.
pub fn deposit_amount(path: &Path, q: f64) -> Option<f64> {
    if path.is_empty() || path.cost() <= 0.0 {
        None
    } else {
        Some(q / path.cost())
    }
}

/// Apply `rule` to one iteration's successful paths. Returns how many paths
/// deposited.
pub fn apply(
    field: &mut PheromoneField,
    rule: DepositRule,
    paths: &[(AntId, Path)],
    q: f64,
) -> Result<usize> {
    let mut deposited = 0;
    for idx in rule.depositors(paths) {
        let path = &paths[idx].1;
        if let Some(amount) = deposit_amount(path, q) {
            field.deposit_path(path, amount)?;
            deposited += 1;
        }
    }
    Ok(deposited)
}

/// Elitist bonus: `weight * q / cost` on every edge of the best-known path.
pub fn reinforce_best(field: &mut PheromoneField, best: &Path, q: f64, weight: f64) -> Result<()> {
    match deposit_amount(best, q) {
        Some(amount) if weight > 0.0 => field.deposit_path(best, weight * amount),
        _ => Ok(()),
    }
}
