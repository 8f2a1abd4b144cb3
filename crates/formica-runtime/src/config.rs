//! Solve configuration.
//!
//! Every option has a default, so a TOML file only needs the keys it wants
//! to change:
//!
//! ```toml
//! population_size = 80
//! beta = 4.0
//! connectivity = "Eight"
//! heuristic = "InverseChebyshev"
//! ```
//!
//! [`SolveConfig::validate`] runs at `solve` entry and rejects the first
//! invalid option before any ant is spawned.

use crate::deposit::DepositRule;
use formica_agents::ant::AntParams;
use formica_core::error::{ConfigError, FormicaError, Result};
use formica_core::heuristic::HeuristicKind;
use formica_core::types::{Connectivity, CostModel};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options recognized by [`solve`](crate::solver::solve).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveConfig {
    /// Ants per iteration.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Pheromone trust exponent.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Heuristic trust exponent.
    #[serde(default = "default_beta")]
    pub beta: f64,
    /// Evaporation rate in `[0, 1)`.
    #[serde(default = "default_rho")]
    pub rho: f64,
    /// Deposit scale; a path of cost `c` deposits `q / c` per edge.
    #[serde(default = "default_q")]
    pub q: f64,
    /// Initial intensity of every edge.
    #[serde(default = "default_tau0")]
    pub tau0: f64,
    /// Intensity floor.
    #[serde(default = "default_tau_min")]
    pub tau_min: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u64,
    /// Iterations without improvement before the run is declared converged.
    #[serde(default = "default_stagnation_limit")]
    pub stagnation_limit: u64,
    /// Consecutive iterations without any successful ant that are tolerated;
    /// one more fails the run.
    #[serde(default = "default_starvation_limit")]
    pub starvation_limit: u64,
    /// Step budget per ant. Defaults to four times the passable cell count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
    /// Give the best-known path an extra deposit every iteration.
    #[serde(default)]
    pub elitist: bool,
    /// Scale of the elitist deposit relative to a normal one.
    #[serde(default = "default_elitist_weight")]
    pub elitist_weight: f64,
    #[serde(default)]
    pub connectivity: Connectivity,
    #[serde(default)]
    pub heuristic: HeuristicKind,
    #[serde(default)]
    pub deposit: DepositRule,
    #[serde(default)]
    pub cost: CostModel,
    /// Let ants retreat from dead ends instead of failing.
    #[serde(default)]
    pub backtracking: bool,
    /// Stop as soon as a path this cheap is found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_cost: Option<f64>,
    /// Fix the random seed for a reproducible run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Construct paths on the rayon pool (needs the `parallel` feature).
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

// Default value functions
fn default_population_size() -> usize { 50 }
fn default_alpha() -> f64 { 1.0 }
fn default_beta() -> f64 { 3.0 }
fn default_rho() -> f64 { 0.2 }
fn default_q() -> f64 { 1.0 }
fn default_tau0() -> f64 { 1.0 }
fn default_tau_min() -> f64 { 1e-4 }
fn default_max_iterations() -> u64 { 200 }
fn default_stagnation_limit() -> u64 { 25 }
fn default_starvation_limit() -> u64 { 50 }
fn default_elitist_weight() -> f64 { 1.0 }
fn default_parallel() -> bool { true }

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            alpha: default_alpha(),
            beta: default_beta(),
            rho: default_rho(),
            q: default_q(),
            tau0: default_tau0(),
            tau_min: default_tau_min(),
            max_iterations: default_max_iterations(),
            stagnation_limit: default_stagnation_limit(),
            starvation_limit: default_starvation_limit(),
            max_steps: None,
            elitist: false,
            elitist_weight: default_elitist_weight(),
            connectivity: Connectivity::default(),
            heuristic: HeuristicKind::default(),
            deposit: DepositRule::default(),
            cost: CostModel::default(),
            backtracking: false,
            target_cost: None,
            seed: None,
            parallel: default_parallel(),
        }
    }
}

impl SolveConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_exponents(mut self, alpha: f64, beta: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    pub fn with_pheromone_bounds(mut self, tau0: f64, tau_min: f64) -> Self {
        self.tau0 = tau0;
        self.tau_min = tau_min;
        self
    }

    pub fn with_max_iterations(mut self, n: u64) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_stagnation_limit(mut self, n: u64) -> Self {
        self.stagnation_limit = n;
        self
    }

    pub fn with_starvation_limit(mut self, n: u64) -> Self {
        self.starvation_limit = n;
        self
    }

    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Enable elitist reinforcement with the given weight.
    pub fn with_elitist(mut self, weight: f64) -> Self {
        self.elitist = true;
        self.elitist_weight = weight;
        self
    }

    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn with_heuristic(mut self, heuristic: HeuristicKind) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_deposit(mut self, rule: DepositRule) -> Self {
        self.deposit = rule;
        self
    }

    pub fn with_cost(mut self, cost: CostModel) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_backtracking(mut self, enabled: bool) -> Self {
        self.backtracking = enabled;
        self
    }

    pub fn with_target_cost(mut self, cost: f64) -> Self {
        self.target_cost = Some(cost);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check every option, returning the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(FormicaError::invalid_config(
                "population_size",
                "0",
                "at least one ant is required",
            ));
        }
        if u32::try_from(self.population_size).is_err() {
            return Err(FormicaError::out_of_range(
                "population_size",
                1.0,
                f64::from(u32::MAX),
                self.population_size as f64,
            ));
        }
        for (field, value) in [
            ("max_iterations", self.max_iterations),
            ("stagnation_limit", self.stagnation_limit),
            ("starvation_limit", self.starvation_limit),
        ] {
            if value == 0 {
                return Err(FormicaError::invalid_config(field, "0", "must be at least 1"));
            }
        }
        for (field, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(FormicaError::invalid_config(
                    field,
                    value.to_string(),
                    "must be finite and non-negative",
                ));
            }
        }
        if !(0.0..1.0).contains(&self.rho) {
            return Err(FormicaError::out_of_range("rho", 0.0, 1.0, self.rho));
        }
        for (field, value) in [("q", self.q), ("tau0", self.tau0)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FormicaError::invalid_config(
                    field,
                    value.to_string(),
                    "must be positive and finite",
                ));
            }
        }
        if !(self.tau_min > 0.0 && self.tau_min <= self.tau0) {
            return Err(FormicaError::out_of_range("tau_min", 0.0, self.tau0, self.tau_min));
        }
        if self.max_steps == Some(0) {
            return Err(FormicaError::invalid_config("max_steps", "0", "must be at least 1"));
        }
        if !(self.elitist_weight.is_finite() && self.elitist_weight >= 0.0) {
            return Err(FormicaError::invalid_config(
                "elitist_weight",
                self.elitist_weight.to_string(),
                "must be finite and non-negative",
            ));
        }
        self.deposit.validate()?;
        if let Some(target) = self.target_cost {
            if !(target > 0.0) {
                return Err(FormicaError::invalid_config(
                    "target_cost",
                    target.to_string(),
                    "must be positive",
                ));
            }
        }
        Ok(())
    }

    /// Per-ant parameters for a maze with `passable` open cells.
    pub fn ant_params(&self, passable: usize) -> AntParams {
        AntParams {
            alpha: self.alpha,
            beta: self.beta,
            max_steps: self.max_steps.unwrap_or(4 * passable).max(1),
            backtracking: self.backtracking,
            cost: self.cost,
        }
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FormicaError::Config(ConfigError::Parse(e.to_string())))
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FormicaError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SolveConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population_size, 50);
        assert_eq!(config.beta, 3.0);
        assert_eq!(config.connectivity, Connectivity::Four);
        assert!(!config.elitist);
    }

    #[test]
    fn rejects_empty_population_and_zero_iterations() {
        let err = SolveConfig::default().with_population_size(0).validate().unwrap_err();
        assert!(matches!(err, FormicaError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "population_size"));

        let err = SolveConfig::default().with_max_iterations(0).validate().unwrap_err();
        assert!(matches!(err, FormicaError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "max_iterations"));
    }

    #[test]
    fn rejects_bad_rates_and_bounds() {
        let base = SolveConfig::default();
        assert!(base.clone().with_rho(-0.1).validate().is_err());
        assert!(base.clone().with_rho(1.0).validate().is_err());
        assert!(base.clone().with_rho(0.0).validate().is_ok());
        assert!(base.clone().with_pheromone_bounds(0.0, 1e-4).validate().is_err());
        assert!(base.clone().with_pheromone_bounds(1.0, 2.0).validate().is_err());
        assert!(base.clone().with_pheromone_bounds(1.0, 0.0).validate().is_err());
        assert!(base.clone().with_q(0.0).validate().is_err());
        assert!(base.clone().with_exponents(-1.0, 2.0).validate().is_err());
        assert!(base.clone().with_exponents(1.0, f64::NAN).validate().is_err());
        assert!(base.clone().with_max_steps(0).validate().is_err());
        assert!(base.clone().with_target_cost(0.0).validate().is_err());
        assert!(base.clone().with_elitist(-1.0).validate().is_err());
        assert!(base.with_deposit(DepositRule::BestN { n: 0 }).validate().is_err());
    }

    #[test]
    fn step_budget_defaults_to_four_per_cell() {
        let config = SolveConfig::default();
        assert_eq!(config.ant_params(25).max_steps, 100);
        assert_eq!(config.with_max_steps(7).ant_params(25).max_steps, 7);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SolveConfig::from_toml_str(
            r#"
            population_size = 12
            rho = 0.5
            connectivity = "Eight"
            heuristic = "InverseChebyshev"
            deposit = { BestN = { n = 3 } }
            seed = 9
            "#,
        )
        .unwrap();
        assert_eq!(config.population_size, 12);
        assert_eq!(config.rho, 0.5);
        assert_eq!(config.connectivity, Connectivity::Eight);
        assert_eq!(config.heuristic, HeuristicKind::InverseChebyshev);
        assert_eq!(config.deposit, DepositRule::BestN { n: 3 });
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.alpha, 1.0);
        assert_eq!(config.max_iterations, 200);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SolveConfig::from_toml_str("population_size = \"many\"").unwrap_err();
        assert!(matches!(err, FormicaError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn toml_round_trip_preserves_changes() {
        let config = SolveConfig::default()
            .with_population_size(7)
            .with_seed(3)
            .with_backtracking(true);
        let text = config.to_toml_string().unwrap();
        assert_eq!(SolveConfig::from_toml_str(&text).unwrap(), config);
    }
}
