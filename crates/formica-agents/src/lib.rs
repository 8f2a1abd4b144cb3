//! # Formica Agents
//!
//! The ant: a stochastic walker that builds one start-to-goal path per
//! iteration by reading a frozen [`PheromoneField`](formica_core::pheromone::PheromoneField).
//!
//! - **selection**: `tau^alpha * eta^beta` scoring and roulette-wheel draws
//! - **ant**: cycle-free path construction with step limits and optional backtracking

pub mod ant;
pub mod selection;
pub mod prelude;
