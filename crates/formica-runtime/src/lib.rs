//! # Formica Runtime
//!
//! Colony scheduling, convergence control, and the `solve` entry point.
//!
//! A run builds the maze graph once, initializes the pheromone field
//! uniformly, and then repeats colony iterations (ants walk, the field
//! evaporates, successful paths deposit) until the convergence controller
//! reaches a terminal state.

pub mod baseline;
pub mod cancel;
pub mod colony;
pub mod config;
pub mod convergence;
pub mod deposit;
pub mod export;
pub mod metrics;
pub mod solver;
pub mod prelude;
