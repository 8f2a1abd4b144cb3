//! Pheromone field: the colony's shared memory.
//!
//! Every directed transition of the maze graph carries an intensity that
//! starts at `tau0`. Between iterations the colony evaporates the whole
//! field and then deposits on the edges of successful paths. Intensities
//! never fall below `tau_min`, so no transition ever becomes permanently
//! unreachable.
//!
//! During an iteration the field is only ever borrowed immutably; ants see
//! the same frozen values and cannot observe each other's deposits.

use crate::error::{FormicaError, Result};
use crate::maze::MazeGraph;
use crate::types::{Cell, Path};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Intensity of one directed edge, for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeIntensity {
    pub from: Cell,
    pub to: Cell,
    pub intensity: f64,
}

/// Per-edge pheromone intensities over a [`MazeGraph`].
#[derive(Debug, Clone)]
pub struct PheromoneField {
    tau0: f64,
    tau_min: f64,
    /// Map from a cell to its dense node index.
    node_index: HashMap<Cell, usize>,
    /// Cells by dense node index.
    cells: Vec<Cell>,
    /// `edges[node][slot]` mirrors `graph.adjacent(node)[slot]`.
    edges: Vec<Vec<(Cell, f64)>>,
    evaporations: u64,
}

impl PheromoneField {
    /// Set every directed edge of `graph` to `tau0`.
    pub fn initialize(graph: &MazeGraph, tau0: f64, tau_min: f64) -> Result<Self> {
        if !(tau0.is_finite() && tau0 > 0.0) {
            return Err(FormicaError::invalid_config(
                "tau0",
                tau0.to_string(),
                "must be positive and finite",
            ));
        }
        if !(tau_min.is_finite() && tau_min > 0.0 && tau_min <= tau0) {
            return Err(FormicaError::out_of_range("tau_min", f64::MIN_POSITIVE, tau0, tau_min));
        }

        let cells: Vec<Cell> = (0..graph.node_count()).map(|n| graph.cell_of(n)).collect();
        let node_index = cells.iter().enumerate().map(|(n, c)| (*c, n)).collect();
        let edges = (0..graph.node_count())
            .map(|node| {
                graph
                    .adjacent(node)
                    .iter()
                    .map(|a| (a.cell, tau0))
                    .collect()
            })
            .collect();

        Ok(Self {
            tau0,
            tau_min,
            node_index,
            cells,
            edges,
            evaporations: 0,
        })
    }

    pub fn tau0(&self) -> f64 {
        self.tau0
    }

    pub fn tau_min(&self) -> f64 {
        self.tau_min
    }

    /// How many times [`evaporate`](Self::evaporate) has run.
    pub fn evaporations(&self) -> u64 {
        self.evaporations
    }

    /// Intensity of `from -> to`, or `None` if that is not an edge.
    pub fn intensity(&self, from: &Cell, to: &Cell) -> Option<f64> {
        let node = *self.node_index.get(from)?;
        self.edges[node]
            .iter()
            .find(|(cell, _)| cell == to)
            .map(|(_, tau)| *tau)
    }

    /// Intensity by dense node index and neighbor slot, as laid out by
    /// [`MazeGraph::adjacent`].
    pub fn intensity_at(&self, node: usize, slot: usize) -> f64 {
        self.edges[node][slot].1
    }

    /// Multiply every intensity by `1 - rho`, clamping at `tau_min`.
    pub fn evaporate(&mut self, rho: f64) -> Result<()> {
        if !(0.0..1.0).contains(&rho) {
            return Err(FormicaError::out_of_range("rho", 0.0, 1.0, rho));
        }
        let keep = 1.0 - rho;
        let floor = self.tau_min;
        for slots in &mut self.edges {
            for (_, tau) in slots.iter_mut() {
                *tau = (*tau * keep).max(floor);
            }
        }
        self.evaporations += 1;
        Ok(())
    }

    /// Add `amount` to the intensity of `from -> to`.
    pub fn deposit(&mut self, from: &Cell, to: &Cell, amount: f64) -> Result<()> {
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(FormicaError::InvalidDeposit { amount });
        }
        let slot = self
            .node_index
            .get(from)
            .and_then(|&node| {
                self.edges[node]
                    .iter_mut()
                    .find(|(cell, _)| cell == to)
                    .map(|(_, tau)| tau)
            })
            .ok_or(FormicaError::EdgeNotFound { from: *from, to: *to })?;
        *slot += amount;
        Ok(())
    }

    /// Deposit `amount` on every edge of `path`.
    pub fn deposit_path(&mut self, path: &Path, amount: f64) -> Result<()> {
        for (from, to) in path.edges() {
            self.deposit(&from, &to, amount)?;
        }
        Ok(())
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Sum of all intensities.
    pub fn total(&self) -> f64 {
        self.values().sum()
    }

    pub fn min(&self) -> f64 {
        self.values().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values().fold(0.0, f64::max)
    }

    /// Fraction of the field's total intensity lying on `path`'s edges.
    ///
    /// Rises toward 1.0 as the colony concentrates on a single route.
    pub fn path_share(&self, path: &Path) -> f64 {
        let total = self.total();
        if total <= 0.0 {
            return 0.0;
        }
        let on_path: f64 = path
            .edges()
            .filter_map(|(from, to)| self.intensity(&from, &to))
            .sum();
        on_path / total
    }

    /// All directed edges with their intensity, sorted strongest first.
    pub fn snapshot(&self) -> Vec<EdgeIntensity> {
        let mut out: Vec<EdgeIntensity> = self
            .edges
            .iter()
            .enumerate()
            .flat_map(|(node, slots)| {
                let from = self.cells[node];
                slots.iter().map(move |(to, tau)| EdgeIntensity {
                    from,
                    to: *to,
                    intensity: *tau,
                })
            })
            .collect();
        out.sort_by(|a, b| {
            b.intensity
                .partial_cmp(&a.intensity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (a.from, a.to).cmp(&(b.from, b.to)))
        });
        out
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.edges.iter().flat_map(|slots| slots.iter().map(|(_, tau)| *tau))
    }
}
