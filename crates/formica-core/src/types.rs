//! Shared types used across all Formica crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Monotonic iteration counter of a colony run.
pub type Iteration = u64;

/// Unique identifier for one solve run, carried in log spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Deterministic id for seeded runs, so replays log under the same id.
    pub fn from_seed(seed: u64) -> Self {
        Self(Uuid::from_u64_pair(seed, seed.rotate_left(32) ^ 0x9e37_79b9_7f4a_7c15))
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of an ant within one iteration's cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AntId(pub u32);

impl fmt::Display for AntId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ant-{}", self.0)
    }
}

/// A coordinate in the maze grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(&self, other: &Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    pub fn chebyshev(&self, other: &Cell) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    pub fn euclidean(&self, other: &Cell) -> f64 {
        let dr = self.row.abs_diff(other.row) as f64;
        let dc = self.col.abs_diff(other.col) as f64;
        (dr * dr + dc * dc).sqrt()
    }

    /// Whether a one-step move to `other` is diagonal.
    pub fn is_diagonal_to(&self, other: &Cell) -> bool {
        self.row != other.row && self.col != other.col
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Which neighboring cells count as one step away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Connectivity {
    /// North, south, east, west.
    #[default]
    Four,
    /// The four orthogonal neighbors plus the four diagonals.
    Eight,
}

impl Connectivity {
    /// Row/column offsets of every neighbor under this connectivity.
    pub fn offsets(&self) -> &'static [(isize, isize)] {
        const FOUR: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];
        const EIGHT: [(isize, isize); 8] = [
            (-1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
            (1, 0),
            (1, -1),
            (0, -1),
            (-1, -1),
        ];
        match self {
            Connectivity::Four => &FOUR,
            Connectivity::Eight => &EIGHT,
        }
    }

    pub fn degree(&self) -> usize {
        self.offsets().len()
    }
}

impl TryFrom<u8> for Connectivity {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            4 => Ok(Connectivity::Four),
            8 => Ok(Connectivity::Eight),
            other => Err(other),
        }
    }
}

/// How the cost of a path is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CostModel {
    /// Number of edges on the path.
    #[default]
    Steps,
    /// Sum of edge weights (1 orthogonal, √2 diagonal).
    Weighted,
}

/// A cycle-free walk from start to goal produced by one ant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    cells: Vec<Cell>,
    cost: f64,
}

impl Path {
    /// Wrap an already-validated sequence of cells with its cost.
    pub fn new(cells: Vec<Cell>, cost: f64) -> Self {
        Self { cells, cost }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of edges on the path.
    pub fn len(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.len() < 2
    }

    pub fn first(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn last(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    /// Consecutive `(from, to)` transitions along the path.
    pub fn edges(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        self.cells.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// True when no cell appears twice.
    pub fn is_cycle_free(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.cells.len());
        self.cells.iter().all(|c| seen.insert(*c))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self.cells.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}] (cost {})", cells.join(" -> "), self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances_between_cells() {
        let a = Cell::new(0, 0);
        let b = Cell::new(3, 4);
        assert_eq!(a.manhattan(&b), 7);
        assert_eq!(a.chebyshev(&b), 4);
        assert!((a.euclidean(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn connectivity_from_number() {
        assert_eq!(Connectivity::try_from(4), Ok(Connectivity::Four));
        assert_eq!(Connectivity::try_from(8), Ok(Connectivity::Eight));
        assert_eq!(Connectivity::try_from(6), Err(6));
        assert_eq!(Connectivity::Eight.degree(), 8);
    }

    #[test]
    fn path_edges_and_cycles() {
        let path = Path::new(
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)],
            2.0,
        );
        assert_eq!(path.len(), 2);
        assert_eq!(
            path.edges().collect::<Vec<_>>(),
            vec![
                (Cell::new(0, 0), Cell::new(0, 1)),
                (Cell::new(0, 1), Cell::new(1, 1)),
            ]
        );
        assert!(path.is_cycle_free());

        let looped = Path::new(
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 0)],
            2.0,
        );
        assert!(!looped.is_cycle_free());
    }

    #[test]
    fn seeded_run_ids_are_stable() {
        assert_eq!(RunId::from_seed(7), RunId::from_seed(7));
        assert_ne!(RunId::from_seed(7), RunId::from_seed(8));
    }
}
