//! Maze graph: the immutable structure every ant walks.
//!
//! Built once per run from a [`MazeGrid`]. Construction rejects mazes whose
//! goal cannot be reached from the start (a single breadth-first pass), and
//! precomputes every passable cell's neighbor list so lookups during path
//! construction are constant time.
//!
//! The graph is also mirrored into a petgraph `UnGraph` for reachability and
//! for reference shortest-path searches.

use crate::error::{FormicaError, Result, UnsolvableReason};
use crate::grid::MazeGrid;
use crate::types::{Cell, Connectivity, CostModel};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A one-step transition out of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjacent {
    /// The neighboring cell.
    pub cell: Cell,
    /// Dense node index of the neighboring cell.
    pub node: usize,
    /// Edge weight: 1 for orthogonal moves, √2 for diagonal ones.
    pub weight: f64,
}

/// Immutable graph of passable cells and their adjacency.
#[derive(Debug, Clone)]
pub struct MazeGraph {
    rows: usize,
    cols: usize,
    connectivity: Connectivity,
    start: Cell,
    goal: Cell,
    graph: UnGraph<Cell, f64>,
    /// Map from a cell to its petgraph index (equal to its dense node index).
    node_index: HashMap<Cell, NodeIndex>,
    /// Neighbor lists indexed by dense node index.
    adjacency: Vec<Vec<Adjacent>>,
}

impl MazeGraph {
    /// Build the graph and verify that `goal` is reachable from `start`.
    pub fn build(
        grid: &MazeGrid,
        start: Cell,
        goal: Cell,
        connectivity: Connectivity,
    ) -> Result<Self> {
        if grid.is_empty() {
            return Err(FormicaError::unsolvable(UnsolvableReason::EmptyGrid));
        }
        for cell in [start, goal] {
            if !grid.contains(&cell) {
                return Err(FormicaError::unsolvable(UnsolvableReason::OutOfBounds(cell)));
            }
            if !grid.is_passable(&cell) {
                return Err(FormicaError::unsolvable(UnsolvableReason::Wall(cell)));
            }
        }

        let mut graph = UnGraph::with_capacity(grid.passable_count(), 0);
        let mut node_index = HashMap::with_capacity(grid.passable_count());
        for cell in grid.passable_cells() {
            let idx = graph.add_node(cell);
            node_index.insert(cell, idx);
        }

        let mut adjacency = vec![Vec::with_capacity(connectivity.degree()); graph.node_count()];
        for (&cell, &idx) in &node_index {
            for &(dr, dc) in connectivity.offsets() {
                let (Some(row), Some(col)) = (
                    cell.row.checked_add_signed(dr),
                    cell.col.checked_add_signed(dc),
                ) else {
                    continue;
                };
                let neighbor = Cell::new(row, col);
                let Some(&nidx) = node_index.get(&neighbor) else {
                    continue;
                };
                let weight = if cell.is_diagonal_to(&neighbor) {
                    std::f64::consts::SQRT_2
                } else {
                    1.0
                };
                adjacency[idx.index()].push(Adjacent {
                    cell: neighbor,
                    node: nidx.index(),
                    weight,
                });
            }
        }
        // Stable, offset-ordered edge insertion regardless of HashMap order.
        for (node, steps) in adjacency.iter().enumerate() {
            for step in steps.iter().filter(|s| s.node > node) {
                graph.add_edge(NodeIndex::new(node), NodeIndex::new(step.node), step.weight);
            }
        }

        let start_idx = node_index[&start];
        let goal_idx = node_index[&goal];
        let mut bfs = Bfs::new(&graph, start_idx);
        let mut reached = false;
        while let Some(idx) = bfs.next(&graph) {
            if idx == goal_idx {
                reached = true;
                break;
            }
        }
        if !reached {
            return Err(FormicaError::unsolvable(UnsolvableReason::Disconnected {
                start,
                goal,
            }));
        }

        Ok(Self {
            rows: grid.rows(),
            cols: grid.cols(),
            connectivity,
            start,
            goal,
            graph,
            node_index,
            adjacency,
        })
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Number of passable cells.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed transitions (each undirected edge counts twice).
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.node_index.contains_key(cell)
    }

    /// Dense index of a passable cell.
    pub fn node_of(&self, cell: &Cell) -> Option<usize> {
        self.node_index.get(cell).map(|idx| idx.index())
    }

    /// Cell at a dense node index.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not below [`node_count`](Self::node_count).
    pub fn cell_of(&self, node: usize) -> Cell {
        self.graph[NodeIndex::new(node)]
    }

    /// Passable cells one step away from `cell`. Empty for walls and
    /// cells outside the maze.
    pub fn neighbors(&self, cell: &Cell) -> &[Adjacent] {
        self.node_of(cell).map_or(&[], |node| &self.adjacency[node])
    }

    /// Neighbor list by dense node index.
    pub fn adjacent(&self, node: usize) -> &[Adjacent] {
        &self.adjacency[node]
    }

    /// Weight of the transition `from -> to`, if it is an edge.
    pub fn edge_weight(&self, from: &Cell, to: &Cell) -> Option<f64> {
        self.neighbors(from)
            .iter()
            .find(|a| a.cell == *to)
            .map(|a| a.weight)
    }

    /// Cost of walking `cells` in order, or `None` if any step is not an edge.
    pub fn path_cost(&self, cells: &[Cell], model: CostModel) -> Option<f64> {
        let mut cost = 0.0;
        for pair in cells.windows(2) {
            let weight = self.edge_weight(&pair[0], &pair[1])?;
            cost += match model {
                CostModel::Steps => 1.0,
                CostModel::Weighted => weight,
            };
        }
        Some(cost)
    }

    /// Adjacency as ordered sets, for structural comparison.
    pub fn adjacency_sets(&self) -> BTreeMap<Cell, BTreeSet<Cell>> {
        self.adjacency
            .iter()
            .enumerate()
            .map(|(node, steps)| {
                (
                    self.cell_of(node),
                    steps.iter().map(|s| s.cell).collect::<BTreeSet<_>>(),
                )
            })
            .collect()
    }

    /// The underlying petgraph representation.
    pub fn petgraph(&self) -> &UnGraph<Cell, f64> {
        &self.graph
    }

    /// Petgraph index of a passable cell.
    pub fn petgraph_index(&self, cell: &Cell) -> Option<NodeIndex> {
        self.node_index.get(cell).copied()
    }
}
