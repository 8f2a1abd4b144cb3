//! Maze grid: the pass/wall layout handed over by a maze generator.
//!
//! The grid is plain data. Reachability and adjacency are derived from it
//! once, by [`MazeGraph::build`](crate::maze::MazeGraph::build).

use crate::error::{FormicaError, Result};
use crate::types::{Cell, Path};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rectangular layout of passable cells and walls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeGrid {
    rows: usize,
    cols: usize,
    /// Row-major, `true` = passable.
    passable: Vec<bool>,
}

/// A grid read from text together with its marked endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMaze {
    pub grid: MazeGrid,
    pub start: Option<Cell>,
    pub goal: Option<Cell>,
}

impl MazeGrid {
    /// A grid with no walls.
    pub fn open(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            passable: vec![true; rows * cols],
        }
    }

    /// Build from nested rows, `true` meaning passable.
    pub fn from_cells(cells: Vec<Vec<bool>>) -> Result<Self> {
        let rows = cells.len();
        let cols = cells.first().map_or(0, Vec::len);
        if let Some((idx, row)) = cells.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(FormicaError::InvalidGrid(format!(
                "row {} has {} columns, expected {}",
                idx,
                row.len(),
                cols
            )));
        }
        Ok(Self {
            rows,
            cols,
            passable: cells.into_iter().flatten().collect(),
        })
    }

    /// Read a text layout.
    ///
    /// `#` is a wall; `.` and space are passable; `S` and `G` mark the
    /// start and goal (both passable). Empty leading/trailing lines are
    /// ignored; a line of spaces is a row of open cells.
    pub fn parse(text: &str) -> Result<ParsedMaze> {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .skip_while(|l| l.is_empty())
            .collect();
        let end = lines
            .iter()
            .rposition(|l| !l.is_empty())
            .map_or(0, |i| i + 1);
        let lines = &lines[..end];

        let mut start = None;
        let mut goal = None;
        let mut cells = Vec::with_capacity(lines.len());

        for (row, line) in lines.iter().enumerate() {
            let mut out = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                let open = match ch {
                    '#' => false,
                    '.' | ' ' => true,
                    'S' | 's' => {
                        if start.replace(Cell::new(row, col)).is_some() {
                            return Err(FormicaError::InvalidGrid(
                                "more than one start marker".to_string(),
                            ));
                        }
                        true
                    }
                    'G' | 'g' => {
                        if goal.replace(Cell::new(row, col)).is_some() {
                            return Err(FormicaError::InvalidGrid(
                                "more than one goal marker".to_string(),
                            ));
                        }
                        true
                    }
                    other => {
                        return Err(FormicaError::InvalidGrid(format!(
                            "unexpected character {:?} at ({}, {})",
                            other, row, col
                        )))
                    }
                };
                out.push(open);
            }
            cells.push(out);
        }

        Ok(ParsedMaze {
            grid: Self::from_cells(cells)?,
            start,
            goal,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Whether the cell is inside the grid and not a wall.
    pub fn is_passable(&self, cell: &Cell) -> bool {
        self.contains(cell) && self.passable[cell.row * self.cols + cell.col]
    }

    /// Mark a cell as a wall. Cells outside the grid are ignored.
    pub fn set_wall(&mut self, cell: Cell) {
        if self.contains(&cell) {
            self.passable[cell.row * self.cols + cell.col] = false;
        }
    }

    /// Clear a wall. Cells outside the grid are ignored.
    pub fn set_open(&mut self, cell: Cell) {
        if self.contains(&cell) {
            self.passable[cell.row * self.cols + cell.col] = true;
        }
    }

    pub fn passable_count(&self) -> usize {
        self.passable.iter().filter(|p| **p).count()
    }

    /// All passable cells in row-major order.
    pub fn passable_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.passable
            .iter()
            .enumerate()
            .filter(|(_, open)| **open)
            .map(move |(i, _)| Cell::new(i / self.cols, i % self.cols))
    }

    /// Render the grid with a path overlaid as `*`.
    pub fn render_path(&self, path: &Path) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = Cell::new(row, col);
                let ch = if path.first() == Some(cell) {
                    'S'
                } else if path.last() == Some(cell) {
                    'G'
                } else if path.contains(&cell) {
                    '*'
                } else if self.is_passable(&cell) {
                    '.'
                } else {
                    '#'
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let ch = if self.is_passable(&Cell::new(row, col)) { '.' } else { '#' };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
