//! Board snapshot for gravity-drop grid games
//!
//! A board is a `height x width` grid where row 0 is the top row. Each
//! column carries a "top" counter: the number of rows still playable from
//! the top, so the next piece in column `c` lands on row `tops[c] - 1` and a
//! counter of 0 marks a full column.

use std::fmt;

use crate::{Result, SearchError};

/// State of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Opponent,
    Machine,
}

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The side the engine picks moves for
    Machine,
    /// The human or external player
    Opponent,
}

impl Side {
    /// Returns the other side
    pub fn opponent(self) -> Self {
        match self {
            Side::Machine => Side::Opponent,
            Side::Opponent => Side::Machine,
        }
    }

    /// Marker this side leaves on the board
    pub fn cell(self) -> Cell {
        match self {
            Side::Machine => Cell::Machine,
            Side::Opponent => Cell::Opponent,
        }
    }

    /// Outcome when this side wins: +1 for the machine, -1 otherwise
    ///
    /// Also the sign this side applies to accumulated outcomes when choosing.
    pub fn reward(self) -> f64 {
        match self {
            Side::Machine => 1.0,
            Side::Opponent => -1.0,
        }
    }
}

/// A `(row, col)` coordinate on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Grid of cells plus per-column top counters and an optional forbidden cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
    tops: Vec<usize>,
    forbidden: Option<Position>,
}

impl Board {
    /// Creates an empty board
    ///
    /// If the forbidden cell sits on the bottom row its column starts one
    /// slot shorter, matching how a live game would present it.
    pub fn new(height: usize, width: usize, forbidden: Option<Position>) -> Result<Self> {
        let mut tops = vec![height; width];
        if let Some(f) = forbidden {
            if f.row + 1 == height && f.col < width {
                tops[f.col] -= 1;
            }
        }
        Self::from_parts(
            height,
            width,
            vec![Cell::Empty; height * width],
            tops,
            forbidden,
        )
    }

    /// Builds a board from caller-supplied state, checking its preconditions
    ///
    /// `cells` is row-major with row 0 at the top.
    pub fn from_parts(
        height: usize,
        width: usize,
        cells: Vec<Cell>,
        tops: Vec<usize>,
        forbidden: Option<Position>,
    ) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(SearchError::InvalidBoard(format!(
                "board dimensions must be non-zero, got {}x{}",
                height, width
            )));
        }
        if cells.len() != height * width {
            return Err(SearchError::InvalidBoard(format!(
                "expected {} cells, got {}",
                height * width,
                cells.len()
            )));
        }
        if tops.len() != width {
            return Err(SearchError::InvalidBoard(format!(
                "expected {} top counters, got {}",
                width,
                tops.len()
            )));
        }
        if let Some((col, top)) = tops.iter().enumerate().find(|&(_, &t)| t > height) {
            return Err(SearchError::InvalidBoard(format!(
                "top counter {} of column {} exceeds height {}",
                top, col, height
            )));
        }
        if let Some(f) = forbidden {
            if f.row >= height || f.col >= width {
                return Err(SearchError::InvalidBoard(format!(
                    "forbidden cell {} outside {}x{} board",
                    f, height, width
                )));
            }
            if cells[f.row * width + f.col] != Cell::Empty {
                return Err(SearchError::InvalidBoard(format!(
                    "forbidden cell {} is occupied",
                    f
                )));
            }
            if tops[f.col] == f.row + 1 {
                return Err(SearchError::InvalidBoard(format!(
                    "column {} would land on forbidden cell {}",
                    f.col, f
                )));
            }
        }

        Ok(Board {
            height,
            width,
            cells,
            tops,
            forbidden,
        })
    }

    /// Builds a board from rows of cells, deriving the top counters
    ///
    /// Each column's counter is the length of its empty run from the top,
    /// shortened by one when the forbidden cell is the next landing spot.
    pub fn from_rows(rows: &[Vec<Cell>], forbidden: Option<Position>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != width) {
            return Err(SearchError::InvalidBoard("ragged rows".to_string()));
        }

        let tops = (0..width)
            .map(|col| {
                let top = (0..height)
                    .take_while(|&row| rows[row][col] == Cell::Empty)
                    .count();
                if top > 0 && forbidden == Some(Position::new(top - 1, col)) {
                    top - 1
                } else {
                    top
                }
            })
            .collect();
        let cells = rows.iter().flatten().copied().collect();

        Self::from_parts(height, width, cells, tops, forbidden)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn tops(&self) -> &[usize] {
        &self.tops
    }

    pub fn forbidden(&self) -> Option<Position> {
        self.forbidden
    }

    /// Returns the cell at `pos`
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.row * self.width + pos.col]
    }

    /// Overwrites a single cell without touching the top counters
    ///
    /// Used for hypothetical placements that are undone immediately.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.row * self.width + pos.col] = cell;
    }

    /// Returns true if another piece fits in `col`
    pub fn is_column_open(&self, col: usize) -> bool {
        self.tops[col] > 0
    }

    /// Columns that still accept a piece, in ascending order
    pub fn open_columns(&self) -> Vec<usize> {
        (0..self.width).filter(|&c| self.is_column_open(c)).collect()
    }

    /// Returns true when every column is full
    pub fn is_full(&self) -> bool {
        self.tops.iter().all(|&t| t == 0)
    }

    /// Position the next piece dropped into `col` would occupy
    pub fn landing(&self, col: usize) -> Option<Position> {
        if self.is_column_open(col) {
            Some(Position::new(self.tops[col] - 1, col))
        } else {
            None
        }
    }

    /// Drops a piece for `side` into `col` and returns where it landed
    ///
    /// When the cell right above the landing cell is the forbidden cell, the
    /// column's counter skips it so it can never be filled.
    ///
    /// # Panics
    ///
    /// Panics if `col` is full.
    pub fn drop_piece(&mut self, col: usize, side: Side) -> Position {
        assert!(self.is_column_open(col), "column {} is full", col);

        let row = self.tops[col] - 1;
        self.tops[col] = row;
        self.set(Position::new(row, col), side.cell());

        if let Some(f) = self.forbidden {
            if f.col == col && row > 0 && f.row == row - 1 {
                self.tops[col] -= 1;
            }
        }

        Position::new(row, col)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let pos = Position::new(row, col);
                let c = match self.get(pos) {
                    _ if self.forbidden == Some(pos) => '#',
                    Cell::Empty => '.',
                    Cell::Opponent => 'X',
                    Cell::Machine => 'O',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
