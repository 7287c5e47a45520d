//! Win detection consumed by the search engine
//!
//! The engine never decides on its own whether a placement wins. It asks a
//! [`WinOracle`], always passing the position of the piece that was placed
//! most recently, never the next empty slot.

use crate::board::{Board, Cell, Position, Side};

/// Predicates that decide whether a position is finished
///
/// Implementations must be pure: the same board and last move always give
/// the same answer.
pub trait WinOracle: Send + Sync {
    /// Returns true if the machine piece at `last` completes a win
    fn machine_win(&self, last: Position, board: &Board) -> bool;

    /// Returns true if the opponent piece at `last` completes a win
    fn user_win(&self, last: Position, board: &Board) -> bool;

    /// Returns true if no column can take another piece
    fn is_tie(&self, board: &Board) -> bool {
        board.is_full()
    }

    /// Dispatches to the win predicate of `side`
    fn wins(&self, side: Side, last: Position, board: &Board) -> bool {
        match side {
            Side::Machine => self.machine_win(last, board),
            Side::Opponent => self.user_win(last, board),
        }
    }

    /// Create a boxed clone of this oracle
    fn clone_box(&self) -> Box<dyn WinOracle>;
}

/// N-in-a-row rule: a line of `run_length` equal pieces horizontally,
/// vertically or diagonally through the last placement wins
#[derive(Debug, Clone)]
pub struct ConnectFour {
    /// Number of aligned pieces needed to win
    pub run_length: usize,
}

impl ConnectFour {
    /// Creates the classic four-in-a-row rule
    pub fn new() -> Self {
        ConnectFour { run_length: 4 }
    }

    /// Creates a rule with a custom run length
    pub fn with_run_length(run_length: usize) -> Self {
        ConnectFour { run_length }
    }

    fn completes_run(&self, side: Side, last: Position, board: &Board) -> bool {
        let target = side.cell();
        if board.get(last) != target {
            return false;
        }

        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
        DIRECTIONS.iter().any(|&(dr, dc)| {
            1 + self.count_from(board, last, (dr, dc), target)
                + self.count_from(board, last, (-dr, -dc), target)
                >= self.run_length
        })
    }

    /// Counts matching pieces stepping away from `start`, excluding `start`
    fn count_from(
        &self,
        board: &Board,
        start: Position,
        (dr, dc): (isize, isize),
        target: Cell,
    ) -> usize {
        let mut count = 0;
        let (mut r, mut c) = (start.row as isize + dr, start.col as isize + dc);
        while r >= 0
            && c >= 0
            && (r as usize) < board.height()
            && (c as usize) < board.width()
            && board.get(Position::new(r as usize, c as usize)) == target
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }
}

impl Default for ConnectFour {
    fn default() -> Self {
        Self::new()
    }
}

impl WinOracle for ConnectFour {
    fn machine_win(&self, last: Position, board: &Board) -> bool {
        self.completes_run(Side::Machine, last, board)
    }

    fn user_win(&self, last: Position, board: &Board) -> bool {
        self.completes_run(Side::Opponent, last, board)
    }

    fn clone_box(&self) -> Box<dyn WinOracle> {
        Box::new(self.clone())
    }
}

// Implement WinOracle for Box<dyn WinOracle>
impl WinOracle for Box<dyn WinOracle> {
    fn machine_win(&self, last: Position, board: &Board) -> bool {
        (**self).machine_win(last, board)
    }

    fn user_win(&self, last: Position, board: &Board) -> bool {
        (**self).user_win(last, board)
    }

    fn is_tie(&self, board: &Board) -> bool {
        (**self).is_tie(board)
    }

    fn clone_box(&self) -> Box<dyn WinOracle> {
        (**self).clone_box()
    }
}
