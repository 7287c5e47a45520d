//! # gravity-uct
//!
//! A Monte Carlo Tree Search (UCT) move picker for two-player gravity-drop
//! grid games in the Connect-Four family, where one cell of the board is
//! permanently blocked.
//!
//! The engine is handed a board snapshot, decides a move for the machine
//! side and returns the cell its piece lands in. Reading and printing the
//! board, the turn loop and the game rules live outside the search; the
//! rules come in through the [`WinOracle`] trait.
//!
//! ## Basic Usage
//!
//! ```
//! use gravity_uct::{Board, SearchConfig, UctEngine};
//!
//! fn main() -> Result<(), gravity_uct::SearchError> {
//!     // An empty 6x7 board without a forbidden cell
//!     let board = Board::new(6, 7, None)?;
//!
//!     // Bound the search by iterations only so the run is reproducible
//!     let config = SearchConfig::default()
//!         .without_time_limit()
//!         .with_max_iterations(200);
//!
//!     let mut engine = UctEngine::with_seed(config, 42);
//!     let mv = engine.search(&board, None)?;
//!
//!     // The piece lands on the bottom row of the chosen column
//!     assert_eq!(mv.row, 5);
//!     println!("{}", engine.get_statistics().summary());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! 1. **Tactics**: a move that wins immediately is played at once; failing
//!    that, a column where the opponent would win next turn is blocked.
//!
//! 2. **Selection**: from the root, descend through fully expanded nodes by
//!    the UCB score until a node with an untried column (or a finished
//!    position) is reached.
//!
//! 3. **Expansion**: pick one untried column at random and create the child
//!    position.
//!
//! 4. **Simulation**: play random moves on a scratch copy of the board until
//!    someone wins or the board fills up. Center columns are favoured by
//!    default.
//!
//! 5. **Backpropagation**: add the outcome (+1, -1 or 0 from the machine's
//!    point of view) and one visit to the new node and all its ancestors.
//!
//! Once the time or iteration budget is spent, the root child with the best
//! average outcome is played.
//!
//! ## The Forbidden Cell
//!
//! A single cell can be declared forbidden. It is never filled: when a
//! piece lands right below it, the column's top counter skips over it and
//! the next piece in that column lands above it.

pub mod board;
pub mod config;
pub mod engine;
pub mod oracle;
pub mod policy;
pub mod stats;
pub mod tree;
pub mod utils;

pub use board::{Board, Cell, Position, Side};
pub use config::{RolloutKind, SearchConfig};
pub use engine::UctEngine;
pub use oracle::{ConnectFour, WinOracle};
pub use policy::{RolloutPolicy, SelectionPolicy};
pub use stats::{MoveStats, SearchStatistics, Tactic};
pub use tree::{NodeId, SearchNode, SearchTree};

/// Error types for the search
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// Every column is already full
    #[error("No legal moves available on the board")]
    NoLegalMoves,

    /// The board handed to the engine breaks its preconditions
    #[error("Invalid board: {0}")]
    InvalidBoard(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
