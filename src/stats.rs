//! Statistics collection for UCT searches
//!
//! This module provides structures for collecting and reporting statistics
//! about a single search call.

use std::time::Duration;

use crate::board::Position;

/// Immediate move found before any tree search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tactic {
    /// The machine wins on the spot
    Win(Position),
    /// The opponent would win here next turn
    Block(Position),
}

/// Visit count and average outcome of one candidate move at the root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveStats {
    /// Cell the machine's piece would land in
    pub position: Position,
    pub visits: u64,
    /// Average outcome from the machine's point of view
    pub value: f64,
}

/// Statistics collected during a search
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    /// Number of iterations performed
    pub iterations: usize,

    /// Total time spent searching
    pub total_time: Duration,

    /// Total number of nodes in the tree
    pub tree_size: usize,

    /// Maximum depth reached in the tree
    pub max_depth: usize,

    /// Whether the search was stopped by the wall-clock budget
    pub stopped_early: bool,

    /// Set when the move came from the immediate win/block check
    pub tactic: Option<Tactic>,
}

impl SearchStatistics {
    /// Creates a new, empty statistics object
    pub fn new() -> Self {
        SearchStatistics {
            iterations: 0,
            total_time: Duration::from_secs(0),
            tree_size: 1, // Start with root node
            max_depth: 0,
            stopped_early: false,
            tactic: None,
        }
    }

    /// Returns the average time per iteration in microseconds
    pub fn avg_time_per_iteration_us(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.total_time.as_micros() as f64 / self.iterations as f64
    }

    /// Returns the number of iterations per second
    pub fn iterations_per_second(&self) -> f64 {
        if self.total_time.as_secs_f64() <= 0.0 {
            return 0.0;
        }
        self.iterations as f64 / self.total_time.as_secs_f64()
    }

    /// Returns a summary of the statistics as a string
    pub fn summary(&self) -> String {
        let tactic = match self.tactic {
            Some(Tactic::Win(pos)) => format!("win at {}", pos),
            Some(Tactic::Block(pos)) => format!("block at {}", pos),
            None => "none".to_string(),
        };
        format!(
            "UCT Search Statistics:\n\
             - Iterations: {}\n\
             - Total time: {:.3} seconds\n\
             - Tree size: {} nodes\n\
             - Max depth: {}\n\
             - Avg time per iteration: {:.3} µs\n\
             - Iterations per second: {:.1}\n\
             - Stopped early: {}\n\
             - Tactic: {}",
            self.iterations,
            self.total_time.as_secs_f64(),
            self.tree_size,
            self.max_depth,
            self.avg_time_per_iteration_us(),
            self.iterations_per_second(),
            self.stopped_early,
            tactic
        )
    }
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new()
    }
}
