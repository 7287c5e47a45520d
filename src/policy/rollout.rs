//! Rollout policies for the UCT search
//!
//! A rollout policy picks the column for each random move of a simulated
//! game. It must only ever return an open column.

use rand::{Rng, RngCore};

use crate::board::Board;

/// Trait for policies that choose columns during simulation
pub trait RolloutPolicy: Send + Sync {
    /// Picks an open column of `board`
    ///
    /// # Panics
    ///
    /// Panics if every column is full.
    fn choose_column(&self, board: &Board, rng: &mut dyn RngCore) -> usize;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn RolloutPolicy>;
}

/// Uniform rollout policy
///
/// Every open column is equally likely.
#[derive(Debug, Clone, Default)]
pub struct UniformRollout;

impl UniformRollout {
    pub fn new() -> Self {
        UniformRollout
    }
}

impl RolloutPolicy for UniformRollout {
    fn choose_column(&self, board: &Board, rng: &mut dyn RngCore) -> usize {
        let open = board.open_columns();
        assert!(!open.is_empty(), "no open column to roll out");
        open[rng.gen_range(0..open.len())]
    }

    fn clone_box(&self) -> Box<dyn RolloutPolicy> {
        Box::new(self.clone())
    }
}

/// Center-weighted rollout policy
///
/// Column `i` of a board `w` wide gets weight `min(i, w - 1 - i) + 1`, so a
/// 7-wide board uses `1 2 3 4 3 2 1`. A draw that hits a full column is
/// thrown away and the whole draw repeated.
#[derive(Debug, Clone, Default)]
pub struct CenterWeightedRollout;

impl CenterWeightedRollout {
    pub fn new() -> Self {
        CenterWeightedRollout
    }

    /// Weight of column `col` on a board `width` wide
    pub fn weight(col: usize, width: usize) -> u64 {
        (col.min(width - 1 - col) + 1) as u64
    }

    /// Sum of all column weights
    ///
    /// With `k` columns up to and including the middle this is `k(k+1)`,
    /// less `k` when the width is odd because the middle is counted once.
    pub fn total_weight(width: usize) -> u64 {
        let k = ((width - 1) / 2 + 1) as u64;
        let total = k * (k + 1);
        if width % 2 == 1 {
            total - k
        } else {
            total
        }
    }
}

impl RolloutPolicy for CenterWeightedRollout {
    fn choose_column(&self, board: &Board, rng: &mut dyn RngCore) -> usize {
        assert!(!board.is_full(), "no open column to roll out");

        let width = board.width();
        let total = Self::total_weight(width);
        loop {
            let sample = rng.gen_range(0..total);
            let mut cumulative = 0;
            let col = (0..width)
                .find(|&c| {
                    cumulative += Self::weight(c, width);
                    sample < cumulative
                })
                .unwrap_or(width - 1);

            if board.is_column_open(col) {
                return col;
            }
        }
    }

    fn clone_box(&self) -> Box<dyn RolloutPolicy> {
        Box::new(self.clone())
    }
}

// Implement RolloutPolicy for Box<dyn RolloutPolicy>
impl RolloutPolicy for Box<dyn RolloutPolicy> {
    fn choose_column(&self, board: &Board, rng: &mut dyn RngCore) -> usize {
        (**self).choose_column(board, rng)
    }

    fn clone_box(&self) -> Box<dyn RolloutPolicy> {
        (**self).clone_box()
    }
}
