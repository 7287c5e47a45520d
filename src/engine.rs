//! The UCT search engine
//!
//! This module orchestrates the four phases of the search (selection,
//! expansion, simulation and backpropagation) and the final move decision.

use std::time::Instant;

use log::{debug, info};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

use crate::{
    board::{Board, Cell, Position, Side},
    config::SearchConfig,
    oracle::{ConnectFour, WinOracle},
    policy::{
        rollout::RolloutPolicy,
        selection::{ExploitationPolicy, SelectionPolicy, UcbPolicy},
    },
    stats::{MoveStats, SearchStatistics, Tactic},
    tree::{NodeId, SearchNode, SearchTree},
    Result, SearchError,
};

/// Picks moves for the machine side with Upper Confidence bounds applied to Trees
///
/// Every call to [`search`](Self::search) builds a fresh tree from the given
/// board. The tree of the latest call is kept for inspection until the next
/// call replaces it; it is never reused.
///
/// All randomness comes from the injected generator `R`, so two engines
/// seeded alike and given the same inputs make identical choices when the
/// search is bounded by iterations only.
pub struct UctEngine<R: RngCore = StdRng> {
    /// Configuration for the search
    config: SearchConfig,

    /// Random source for expansion and rollouts
    rng: R,

    /// Decides wins and ties
    oracle: Box<dyn WinOracle>,

    /// Policy used to descend through fully expanded nodes
    selection_policy: Box<dyn SelectionPolicy>,

    /// Policy used to commit to a root child once the budget is spent
    decision_policy: Box<dyn SelectionPolicy>,

    /// Column sampler for simulations
    rollout_policy: Box<dyn RolloutPolicy>,

    /// Statistics gathered during the latest search
    statistics: SearchStatistics,

    /// Tree built by the latest search
    tree: Option<SearchTree>,
}

impl UctEngine<StdRng> {
    /// Creates an engine seeded from the operating system
    pub fn new(config: SearchConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates an engine with a reproducible random sequence
    pub fn with_seed(config: SearchConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> UctEngine<R> {
    /// Creates an engine drawing randomness from `rng`
    ///
    /// Uses the four-in-a-row rule and the policies named by `config`.
    pub fn with_rng(config: SearchConfig, rng: R) -> Self {
        let selection_policy: Box<dyn SelectionPolicy> =
            Box::new(UcbPolicy::new(config.exploration_constant));
        let rollout_policy = config.rollout.policy();

        UctEngine {
            config,
            rng,
            oracle: Box::new(ConnectFour::new()),
            selection_policy,
            decision_policy: Box::new(ExploitationPolicy::new()),
            rollout_policy,
            statistics: SearchStatistics::new(),
            tree: None,
        }
    }

    /// Sets the win oracle to use
    pub fn with_oracle<O: WinOracle + 'static>(mut self, oracle: O) -> Self {
        self.oracle = Box::new(oracle);
        self
    }

    /// Sets the selection policy used while descending the tree
    pub fn with_selection_policy<P: SelectionPolicy + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Sets the rollout policy, overriding the configured kind
    pub fn with_rollout_policy<P: RolloutPolicy + 'static>(mut self, policy: P) -> Self {
        self.rollout_policy = Box::new(policy);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Chooses the machine's move on `board`
    ///
    /// `last_move` is the most recent placement on the board, if any. The
    /// returned position is the cell the machine's piece lands in.
    ///
    /// An immediate machine win is returned first, then a forced block of an
    /// immediate opponent win. Otherwise the tree search runs until the
    /// wall-clock budget or the iteration cap is reached, whichever comes
    /// first; at least one iteration always completes.
    pub fn search(&mut self, board: &Board, last_move: Option<Position>) -> Result<Position> {
        self.config.validate()?;
        if let Some(pos) = last_move {
            if pos.row >= board.height() || pos.col >= board.width() {
                return Err(SearchError::InvalidBoard(format!(
                    "last move {} outside {}x{} board",
                    pos,
                    board.height(),
                    board.width()
                )));
            }
        }
        if board.is_full() {
            return Err(SearchError::NoLegalMoves);
        }

        self.statistics = SearchStatistics::new();
        self.tree = None;
        let start_time = Instant::now();

        if self.config.tactical_check {
            if let Some(tactic) = self.find_tactic(board) {
                self.statistics.tactic = Some(tactic);
                self.statistics.total_time = start_time.elapsed();
                info!("tactical move: {:?}", tactic);
                return Ok(match tactic {
                    Tactic::Win(pos) | Tactic::Block(pos) => pos,
                });
            }
        }

        let mut tree = SearchTree::new(board.clone(), last_move);
        let max_time = self.config.max_time;

        while self.statistics.iterations < self.config.max_iterations {
            if let Some(max_duration) = max_time {
                if self.statistics.iterations > 0 && start_time.elapsed() >= max_duration {
                    self.statistics.stopped_early = true;
                    break;
                }
            }

            self.execute_iteration(&mut tree)?;
            self.statistics.iterations += 1;
        }

        self.statistics.total_time = start_time.elapsed();
        self.statistics.tree_size = tree.len();
        self.statistics.max_depth = tree.max_depth();

        let best = self.select_best_move(&tree)?;
        debug!(
            "chose {} after {} iterations ({} nodes, {:.1} it/s)",
            best,
            self.statistics.iterations,
            self.statistics.tree_size,
            self.statistics.iterations_per_second()
        );

        self.tree = Some(tree);
        Ok(best)
    }

    /// Looks for a column that wins now, then for one the opponent would win with
    ///
    /// Works on a scratch copy of the board and restores every cell it tries.
    fn find_tactic(&self, board: &Board) -> Option<Tactic> {
        let mut scratch = board.clone();

        for side in [Side::Machine, Side::Opponent] {
            for col in 0..scratch.width() {
                let Some(pos) = scratch.landing(col) else {
                    continue;
                };

                scratch.set(pos, side.cell());
                let wins = self.oracle.wins(side, pos, &scratch);
                scratch.set(pos, Cell::Empty);

                if wins {
                    return Some(match side {
                        Side::Machine => Tactic::Win(pos),
                        Side::Opponent => Tactic::Block(pos),
                    });
                }
            }
        }

        None
    }

    /// Execute a single iteration of the search
    fn execute_iteration(&mut self, tree: &mut SearchTree) -> Result<()> {
        // 1 + 2. Selection and expansion
        let node = self.tree_policy(tree)?;

        // 3. Simulation
        let reward = self.default_policy(tree.node(node));

        // 4. Backpropagation
        tree.backpropagate(node, reward);

        Ok(())
    }

    /// Descends from the root and expands the first node with an untried column
    ///
    /// Returns a terminal node directly if one is reached first.
    fn tree_policy(&mut self, tree: &mut SearchTree) -> Result<NodeId> {
        let mut current = tree.root();

        while !tree.is_terminal(current, &*self.oracle) {
            let node = tree.node(current);
            if node.is_expandable() {
                let rank = self.rng.gen_range(0..node.untried.len());
                return Ok(tree.expand(current, rank));
            }

            current = self
                .selection_policy
                .select_child(tree, current)
                .ok_or(SearchError::NoLegalMoves)?;
        }

        Ok(current)
    }

    /// Plays random moves from `node` on a scratch board until the game ends
    ///
    /// Returns +1 for a machine win, -1 for an opponent win and 0 for a tie.
    fn default_policy(&mut self, node: &SearchNode) -> f64 {
        let mut board = node.board.clone();

        if let Some(outcome) = self.outcome(&board, node.last_move, node.mover()) {
            return outcome;
        }

        let mut side = node.to_act;
        loop {
            let col = self.rollout_policy.choose_column(&board, &mut self.rng);
            let pos = board.drop_piece(col, side);

            if let Some(outcome) = self.outcome(&board, Some(pos), side) {
                return outcome;
            }
            side = side.opponent();
        }
    }

    /// Outcome of the position if `mover`'s placement at `last` decided it
    fn outcome(&self, board: &Board, last: Option<Position>, mover: Side) -> Option<f64> {
        if let Some(pos) = last {
            if self.oracle.wins(mover, pos, board) {
                return Some(mover.reward());
            }
        }
        if self.oracle.is_tie(board) {
            return Some(0.0);
        }
        None
    }

    /// Move of the root child with the best signed average outcome
    fn select_best_move(&self, tree: &SearchTree) -> Result<Position> {
        let best = self
            .decision_policy
            .select_child(tree, tree.root())
            .ok_or(SearchError::NoLegalMoves)?;

        tree.node(best).last_move.ok_or(SearchError::NoLegalMoves)
    }

    /// Returns the statistics of the latest search
    pub fn get_statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Returns the tree of the latest search, if it ran the tree search
    pub fn tree(&self) -> Option<&SearchTree> {
        self.tree.as_ref()
    }

    /// Per-move statistics of the root children, in column order
    pub fn root_child_stats(&self) -> Vec<MoveStats> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };

        tree.node(tree.root())
            .child_ids()
            .filter_map(|id| {
                let child = tree.node(id);
                child.last_move.map(|position| MoveStats {
                    position,
                    visits: child.visits,
                    value: child.value(),
                })
            })
            .collect()
    }

    /// Returns a visualization of the latest search tree
    pub fn visualize_tree(&self) -> String {
        self.tree
            .as_ref()
            .map(|tree| tree.to_string())
            .unwrap_or_default()
    }
}
