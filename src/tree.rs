//! Tree data structures for the UCT search
//!
//! Nodes live in a single arena owned by [`SearchTree`]. A [`NodeId`] is an
//! index into that arena; children are owned through it and the parent link
//! is a plain back-reference used for navigation only. Dropping the tree
//! releases every node at once.

use std::fmt;

use log::trace;

use crate::board::{Board, Position, Side};
use crate::oracle::WinOracle;

/// Handle to a node inside a [`SearchTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node in the search tree
///
/// Each node holds its own copy of the board, the move that produced it and
/// the statistics gathered by backpropagation.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Private board snapshot, never shared with another node
    pub board: Board,

    /// Side that moves next from this node, i.e. the side producing its children
    pub to_act: Side,

    /// Placement that produced this node
    ///
    /// For the root this is the caller's last move, if any.
    pub last_move: Option<Position>,

    /// Parent node (None for root)
    pub parent: Option<NodeId>,

    /// One slot per column, filled once that column has been expanded
    pub children: Vec<Option<NodeId>>,

    /// Columns not yet expanded; order is not meaningful
    pub untried: Vec<usize>,

    /// Number of rollouts backpropagated through this node
    pub visits: u64,

    /// Sum of rollout outcomes (+1 machine win, -1 opponent win, 0 tie)
    pub total_reward: f64,

    /// Depth of this node in the tree (root = 0)
    pub depth: usize,

    terminal: Option<bool>,
}

impl SearchNode {
    fn new(
        board: Board,
        to_act: Side,
        last_move: Option<Position>,
        parent: Option<NodeId>,
        depth: usize,
    ) -> Self {
        let untried = board.open_columns();
        let children = vec![None; board.width()];

        SearchNode {
            board,
            to_act,
            last_move,
            parent,
            children,
            untried,
            visits: 0,
            total_reward: 0.0,
            depth,
            terminal: None,
        }
    }

    /// Side that placed `last_move`
    pub fn mover(&self) -> Side {
        self.to_act.opponent()
    }

    /// Returns true while some column has not been expanded
    pub fn is_expandable(&self) -> bool {
        !self.untried.is_empty()
    }

    /// Iterates over materialised children in column order
    pub fn child_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().flatten().copied()
    }

    /// Average outcome, 0 for an unvisited node
    pub fn value(&self) -> f64 {
        crate::utils::mean_reward(self.total_reward, self.visits)
    }

    /// Removes the untried column at `rank` in O(1)
    ///
    /// The last entry takes its place, so the order of the remaining
    /// columns changes.
    pub fn remove_untried(&mut self, rank: usize) -> usize {
        self.untried.swap_remove(rank)
    }

    /// Terminal status, computed once and then cached
    ///
    /// A node is terminal when its mover just won or the board is full. The
    /// root is never terminal.
    pub fn is_terminal(&mut self, oracle: &dyn WinOracle) -> bool {
        if let Some(terminal) = self.terminal {
            return terminal;
        }

        let terminal = match self.last_move {
            None => false,
            Some(pos) => {
                oracle.wins(self.mover(), pos, &self.board) || oracle.is_tie(&self.board)
            }
        };
        self.terminal = Some(terminal);
        terminal
    }
}

/// Arena holding every node of one search
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    /// Creates a tree containing only the root
    ///
    /// `last_move` is the caller's most recent placement; the machine is
    /// always the side to act at the root.
    pub fn new(board: Board, last_move: Option<Position>) -> Self {
        let mut root = SearchNode::new(board, Side::Machine, last_move, None, 0);
        root.terminal = Some(false);

        SearchTree { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0]
    }

    /// All nodes in creation order, root first
    pub fn nodes(&self) -> impl Iterator<Item = &SearchNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Deepest node depth in the tree
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Cached terminal check for the node behind `id`
    pub fn is_terminal(&mut self, id: NodeId, oracle: &dyn WinOracle) -> bool {
        self.nodes[id.0].is_terminal(oracle)
    }

    /// Expands the untried column at `rank` of `parent` into a new child
    ///
    /// The child gets a copy of the parent's board with one piece of the
    /// parent's side to act dropped into the chosen column.
    ///
    /// # Panics
    ///
    /// Panics if `rank` is not a valid index into the parent's untried list.
    pub fn expand(&mut self, parent: NodeId, rank: usize) -> NodeId {
        let node = &mut self.nodes[parent.0];
        assert!(
            rank < node.untried.len(),
            "expansion rank {} out of {} untried columns",
            rank,
            node.untried.len()
        );

        let col = node.remove_untried(rank);
        let mut board = node.board.clone();
        let pos = board.drop_piece(col, node.to_act);
        let child = SearchNode::new(
            board,
            node.to_act.opponent(),
            Some(pos),
            Some(parent),
            node.depth + 1,
        );

        let id = NodeId(self.nodes.len());
        self.nodes[parent.0].children[col] = Some(id);
        self.nodes.push(child);
        trace!("expanded column {} -> {} at depth {}", col, pos, self.nodes[id.0].depth);

        id
    }

    /// Adds one visit and `reward` to `id` and every ancestor up to the root
    pub fn backpropagate(&mut self, id: NodeId, reward: f64) {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = &mut self.nodes[id.0];
            node.visits += 1;
            node.total_reward += reward;
            current = node.parent;
        }
    }
}

impl fmt::Display for SearchTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(
            tree: &SearchTree,
            id: NodeId,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            let node = tree.node(id);
            let indent = "  ".repeat(node.depth);
            let label = match (node.parent, node.last_move) {
                (None, _) => "Root".to_string(),
                (Some(_), Some(pos)) => format!("{}", pos),
                (Some(_), None) => "?".to_string(),
            };
            writeln!(
                f,
                "{}{} (visits: {}, value: {:.3})",
                indent,
                label,
                node.visits,
                node.value()
            )?;
            for child in node.child_ids() {
                write_node(tree, child, f)?;
            }
            Ok(())
        }

        write_node(self, self.root(), f)
    }
}
