//! Selection policies for the UCT search
//!
//! Selection policies pick which child of a node to follow. During the
//! search the engine descends with [`UcbPolicy`]; the final move is chosen
//! with [`ExploitationPolicy`].

use crate::{
    tree::{NodeId, SearchTree},
    utils,
};

/// Trait for policies that pick a child of a node
pub trait SelectionPolicy: Send + Sync {
    /// Selects a child of `node`, or `None` if it has no children
    ///
    /// Children are scanned in column order and the first one with the best
    /// score wins ties.
    fn select_child(&self, tree: &SearchTree, node: NodeId) -> Option<NodeId>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SelectionPolicy>;
}

/// Upper Confidence Bound selection with a signed exploitation term
///
/// ```text
/// UCB = sign * total_reward / visits + C * sqrt(2 * ln(parent_visits) / visits)
/// ```
///
/// `sign` is +1 when the machine chooses and -1 when the opponent does,
/// since rewards are always stored from the machine's point of view.
#[derive(Debug, Clone)]
pub struct UcbPolicy {
    /// Exploration coefficient `C`
    pub exploration_constant: f64,
}

impl UcbPolicy {
    /// Creates a new UCB policy with the given exploration constant
    pub fn new(exploration_constant: f64) -> Self {
        UcbPolicy {
            exploration_constant,
        }
    }
}

impl SelectionPolicy for UcbPolicy {
    fn select_child(&self, tree: &SearchTree, node: NodeId) -> Option<NodeId> {
        let parent = tree.node(node);
        let sign = parent.to_act.reward();

        argmax(parent.child_ids(), |id| {
            let child = tree.node(id);
            utils::ucb_value(
                child.total_reward,
                child.visits,
                parent.visits,
                sign,
                self.exploration_constant,
            )
        })
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        Box::new(self.clone())
    }
}

/// Pure exploitation: highest signed average outcome, no exploration bonus
///
/// Used once the budget is spent to commit to a move at the root.
#[derive(Debug, Clone, Default)]
pub struct ExploitationPolicy;

impl ExploitationPolicy {
    pub fn new() -> Self {
        ExploitationPolicy
    }
}

impl SelectionPolicy for ExploitationPolicy {
    fn select_child(&self, tree: &SearchTree, node: NodeId) -> Option<NodeId> {
        let parent = tree.node(node);
        let sign = parent.to_act.reward();

        argmax(parent.child_ids(), |id| {
            let child = tree.node(id);
            utils::exploitation_term(child.total_reward, child.visits, sign)
        })
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        Box::new(self.clone())
    }
}

// Implement SelectionPolicy for Box<dyn SelectionPolicy>
impl SelectionPolicy for Box<dyn SelectionPolicy> {
    fn select_child(&self, tree: &SearchTree, node: NodeId) -> Option<NodeId> {
        (**self).select_child(tree, node)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        (**self).clone_box()
    }
}

/// First id with the strictly highest score
fn argmax(ids: impl Iterator<Item = NodeId>, score: impl Fn(NodeId) -> f64) -> Option<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;
    for id in ids {
        let value = score(id);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((id, value)),
        }
    }
    best.map(|(id, _)| id)
}
