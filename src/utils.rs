//! Utility functions for the UCT search
//!
//! UCB arithmetic shared by the selection policies.

/// Average reward of a node, 0 if it was never visited
pub fn mean_reward(total_reward: f64, visits: u64) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    total_reward / visits as f64
}

/// Exploitation term as seen by the side choosing among children
///
/// Outcomes are stored from the machine's point of view, so the opponent
/// flips their sign.
pub fn exploitation_term(total_reward: f64, visits: u64, sign: f64) -> f64 {
    sign * mean_reward(total_reward, visits)
}

/// Exploration term `C * sqrt(2 ln(N) / n)`
pub fn exploration_term(parent_visits: u64, child_visits: u64, exploration_constant: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }

    exploration_constant * (2.0 * (parent_visits as f64).ln() / child_visits as f64).sqrt()
}

/// Full UCB score of a child, infinite while it is unvisited
pub fn ucb_value(
    total_reward: f64,
    visits: u64,
    parent_visits: u64,
    sign: f64,
    exploration_constant: f64,
) -> f64 {
    exploitation_term(total_reward, visits, sign)
        + exploration_term(parent_visits, visits, exploration_constant)
}
