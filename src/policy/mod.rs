//! Policies for the phases of the UCT search
//!
//! - Selection policies: which child to descend into, and the final move
//! - Rollout policies: which column to play during a random simulation

pub mod rollout;
pub mod selection;

pub use rollout::{CenterWeightedRollout, RolloutPolicy, UniformRollout};
pub use selection::{ExploitationPolicy, SelectionPolicy, UcbPolicy};

use crate::config::RolloutKind;

impl RolloutKind {
    /// Builds the rollout policy this kind names
    pub fn policy(self) -> Box<dyn RolloutPolicy> {
        match self {
            RolloutKind::Uniform => Box::new(UniformRollout::new()),
            RolloutKind::CenterWeighted => Box::new(CenterWeightedRollout::new()),
        }
    }
}
