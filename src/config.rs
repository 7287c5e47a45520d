//! Configuration options for the UCT search
//!
//! This module defines the parameters that bound and steer a single
//! [`UctEngine::search`](crate::UctEngine::search) call.

use std::time::Duration;

use crate::{Result, SearchError};

/// Column sampler used during rollouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloutKind {
    /// Every open column is equally likely
    Uniform,

    /// Triangular weights peaking at the middle column
    ///
    /// Random games then look more like real play, which usually gives
    /// better value estimates for the same number of rollouts.
    CenterWeighted,
}

/// Configuration for the UCT search
///
/// Use the builder methods to create a customized configuration.
///
/// # Example
///
/// ```
/// use gravity_uct::{SearchConfig, config::RolloutKind};
/// use std::time::Duration;
///
/// let config = SearchConfig::default()
///     .with_exploration_constant(0.707)
///     .with_max_iterations(50_000)
///     .with_max_time(Duration::from_millis(500))
///     .with_rollout(RolloutKind::Uniform);
/// ```
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Exploration coefficient `C` of the UCB score
    ///
    /// Values around 0.7 to 0.8 work well with +1/-1 rollout outcomes.
    pub exploration_constant: f64,

    /// Hard cap on the number of iterations
    ///
    /// Acts as a safety net when the wall-clock budget is set.
    pub max_iterations: usize,

    /// Wall-clock budget measured from the start of the call
    ///
    /// With `None` only the iteration cap applies, which makes a seeded
    /// search fully reproducible.
    pub max_time: Option<Duration>,

    /// Column sampler used during simulation
    pub rollout: RolloutKind,

    /// Whether to look for an immediate win or forced block before searching
    pub tactical_check: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            exploration_constant: 0.8,
            max_iterations: 1_000_000,
            max_time: Some(Duration::from_millis(1650)),
            rollout: RolloutKind::CenterWeighted,
            tactical_check: true,
        }
    }
}

impl SearchConfig {
    /// Sets the exploration constant
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the maximum number of iterations
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the wall-clock budget
    pub fn with_max_time(mut self, duration: Duration) -> Self {
        self.max_time = Some(duration);
        self
    }

    /// Removes the wall-clock budget so only the iteration cap applies
    pub fn without_time_limit(mut self) -> Self {
        self.max_time = None;
        self
    }

    /// Sets the rollout sampler
    pub fn with_rollout(mut self, rollout: RolloutKind) -> Self {
        self.rollout = rollout;
        self
    }

    /// Enables or disables the immediate win/block check
    pub fn with_tactical_check(mut self, enabled: bool) -> Self {
        self.tactical_check = enabled;
        self
    }

    /// Checks that the configuration can drive a search
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SearchError::InvalidConfiguration(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if self.max_iterations == 0 {
            return Err(SearchError::InvalidConfiguration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.max_time == Some(Duration::ZERO) {
            return Err(SearchError::InvalidConfiguration(
                "max_time must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
