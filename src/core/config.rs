//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Event engine configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum actions visited per chain (`None` = unlimited).
    /// Authored cycles never terminate without a limit.
    pub max_chain_steps: Option<usize>,

    /// Seed for the default RNG used by `random` conditions.
    pub seed: u64,

    /// Probability used by `random` conditions that omit one.
    pub default_probability: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_chain_steps: None,
            seed: 42,
            default_probability: 0.5,
        }
    }
}

impl EngineConfig {
    /// Limit the number of actions a single chain may visit.
    pub fn with_max_chain_steps(mut self, steps: usize) -> Self {
        self.max_chain_steps = Some(steps);
        self
    }

    /// Create a new config with custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with a custom fallback probability.
    pub fn with_default_probability(mut self, probability: f64) -> Self {
        self.default_probability = probability;
        self
    }
}
