//! Search configuration parameters.

use serde::{Deserialize, Serialize};

/// Configuration for the Monte Carlo tree search decision engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Number of `simulate()` iterations per real decision.
    /// A fixed count stands in for a wall-clock tick budget; callers with
    /// a live deadline should check it at the top of each iteration.
    pub simulations: u32,

    /// Exploration constant multiplying the UCB confidence term.
    pub exploration: f64,

    /// Visit count a leaf must reach before it is expanded. The root is
    /// always expanded regardless.
    pub expansion_threshold: u32,

    /// Hard step cap on a single rollout-to-terminal.
    pub rollout_cap: u32,

    /// Added to a child's rollout score when its branch reached the next
    /// level during expansion.
    pub level_bonus: f64,

    /// Subtracted from a rollout score when the branch cost the agent a
    /// life.
    pub death_penalty: f64,

    /// Ghost-model lookahead used while fast-forwarding through corridors.
    /// Decision-point advances use a lookahead of zero.
    pub corridor_lookahead: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            simulations: 10,
            exploration: 1.0,
            expansion_threshold: 20,
            rollout_cap: 10_000,
            level_bonus: 10_000.0,
            death_penalty: 10_000.0,
            corridor_lookahead: 10,
        }
    }
}

impl MctsConfig {
    /// A fast config for tests: short rollouts, everything else default.
    pub fn for_testing() -> Self {
        Self {
            rollout_cap: 400,
            ..Self::default()
        }
    }

    /// Builder pattern: set the simulation count.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.simulations = n;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set the expansion visit threshold.
    pub fn with_expansion_threshold(mut self, visits: u32) -> Self {
        self.expansion_threshold = visits;
        self
    }

    /// Builder pattern: set the rollout step cap.
    pub fn with_rollout_cap(mut self, steps: u32) -> Self {
        self.rollout_cap = steps;
        self
    }
}
