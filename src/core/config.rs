//! Match configuration.
//!
//! The server builds an `EngineConfig` per match (or deserializes one from its
//! own settings) and hands it to `Game::new`.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Tunables for a single match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of seats (1-255).
    pub player_count: usize,

    /// Seed for deck shuffles.
    pub seed: u64,

    /// Cards drawn during cleanup.
    pub hand_size: usize,

    /// Maximum nesting of event dispatches (a reaction whose effect fires an
    /// event whose reaction fires an event ...).
    pub max_reaction_depth: usize,

    /// Resources granted at the start of each turn.
    pub starting_actions: u32,
    pub starting_buys: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            seed: 0,
            hand_size: 5,
            max_reaction_depth: 32,
            starting_actions: 1,
            starting_buys: 1,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    #[must_use]
    pub fn with_max_reaction_depth(mut self, depth: usize) -> Self {
        self.max_reaction_depth = depth;
        self
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.player_count == 0 || self.player_count > 255 {
            return Err(EngineError::InvalidConfig(format!(
                "player_count must be 1..=255, got {}",
                self.player_count
            )));
        }
        if self.max_reaction_depth == 0 {
            return Err(EngineError::InvalidConfig(
                "max_reaction_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
