//! MCTS-backed agent
//!
//! Wraps a search configuration and an RNG so a side in a match can be asked
//! for moves repeatedly. Every move starts a fresh search tree.

use anyhow::{Context, Result};
use games_ultimate_tictactoe::{Action, State, UltimateTicTacToe};
use mcts::{run_mcts, search_root_parallel, MctsConfig, SearchResult, Variant};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::debug;

/// Result of one move decision
pub struct AgentMove {
    /// Chosen action, None if the position was already decided
    pub action: Option<Action>,
    /// Full search result for logging and stats
    pub result: SearchResult<Action>,
}

/// A search-driven player
#[derive(Debug)]
pub struct MctsAgent {
    config: MctsConfig,
    rng: ChaCha20Rng,
}

impl MctsAgent {
    /// Create an agent seeded from `seed`. Each `stream` yields independent
    /// randomness, so two agents sharing a seed still play differently.
    pub fn new(config: MctsConfig, seed: u64, stream: u64) -> Self {
        let mut rng = if seed == 0 {
            ChaCha20Rng::from_entropy()
        } else {
            ChaCha20Rng::seed_from_u64(seed)
        };
        rng.set_stream(stream);
        Self { config, rng }
    }

    pub fn variant(&self) -> Variant {
        self.config.variant
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Search `state` and return the recommended move.
    pub fn select_move(&mut self, game: &UltimateTicTacToe, state: &State) -> Result<AgentMove> {
        let searched = if self.config.trees > 1 {
            // Fresh base seed per move keeps parallel searches reproducible
            let config = self.config.clone().with_seed(self.rng.next_u64());
            search_root_parallel(game, state, &config)
        } else {
            run_mcts(game, *state, &self.config, &mut self.rng)
        };
        let result =
            searched.with_context(|| format!("{} search failed", self.config.variant))?;

        debug!(
            variant = %self.config.variant,
            action = ?result.action,
            simulations = result.simulations,
            value = result.value,
            "Move selected"
        );

        Ok(AgentMove {
            action: result.action,
            result,
        })
    }
}
