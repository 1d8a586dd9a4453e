//! Playout strategies.
//!
//! A rollout plays a game from a leaf state to the end without touching the
//! tree and reports the outcome for the reference player.

use std::fmt::Debug;

use engine_core::{Game, LineGame, Outcome, PlayerId};
use rand::Rng;
use rand_chacha::ChaCha20Rng;

use crate::heuristic::find_tactic;
use crate::search::SearchError;

/// Result of a single playout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playout {
    /// Final outcome for the reference player
    pub outcome: Outcome,
    /// Moves played from the leaf to the terminal state
    pub plies: u32,
}

/// Strategy for choosing moves during a playout.
pub trait RolloutPolicy<G: Game>: Send + Sync + Debug {
    /// Pick one action from a non-empty legal list.
    fn choose_action(
        &self,
        game: &G,
        state: &G::State,
        legal: &[G::Action],
        rng: &mut ChaCha20Rng,
    ) -> Result<G::Action, SearchError>;

    /// Play from `state` until the game ends.
    fn simulate(
        &self,
        game: &G,
        state: &G::State,
        reference: PlayerId,
        rng: &mut ChaCha20Rng,
    ) -> Result<Playout, SearchError> {
        let mut current = state.clone();
        let mut plies = 0;

        while !game.is_terminal(&current) {
            let legal = game.legal_actions(&current);
            if legal.is_empty() {
                return Err(SearchError::EmptyLegalMoves);
            }
            let action = self.choose_action(game, &current, &legal, rng)?;
            current = game.apply(&current, action)?;
            plies += 1;
        }

        Ok(Playout {
            outcome: game.outcome(&current, reference)?,
            plies,
        })
    }
}

#[inline]
fn uniform<A: Copy>(legal: &[A], rng: &mut ChaCha20Rng) -> A {
    legal[rng.gen_range(0..legal.len())]
}

/// Uniformly random playouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRollout;

impl<G: Game> RolloutPolicy<G> for RandomRollout {
    fn choose_action(
        &self,
        _game: &G,
        _state: &G::State,
        legal: &[G::Action],
        rng: &mut ChaCha20Rng,
    ) -> Result<G::Action, SearchError> {
        Ok(uniform(legal, rng))
    }
}

/// Greedy one-ply playouts: win if possible, else block, else random.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicRollout;

impl<G: LineGame> RolloutPolicy<G> for HeuristicRollout {
    fn choose_action(
        &self,
        game: &G,
        state: &G::State,
        legal: &[G::Action],
        rng: &mut ChaCha20Rng,
    ) -> Result<G::Action, SearchError> {
        Ok(match find_tactic(game, state, legal)? {
            Some(tactic) => tactic.action(),
            None => uniform(legal, rng),
        })
    }
}
