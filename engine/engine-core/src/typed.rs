//! Typed game adapter trait consumed by the search engine
//!
//! Games implement [`Game`] with their own state and action types. The search
//! only ever talks to a game through this trait: it asks for legal actions,
//! applies actions to produce successor states, and queries terminal outcomes.

use std::fmt::Debug;
use std::hash::Hash;

use crate::game_utils::{Outcome, PlayerId};

/// Error type for adapter operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Illegal action: {action}")]
    IllegalAction { action: String },
    #[error("Outcome requested for a state that is not terminal")]
    NotTerminal,
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl GameError {
    /// Build an `IllegalAction` error from any debuggable action.
    pub fn illegal<A: Debug>(action: &A) -> Self {
        GameError::IllegalAction {
            action: format!("{:?}", action),
        }
    }
}

/// Main trait for game implementations
///
/// States are immutable by convention: `apply` never mutates its input and
/// always returns a fresh successor.
///
/// # Example
///
/// ```rust
/// use engine_core::{Game, GameError, Outcome, PlayerId};
///
/// /// Players alternately take 1 or 2 stones; whoever takes the last stone wins.
/// #[derive(Debug)]
/// struct Nim;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Pile { stones: u8, to_move: u8, last_mover: u8 }
///
/// impl Game for Nim {
///     type State = Pile;
///     type Action = u8;
///
///     fn legal_actions(&self, state: &Pile) -> Vec<u8> {
///         (1..=2).filter(|&n| n <= state.stones).collect()
///     }
///
///     fn apply(&self, state: &Pile, action: u8) -> Result<Pile, GameError> {
///         if action == 0 || action > 2 || action > state.stones {
///             return Err(GameError::illegal(&action));
///         }
///         Ok(Pile {
///             stones: state.stones - action,
///             to_move: 3 - state.to_move,
///             last_mover: state.to_move,
///         })
///     }
///
///     fn is_terminal(&self, state: &Pile) -> bool {
///         state.stones == 0
///     }
///
///     fn outcome(&self, state: &Pile, player: PlayerId) -> Result<Outcome, GameError> {
///         if !self.is_terminal(state) {
///             return Err(GameError::NotTerminal);
///         }
///         Ok(Outcome::from_winner(state.last_mover, player))
///     }
///
///     fn current_player(&self, state: &Pile) -> PlayerId {
///         PlayerId(state.to_move)
///     }
/// }
///
/// let game = Nim;
/// let start = Pile { stones: 3, to_move: 1, last_mover: 2 };
/// assert_eq!(game.legal_actions(&start), vec![1, 2]);
/// let next = game.apply(&start, 2).unwrap();
/// assert_eq!(game.current_player(&next), PlayerId(2));
/// ```
pub trait Game: Send + Sync + Debug + 'static {
    /// Game state type - cheap to clone, never mutated in place by the engine
    type State: Clone + Send + Sync + Debug + 'static;

    /// Action type - small, comparable and hashable
    type Action: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Legal actions for the player to move, in a stable order.
    ///
    /// Must be non-empty unless `is_terminal(state)` holds.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Apply an action and return the successor state.
    ///
    /// Fails with [`GameError::IllegalAction`] when `action` is not a member of
    /// `legal_actions(state)`.
    fn apply(&self, state: &Self::State, action: Self::Action) -> Result<Self::State, GameError>;

    /// Whether the game is over in this state
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Outcome of a finished game from `player`'s point of view.
    ///
    /// Only valid for terminal states; returns [`GameError::NotTerminal`] otherwise.
    fn outcome(&self, state: &Self::State, player: PlayerId) -> Result<Outcome, GameError>;

    /// The player whose turn it is
    fn current_player(&self, state: &Self::State) -> PlayerId;
}

/// Games built from lines of three that can answer one-ply tactical queries.
pub trait LineGame: Game {
    /// Whether `player` placing a mark via `action` completes a line in the
    /// board that action lands in.
    ///
    /// `player` need not be the player to move. Returns `false` for actions
    /// that target an occupied or closed cell.
    fn completes_line(&self, state: &Self::State, action: Self::Action, player: PlayerId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Race to ten: each turn adds 1..=3, whoever reaches exactly ten wins.
    #[derive(Debug)]
    struct RaceGame;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct RaceState {
        total: u8,
        to_move: u8,
    }

    impl Game for RaceGame {
        type State = RaceState;
        type Action = u8;

        fn legal_actions(&self, state: &Self::State) -> Vec<u8> {
            if self.is_terminal(state) {
                return Vec::new();
            }
            (1..=3).filter(|&n| state.total + n <= 10).collect()
        }

        fn apply(&self, state: &Self::State, action: u8) -> Result<Self::State, GameError> {
            if !self.legal_actions(state).contains(&action) {
                return Err(GameError::illegal(&action));
            }
            Ok(RaceState {
                total: state.total + action,
                to_move: PlayerId(state.to_move).opponent().0,
            })
        }

        fn is_terminal(&self, state: &Self::State) -> bool {
            state.total >= 10
        }

        fn outcome(&self, state: &Self::State, player: PlayerId) -> Result<Outcome, GameError> {
            if !self.is_terminal(state) {
                return Err(GameError::NotTerminal);
            }
            // The player who just moved reached ten.
            let winner = PlayerId(state.to_move).opponent();
            Ok(Outcome::from_winner(winner.0, player))
        }

        fn current_player(&self, state: &Self::State) -> PlayerId {
            PlayerId(state.to_move)
        }
    }

    #[test]
    fn test_apply_returns_new_state() {
        let game = RaceGame;
        let start = RaceState { total: 0, to_move: 1 };

        let next = game.apply(&start, 3).unwrap();
        assert_eq!(start.total, 0);
        assert_eq!(next.total, 3);
        assert_eq!(game.current_player(&next), PlayerId::TWO);
    }

    #[test]
    fn test_illegal_action_rejected() {
        let game = RaceGame;
        let state = RaceState { total: 9, to_move: 1 };

        let err = game.apply(&state, 2).unwrap_err();
        assert!(matches!(err, GameError::IllegalAction { .. }));
        assert!(err.to_string().contains('2'));
    }

    #[test]
    fn test_outcome_requires_terminal() {
        let game = RaceGame;
        let state = RaceState { total: 4, to_move: 2 };
        assert_eq!(game.outcome(&state, PlayerId::ONE), Err(GameError::NotTerminal));
    }

    #[test]
    fn test_outcome_perspective() {
        let game = RaceGame;
        let state = RaceState { total: 9, to_move: 2 };
        let done = game.apply(&state, 1).unwrap();

        assert!(game.is_terminal(&done));
        assert!(game.legal_actions(&done).is_empty());
        assert_eq!(game.outcome(&done, PlayerId::TWO).unwrap(), Outcome::Win);
        assert_eq!(game.outcome(&done, PlayerId::ONE).unwrap(), Outcome::Loss);
    }
}
