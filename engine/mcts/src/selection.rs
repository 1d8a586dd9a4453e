//! Child selection rules.
//!
//! All node statistics are stored from the reference player's point of view.
//! A [`SelectionPolicy`] decides how that stored mean is read when the player
//! choosing at the parent is not the reference player.

use std::fmt::Debug;

use engine_core::PlayerId;

/// Strategy for turning a child's mean reward into the exploitation term of UCB.
pub trait SelectionPolicy: Send + Sync + Debug {
    /// Exploitation value of a child with mean reward `mean`, where `selector`
    /// is the player to act at the parent and `reference` is the root player.
    fn exploitation(&self, mean: f64, selector: PlayerId, reference: PlayerId) -> f64;
}

/// Plain UCB1: every player maximises the reference player's mean reward.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ucb1;

impl SelectionPolicy for Ucb1 {
    #[inline]
    fn exploitation(&self, mean: f64, _selector: PlayerId, _reference: PlayerId) -> f64 {
        mean
    }
}

/// Min-max UCB1: the opponent of the reference player minimises its mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimaxUcb1;

impl SelectionPolicy for MinimaxUcb1 {
    #[inline]
    fn exploitation(&self, mean: f64, selector: PlayerId, reference: PlayerId) -> f64 {
        if selector == reference {
            mean
        } else {
            -mean
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ucb1_ignores_perspective() {
        assert_eq!(Ucb1.exploitation(0.25, PlayerId::ONE, PlayerId::ONE), 0.25);
        assert_eq!(Ucb1.exploitation(0.25, PlayerId::TWO, PlayerId::ONE), 0.25);
    }

    #[test]
    fn test_minimax_negates_for_opponent() {
        assert_eq!(
            MinimaxUcb1.exploitation(0.25, PlayerId::ONE, PlayerId::ONE),
            0.25
        );
        assert_eq!(
            MinimaxUcb1.exploitation(0.25, PlayerId::TWO, PlayerId::ONE),
            -0.25
        );
        assert_eq!(
            MinimaxUcb1.exploitation(-1.0, PlayerId::ONE, PlayerId::TWO),
            1.0
        );
    }
}
