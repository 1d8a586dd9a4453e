//! One-ply tactical scan used by heuristic playouts.

use engine_core::{GameError, LineGame};

/// An immediately forcing move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tactic<A> {
    /// Completes a line for the player to move.
    Win(A),
    /// Leaves the opponent no line-completing reply while another move would.
    Block(A),
}

impl<A: Copy> Tactic<A> {
    pub fn action(&self) -> A {
        match self {
            Tactic::Win(action) | Tactic::Block(action) => *action,
        }
    }
}

/// Whether the player to move in `state` has a line-completing action.
fn has_winning_reply<G: LineGame>(game: &G, state: &G::State) -> bool {
    if game.is_terminal(state) {
        return false;
    }
    let mover = game.current_player(state);
    game.legal_actions(state)
        .into_iter()
        .any(|reply| game.completes_line(state, reply, mover))
}

/// First winning action in `legal`, else the first blocking action.
///
/// A block is judged on the successor position, so the board the opponent is
/// sent to decides whether a threat is live. Nothing counts as a block when
/// every action is equally safe or equally losing.
///
/// `legal` must be the legal actions of `state`; order is preserved so the
/// scan is deterministic.
pub fn find_tactic<G: LineGame>(
    game: &G,
    state: &G::State,
    legal: &[G::Action],
) -> Result<Option<Tactic<G::Action>>, GameError> {
    let acting = game.current_player(state);

    if let Some(&action) = legal
        .iter()
        .find(|&&action| game.completes_line(state, action, acting))
    {
        return Ok(Some(Tactic::Win(action)));
    }

    let mut first_safe = None;
    let mut any_losing = false;
    for &action in legal {
        let next = game.apply(state, action)?;
        if has_winning_reply(game, &next) {
            any_losing = true;
        } else if first_safe.is_none() {
            first_safe = Some(action);
        }
        if any_losing && first_safe.is_some() {
            break;
        }
    }

    Ok(first_safe.filter(|_| any_losing).map(Tactic::Block))
}
