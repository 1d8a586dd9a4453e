//! Shared utilities for two-player line games
//!
//! Player identities, game outcomes and 3x3 line detection used by both the
//! inner and outer boards of Ultimate Tic-Tac-Toe.

use std::fmt;

/// Identifies a player. Two-player games use 1 (moves first) and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub const ONE: PlayerId = PlayerId(1);
    pub const TWO: PlayerId = PlayerId(2);

    /// The other player in a two-player game.
    #[inline]
    pub fn opponent(self) -> PlayerId {
        PlayerId(3 - self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1 => write!(f, "X"),
            2 => write!(f, "O"),
            n => write!(f, "P{}", n),
        }
    }
}

/// Result of a finished game from one player's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    /// Outcome for `player` given a winner indicator.
    ///
    /// # Arguments
    /// * `winner` - 1 = player one won, 2 = player two won, anything else is a draw
    /// * `player` - The player whose perspective is wanted
    ///
    /// # Example
    /// ```
    /// use engine_core::{Outcome, PlayerId};
    ///
    /// assert_eq!(Outcome::from_winner(1, PlayerId(1)), Outcome::Win);
    /// assert_eq!(Outcome::from_winner(1, PlayerId(2)), Outcome::Loss);
    /// assert_eq!(Outcome::from_winner(3, PlayerId(1)), Outcome::Draw);
    /// ```
    #[inline]
    pub fn from_winner(winner: u8, player: PlayerId) -> Outcome {
        match winner {
            1 | 2 if winner == player.0 => Outcome::Win,
            1 | 2 => Outcome::Loss,
            _ => Outcome::Draw,
        }
    }

    /// Scalar reward: `+1.0` win, `-1.0` loss, `0.0` draw.
    #[inline]
    pub fn reward(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Loss => -1.0,
            Outcome::Draw => 0.0,
        }
    }
}

/// All winning lines of a 3x3 grid (rows, columns, diagonals)
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Return the owner of a completed line on a 3x3 grid, or 0 if none.
///
/// Cells hold 0 for empty and a player number otherwise.
///
/// # Example
/// ```
/// use engine_core::game_utils::line_winner;
///
/// assert_eq!(line_winner(&[1, 1, 1, 0, 2, 2, 0, 0, 0]), 1);
/// assert_eq!(line_winner(&[1, 2, 1, 0, 0, 0, 0, 0, 0]), 0);
/// ```
#[inline]
pub fn line_winner(grid: &[u8; 9]) -> u8 {
    for &[a, b, c] in &LINES {
        if grid[a] != 0 && grid[a] == grid[b] && grid[b] == grid[c] {
            return grid[a];
        }
    }
    0
}

/// Whether marking `cell` for `player` would complete a line through it.
///
/// The cell itself must be empty; the other two cells of some line through
/// it must already belong to `player`.
#[inline]
pub fn completes_line_at(grid: &[u8; 9], cell: usize, player: u8) -> bool {
    if cell >= 9 || grid[cell] != 0 {
        return false;
    }
    LINES.iter().filter(|line| line.contains(&cell)).any(|line| {
        line.iter()
            .filter(|&&idx| idx != cell)
            .all(|&idx| grid[idx] == player)
    })
}
