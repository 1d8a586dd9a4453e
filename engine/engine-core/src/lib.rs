//! Core traits and types for the Ultimate Tic-Tac-Toe search engine
//!
//! This crate provides the boundary between game rules and search:
//! - `Game`: Typed adapter trait (legal actions, transitions, outcomes)
//! - `LineGame`: One-ply line-completion queries used by heuristic playouts
//! - `PlayerId` / `Outcome`: Player identities and results
//! - `game_utils`: 3x3 line detection shared by game implementations

pub mod game_utils;
pub mod typed;

// Re-export main types for convenience
pub use game_utils::{Outcome, PlayerId};
pub use typed::{Game, GameError, LineGame};
