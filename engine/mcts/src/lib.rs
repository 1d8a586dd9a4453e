//! Monte Carlo Tree Search (MCTS) for two-player line games.
//!
//! This crate provides a game-agnostic MCTS implementation that works with any
//! game implementing the `engine-core` [`Game`](engine_core::Game) trait. The
//! heuristic variant additionally needs [`LineGame`](engine_core::LineGame).
//!
//! # Overview
//!
//! Each search builds a fresh tree by running iterations. Each iteration
//! consists of four phases:
//!
//! 1. **Selection**: Traverse the tree using UCB (Upper Confidence Bound) to
//!    balance exploration and exploitation
//! 2. **Expansion**: At the first node with untried actions, add one child for
//!    a randomly chosen untried action
//! 3. **Rollout**: Play the new child's state to the end with a playout policy
//! 4. **Backpropagation**: Add the outcome (+1 / 0 / -1 for the root player) to
//!    every node on the path from the leaf to the root
//!
//! # Variants
//!
//! | Variant    | Selection       | Rollout            |
//! |------------|-----------------|--------------------|
//! | `Baseline` | [`Ucb1`]        | [`RandomRollout`]  |
//! | `Modified` | [`MinimaxUcb1`] | [`HeuristicRollout`] |
//!
//! # Usage
//!
//! ```rust
//! use mcts::{run_mcts, MctsConfig, Variant};
//! use games_ultimate_tictactoe::{State, UltimateTicTacToe};
//! use rand_chacha::ChaCha20Rng;
//! use rand::SeedableRng;
//!
//! let game = UltimateTicTacToe::new();
//! let config = MctsConfig::for_testing().with_variant(Variant::Modified);
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let result = run_mcts(&game, State::new(), &config, &mut rng).unwrap();
//! assert!(result.action.is_some());
//! assert_eq!(result.simulations, config.iterations);
//! ```

pub mod config;
pub mod heuristic;
pub mod node;
pub mod parallel;
pub mod rollout;
pub mod search;
pub mod selection;
pub mod tree;

// Re-export main types
pub use config::{MctsConfig, UnknownVariant, Variant};
pub use heuristic::{find_tactic, Tactic};
pub use node::{MctsNode, NodeId};
pub use parallel::{search_root_parallel, tree_rng};
pub use rollout::{HeuristicRollout, Playout, RandomRollout, RolloutPolicy};
pub use search::{run_mcts, search, ChildStats, MctsSearch, SearchError, SearchResult, SearchStats};
pub use selection::{MinimaxUcb1, SelectionPolicy, Ucb1};
pub use tree::{MctsTree, TreeStats};
