//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic for the
//! search engine and the `player` binary.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`UTTT_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! UTTT_<SECTION>_<KEY>=value
//!
//! Examples:
//!     UTTT_COMMON_LOG_LEVEL=debug
//!     UTTT_COMMON_SEED=42
//!     UTTT_MCTS_ITERATIONS=5000
//!     UTTT_MCTS_VARIANT=baseline
//!     UTTT_PLAY_GAMES=20
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_ENV_VAR, CONFIG_SEARCH_PATHS,
};
pub use structs::*;

#[cfg(test)]
mod tests;
